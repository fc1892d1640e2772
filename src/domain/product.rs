// ==========================================
// MES 数据仿真系统 - 产品与物料清单实体
// ==========================================

use serde::{Deserialize, Serialize};

/// 产品主数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    /// 产品类别（由层级与名称关键词推导）
    pub category: String,
    pub cost: f64,
    /// 标准工时（小时，按 100 件基准）
    pub standard_process_time: f64,
    pub is_active: bool,
}

/// 物料清单行: 产品 -> 组件（库存物料）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    pub product_id: i64,
    pub component_item_id: i64,
    /// 单件产品所需组件数量
    pub quantity: f64,
    /// 预期损耗比例（0.05 表示额外 5% 损耗）
    pub scrap_factor: f64,
}
