// ==========================================
// MES 数据仿真系统 - 供应链实体
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 供应商
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    /// 供货提前期（天）
    pub lead_time: i64,
    /// 供货可靠度 [0.80, 0.99]
    pub reliability_score: f64,
    pub contact_info: String,
}

/// 库存物料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub reorder_level: i64,
    pub supplier_id: i64,
    pub lead_time: i64,
    pub cost: f64,
    pub lot_number: String,
    pub location: String,
    pub last_received_date: NaiveDateTime,
}
