// ==========================================
// MES 数据仿真系统 - 质量实体
// ==========================================

use crate::domain::types::QcResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 质检记录
///
/// # 不变式
/// - defect_rate + rework_rate + yield_rate == 1（构造时保证）
/// - result 由 defect_rate + rework_rate 按阈值推导
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub order_id: i64,
    pub date: NaiveDateTime,
    pub result: QcResult,
    pub comments: String,
    pub defect_rate: f64,
    pub rework_rate: f64,
    pub yield_rate: f64,
    pub inspector_id: i64,
}

/// 缺陷明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defect {
    pub check_id: i64,
    pub defect_type: String,
    /// 严重度 1-5
    pub severity: i64,
    pub quantity: i64,
    pub location: String,
    pub root_cause: String,
    pub action_taken: String,
}
