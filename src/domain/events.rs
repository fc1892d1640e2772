// ==========================================
// MES 数据仿真系统 - 运行事件实体
// ==========================================
// 物料消耗 / 停机 / OEE 指标
// ==========================================

use crate::domain::types::DowntimeCategory;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 物料消耗记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialConsumption {
    pub order_id: i64,
    pub item_id: i64,
    pub planned_quantity: f64,
    pub actual_quantity: f64,
    /// 实际相对计划的偏差百分比
    pub variance_percent: f64,
    pub consumption_date: NaiveDateTime,
    pub lot_number: String,
}

/// 停机事件
///
/// end_time / duration 为 None 表示仍在停机中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Downtime {
    pub machine_id: i64,
    /// 仅当停机时间窗与某工单的实际执行窗重叠时才关联
    pub order_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// 停机时长（分钟）
    pub duration: Option<i64>,
    pub reason: String,
    pub category: DowntimeCategory,
    pub description: String,
    pub reported_by: i64,
}

/// 机台日度 OEE 指标
///
/// oee = availability * performance * quality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OeeMetric {
    pub machine_id: i64,
    pub date: NaiveDateTime,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
    /// 计划生产时间（分钟）
    pub planned_production_time: i64,
    pub actual_production_time: i64,
    pub downtime: i64,
}
