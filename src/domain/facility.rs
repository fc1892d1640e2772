// ==========================================
// MES 数据仿真系统 - 产线资源实体
// ==========================================
// 工作中心 / 机台 / 班次 / 员工
// ==========================================

use crate::domain::types::MachineStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 工作中心
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCenter {
    pub name: String,
    pub description: String,
    pub capacity: f64,
    pub capacity_uom: String,
    pub cost_per_hour: f64,
    pub location: String,
    pub is_active: bool,
}

/// 机台
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub name: String,
    pub machine_type: String,
    pub work_center_id: i64,
    pub status: MachineStatus,
    pub nominal_capacity: f64,
    pub capacity_uom: String,
    /// 标准换批准备时间（分钟）
    pub setup_time: i64,
    /// 效率因子 [0.70, 0.98]，随机龄退化
    pub efficiency_factor: f64,
    /// 保养周期（小时）
    pub maintenance_frequency: i64,
    pub last_maintenance_date: NaiveDateTime,
    pub next_maintenance_date: NaiveDateTime,
    /// 换产切换时间（分钟）
    pub product_changeover_time: i64,
    pub cost_per_hour: f64,
    pub installation_date: NaiveDateTime,
    pub model_number: String,
}

/// 班次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub name: String,
    /// HH:MM 格式
    pub start_time: String,
    pub end_time: String,
    /// 班次产能折减系数
    pub capacity: f64,
    pub is_weekend: bool,
}

/// 员工
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub role: String,
    pub shift_id: i64,
    pub hourly_rate: f64,
    /// 逗号分隔的技能列表
    pub skills: String,
    pub hire_date: NaiveDateTime,
}
