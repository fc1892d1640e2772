// ==========================================
// MES 数据仿真系统 - 领域类型定义
// ==========================================
// 序列化格式: snake_case (与数据库 CHECK 约束一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 机台状态 (Machine Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Running,     // 运行中
    Idle,        // 空闲
    Maintenance, // 保养中
    Breakdown,   // 故障
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Running => "running",
            MachineStatus::Idle => "idle",
            MachineStatus::Maintenance => "maintenance",
            MachineStatus::Breakdown => "breakdown",
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 工单状态 (Work Order Status)
// ==========================================
// 红线: 派生字段 (actual_*) 的有无由状态唯一决定，见 OrderExecution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Scheduled,  // 已排程（未来）
    InProgress, // 执行中
    Completed,  // 已完工
    Cancelled,  // 已取消
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Scheduled => "scheduled",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(WorkOrderStatus::Scheduled),
            "in_progress" => Some(WorkOrderStatus::InProgress),
            "completed" => Some(WorkOrderStatus::Completed),
            "cancelled" => Some(WorkOrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 质检结论 (QC Result)
// ==========================================
// 判定规则: defect_rate + rework_rate < 0.05 -> pass
//           defect_rate + rework_rate < 0.15 -> rework
//           否则 -> fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QcResult {
    Pass,
    Rework,
    Fail,
}

impl QcResult {
    /// 依据缺陷率与返工率之和推导质检结论
    pub fn from_rates(defect_rate: f64, rework_rate: f64) -> Self {
        let combined = defect_rate + rework_rate;
        if combined >= 0.15 {
            QcResult::Fail
        } else if combined >= 0.05 {
            QcResult::Rework
        } else {
            QcResult::Pass
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QcResult::Pass => "pass",
            QcResult::Rework => "rework",
            QcResult::Fail => "fail",
        }
    }
}

impl fmt::Display for QcResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 停机类别 (Downtime Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeCategory {
    Planned,   // 计划停机（保养/换型）
    Unplanned, // 非计划停机（故障/缺料）
}

impl DowntimeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DowntimeCategory::Planned => "planned",
            DowntimeCategory::Unplanned => "unplanned",
        }
    }
}

impl fmt::Display for DowntimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 产品层级 (Product Level)
// ==========================================
// BOM 层级: 原材料 -> 零部件 -> 子装配 -> 成品
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductLevel {
    RawMaterial,
    Component,
    Subassembly,
    FinishedProduct,
}

impl ProductLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductLevel::RawMaterial => "Raw Material",
            ProductLevel::Component => "Component",
            ProductLevel::Subassembly => "Subassembly",
            ProductLevel::FinishedProduct => "Finished Product",
        }
    }
}

impl fmt::Display for ProductLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qc_result_thresholds() {
        assert_eq!(QcResult::from_rates(0.01, 0.02), QcResult::Pass);
        assert_eq!(QcResult::from_rates(0.03, 0.02), QcResult::Rework);
        assert_eq!(QcResult::from_rates(0.04, 0.10), QcResult::Rework);
        assert_eq!(QcResult::from_rates(0.10, 0.05), QcResult::Fail);
        assert_eq!(QcResult::from_rates(0.30, 0.00), QcResult::Fail);
    }

    #[test]
    fn work_order_status_roundtrip() {
        for status in [
            WorkOrderStatus::Scheduled,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Cancelled,
        ] {
            assert_eq!(WorkOrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WorkOrderStatus::parse("unknown"), None);
    }
}
