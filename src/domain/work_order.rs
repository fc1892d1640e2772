// ==========================================
// MES 数据仿真系统 - 工单实体
// ==========================================
// 设计要点: 状态相关的派生字段建模为 OrderExecution 和类型，
// 每个状态一个变体，"scheduled/cancelled 不得携带实际执行数据"
// 由类型系统保证，而不是运行时 if 检查。
// ==========================================

use crate::domain::types::WorkOrderStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 工单执行数据（按状态分变体）
///
/// # 不变式
/// - Scheduled/Cancelled: 无任何实际执行字段
/// - InProgress: 有开工时间与在制产量，无完工时间
/// - Completed: 全部实际字段齐备，且 actual_production + scrap == quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderExecution {
    Scheduled,
    Cancelled,
    InProgress {
        actual_start: NaiveDateTime,
        actual_production: i64,
        scrap: i64,
        setup_minutes: i64,
    },
    Completed {
        actual_start: NaiveDateTime,
        actual_end: NaiveDateTime,
        actual_production: i64,
        scrap: i64,
        setup_minutes: i64,
    },
}

impl OrderExecution {
    pub fn status(&self) -> WorkOrderStatus {
        match self {
            OrderExecution::Scheduled => WorkOrderStatus::Scheduled,
            OrderExecution::Cancelled => WorkOrderStatus::Cancelled,
            OrderExecution::InProgress { .. } => WorkOrderStatus::InProgress,
            OrderExecution::Completed { .. } => WorkOrderStatus::Completed,
        }
    }

    pub fn actual_start(&self) -> Option<NaiveDateTime> {
        match self {
            OrderExecution::InProgress { actual_start, .. }
            | OrderExecution::Completed { actual_start, .. } => Some(*actual_start),
            _ => None,
        }
    }

    pub fn actual_end(&self) -> Option<NaiveDateTime> {
        match self {
            OrderExecution::Completed { actual_end, .. } => Some(*actual_end),
            _ => None,
        }
    }

    pub fn actual_production(&self) -> Option<i64> {
        match self {
            OrderExecution::InProgress {
                actual_production, ..
            }
            | OrderExecution::Completed {
                actual_production, ..
            } => Some(*actual_production),
            _ => None,
        }
    }

    pub fn scrap(&self) -> Option<i64> {
        match self {
            OrderExecution::InProgress { scrap, .. }
            | OrderExecution::Completed { scrap, .. } => Some(*scrap),
            _ => None,
        }
    }

    pub fn setup_minutes(&self) -> Option<i64> {
        match self {
            OrderExecution::InProgress { setup_minutes, .. }
            | OrderExecution::Completed { setup_minutes, .. } => Some(*setup_minutes),
            _ => None,
        }
    }

    /// 下游事件（质检/物料消耗）仅针对已开工的工单生成
    pub fn is_started(&self) -> bool {
        matches!(
            self,
            OrderExecution::InProgress { .. } | OrderExecution::Completed { .. }
        )
    }
}

/// 工单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub product_id: i64,
    pub work_center_id: i64,
    pub machine_id: i64,
    pub employee_id: i64,
    pub quantity: i64,
    pub planned_start: NaiveDateTime,
    pub planned_end: NaiveDateTime,
    /// 优先级 1-5（3 为常规）
    pub priority: i64,
    /// 计划提前期（小时）
    pub lead_time: i64,
    pub lot_number: String,
    pub execution: OrderExecution,
}

impl WorkOrder {
    pub fn status(&self) -> WorkOrderStatus {
        self.execution.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn scheduled_and_cancelled_have_no_actuals() {
        for exec in [OrderExecution::Scheduled, OrderExecution::Cancelled] {
            assert_eq!(exec.actual_start(), None);
            assert_eq!(exec.actual_end(), None);
            assert_eq!(exec.actual_production(), None);
            assert_eq!(exec.scrap(), None);
            assert!(!exec.is_started());
        }
    }

    #[test]
    fn in_progress_has_no_end_time() {
        let exec = OrderExecution::InProgress {
            actual_start: dt(1, 8),
            actual_production: 40,
            scrap: 2,
            setup_minutes: 20,
        };
        assert_eq!(exec.actual_start(), Some(dt(1, 8)));
        assert_eq!(exec.actual_end(), None);
        assert_eq!(exec.actual_production(), Some(40));
        assert!(exec.is_started());
    }

    #[test]
    fn completed_carries_full_execution() {
        let exec = OrderExecution::Completed {
            actual_start: dt(1, 8),
            actual_end: dt(1, 16),
            actual_production: 95,
            scrap: 5,
            setup_minutes: 30,
        };
        assert_eq!(exec.actual_end(), Some(dt(1, 16)));
        assert_eq!(exec.scrap(), Some(5));
    }
}
