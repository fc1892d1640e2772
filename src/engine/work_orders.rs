// ==========================================
// MES 数据仿真系统 - 工单生成器
// ==========================================
// 职责: 生成带状态机语义的生产工单
// 约束: 实际字段随状态派生 —— 已排程/已取消无实际值，
//       进行中有开工无完工，已完工满足 production + scrap = quantity
// ==========================================

use crate::domain::types::WorkOrderStatus;
use crate::domain::work_order::{OrderExecution, WorkOrder};
use crate::engine::dependent::FacilitySet;
use crate::engine::error::{SimulatorError, SimulatorResult};
use crate::engine::reference::ReferenceSet;
use crate::engine::{routing, short_uuid};
use crate::repository::WorkOrderRepository;
use chrono::{Duration, NaiveDateTime};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use tracing::{info, warn};

/// 已落库的工单（下游事件生成用）
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: i64,
    pub product_id: i64,
    pub work_center_name: String,
    pub machine_id: i64,
    pub quantity: i64,
    pub planned_start: NaiveDateTime,
    pub planned_end: NaiveDateTime,
    pub lot_number: String,
    pub execution: OrderExecution,
}

pub struct WorkOrderGenerator;

impl WorkOrderGenerator {
    pub fn generate(
        conn: &Connection,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        lookback_days: i64,
        lookahead_days: i64,
        order_count: usize,
        reference: &ReferenceSet,
        facility: &FacilitySet,
    ) -> SimulatorResult<Vec<OrderRecord>> {
        if reference.products.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "work_orders",
                entity: "Products",
            });
        }
        if reference.work_centers.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "work_orders",
                entity: "WorkCenters",
            });
        }
        if facility.machines.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "work_orders",
                entity: "Machines",
            });
        }
        if facility.employees.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "work_orders",
                entity: "Employees",
            });
        }

        // 操作工优先分派；没有操作工就全员上阵
        let operators: Vec<&crate::engine::dependent::EmployeeRecord> = facility
            .employees
            .iter()
            .filter(|e| e.role == "Operator")
            .collect();
        if operators.is_empty() {
            warn!("无 Operator 岗位员工，工单分派降级为全员随机");
        }

        // 状态分布: 已完工为主，进行中/已排程次之，少量取消
        let status_weights = WeightedIndex::new([15u32, 20, 60, 5])?;
        let status_pool = [
            WorkOrderStatus::Scheduled,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Cancelled,
        ];
        let priority_weights = WeightedIndex::new([5u32, 15, 60, 15, 5])?;

        let mut orders = Vec::with_capacity(order_count);
        let mut produced = 0usize;
        while produced < order_count {
            // 同批次 1-5 张工单共享批次号
            let lot_size = rng.random_range(1..=5).min(order_count - produced);
            let mut lot_number: Option<String> = None;

            for _ in 0..lot_size {
                let product =
                    &reference.products[rng.random_range(0..reference.products.len())];
                let status = status_pool[status_weights.sample(rng)];

                let (batch_min, batch_max) = routing::batch_size_range(product.level);
                let quantity = rng.random_range(batch_min..=batch_max);

                // 计划开工时间按状态落在不同时间窗
                let mut planned_start = match status {
                    WorkOrderStatus::Completed => {
                        now - Duration::minutes(rng.random_range(0..=lookback_days * 24 * 60))
                    }
                    WorkOrderStatus::InProgress => {
                        now - Duration::minutes(
                            rng.random_range(0..=lookback_days.min(7) * 24 * 60),
                        )
                    }
                    WorkOrderStatus::Scheduled => {
                        now + Duration::minutes(rng.random_range(0..=lookahead_days * 24 * 60))
                    }
                    WorkOrderStatus::Cancelled => {
                        now + Duration::minutes(rng.random_range(
                            -(lookback_days * 24 * 60)..=lookahead_days * 24 * 60,
                        ))
                    }
                };

                let mut duration_hours =
                    product.standard_process_time * quantity as f64 / 100.0;
                // 5% 工期顺延，10% 工期放大
                if rng.random_range(0..100) < 5 {
                    duration_hours += rng.random_range(1.0..=24.0);
                }
                if rng.random_range(0..100) < 10 {
                    duration_hours *= 1.0 + rng.random_range(0.1..=0.5);
                }
                let mut planned_end = planned_start + hours_to_duration(duration_hours);
                // 已完工工单的计划窗必须整体落在基准时刻之前
                if status == WorkOrderStatus::Completed && planned_end > now {
                    let shift =
                        (planned_end - now) + Duration::minutes(rng.random_range(30..=24 * 60));
                    planned_start -= shift;
                    planned_end -= shift;
                }

                let lot = lot_number
                    .get_or_insert_with(|| {
                        format!(
                            "LOT-{}-{}",
                            short_uuid(rng),
                            planned_start.format("%m%d")
                        )
                    })
                    .clone();

                // 机台按产品适配机型过滤，落空降级为全量
                let machine = match routing::machine_type_for_product(&product.name) {
                    Some(machine_type) => {
                        let suitable: Vec<&crate::engine::dependent::MachineRecord> = facility
                            .machines
                            .iter()
                            .filter(|m| m.machine_type == machine_type)
                            .collect();
                        if suitable.is_empty() {
                            warn!(
                                product = %product.name,
                                machine_type,
                                "无适配机型机台，降级为全量随机"
                            );
                            &facility.machines[rng.random_range(0..facility.machines.len())]
                        } else {
                            suitable[rng.random_range(0..suitable.len())]
                        }
                    }
                    None => &facility.machines[rng.random_range(0..facility.machines.len())],
                };

                let employee = if operators.is_empty() {
                    &facility.employees[rng.random_range(0..facility.employees.len())]
                } else {
                    operators[rng.random_range(0..operators.len())]
                };

                let setup_minutes = rng.random_range(15..=45);
                let execution = derive_execution(
                    rng,
                    status,
                    quantity,
                    planned_start,
                    planned_end,
                    setup_minutes,
                    now,
                );

                let order = WorkOrder {
                    product_id: product.id,
                    work_center_id: machine.work_center_id,
                    machine_id: machine.id,
                    employee_id: employee.id,
                    quantity,
                    planned_start,
                    planned_end,
                    priority: priority_weights.sample(rng) as i64 + 1,
                    lead_time: (duration_hours * 1.2) as i64,
                    lot_number: lot.clone(),
                    execution: execution.clone(),
                };
                let id = WorkOrderRepository::insert(conn, &order)?;
                orders.push(OrderRecord {
                    id,
                    product_id: product.id,
                    work_center_name: machine.work_center_name.clone(),
                    machine_id: machine.id,
                    quantity,
                    planned_start,
                    planned_end,
                    lot_number: lot,
                    execution,
                });
                produced += 1;
            }
        }

        info!(orders = orders.len(), "工单生成完成");
        Ok(orders)
    }
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::seconds((hours * 3600.0) as i64)
}

/// 按状态派生实际执行字段
///
/// 状态机约束:
/// - Scheduled/Cancelled: 无任何实际值
/// - InProgress: 有实际开工（不晚于当前时刻），无实际完工，
///   actual_production + scrap < quantity
/// - Completed: actual_production + scrap = quantity，
///   actual_end 不晚于当前时刻
fn derive_execution(
    rng: &mut ChaCha8Rng,
    status: WorkOrderStatus,
    quantity: i64,
    planned_start: NaiveDateTime,
    planned_end: NaiveDateTime,
    setup_minutes: i64,
    now: NaiveDateTime,
) -> OrderExecution {
    let duration_hours =
        (planned_end - planned_start).num_seconds() as f64 / 3600.0;
    let actual_setup =
        ((setup_minutes as f64) * rng.random_range(0.8..=1.2)) as i64;

    match status {
        WorkOrderStatus::Scheduled => OrderExecution::Scheduled,
        WorkOrderStatus::Cancelled => OrderExecution::Cancelled,
        WorkOrderStatus::InProgress => {
            // 实际开工在计划附近抖动，但不能晚于当前时刻
            let jitter = hours_to_duration(duration_hours * rng.random_range(-0.1..=0.1));
            let mut actual_start = planned_start + jitter;
            if actual_start > now {
                actual_start = now - Duration::hours(rng.random_range(1..=4));
            }
            let fraction = rng.random_range(0.1..=0.9);
            let produced_so_far = (quantity as f64 * fraction) as i64;
            let scrap = (produced_so_far as f64 * rng.random_range(0.0..=0.05)) as i64;
            OrderExecution::InProgress {
                actual_start,
                actual_production: produced_so_far - scrap,
                scrap,
                setup_minutes: actual_setup,
            }
        }
        WorkOrderStatus::Completed => {
            let jitter = hours_to_duration(duration_hours * rng.random_range(-0.1..=0.1));
            let mut actual_start = planned_start + jitter;
            if actual_start >= now {
                actual_start = now - Duration::hours(rng.random_range(2..=6));
            }
            let efficiency = rng.random_range(0.8..=1.2);
            // 实际完工最晚截断到基准时刻，不产生"未来完工"的工单
            let actual_end =
                (actual_start + hours_to_duration(duration_hours * efficiency)).min(now);
            let scrap = (quantity as f64 * rng.random_range(0.0..=0.05)) as i64;
            OrderExecution::Completed {
                actual_start,
                actual_end,
                actual_production: quantity - scrap,
                scrap,
                setup_minutes: actual_setup,
            }
        }
    }
}
