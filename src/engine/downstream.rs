// ==========================================
// MES 数据仿真系统 - 下游事件生成器
// ==========================================
// 职责: 基于工单与机台生成运行事件
//       质检/缺陷 -> 物料消耗 -> 停机 -> 日度 OEE
// 约束: 质检与消耗仅针对已开工工单；比率字段先 round4 再闭合；
//       停机只在时间窗与工单实际执行窗重叠时关联工单
// ==========================================

use crate::config::DataPools;
use crate::domain::events::{Downtime, MaterialConsumption, OeeMetric};
use crate::domain::quality::{Defect, QualityCheck};
use crate::domain::types::{DowntimeCategory, QcResult};
use crate::engine::dependent::FacilitySet;
use crate::engine::error::SimulatorResult;
use crate::engine::reference::ReferenceSet;
use crate::engine::routing;
use crate::engine::work_orders::OrderRecord;
use crate::engine::{round2, round4};
use crate::repository::{
    BomRepository, ConsumptionRepository, DefectRepository, DowntimeRepository, OeeRepository,
    QualityCheckRepository,
};
use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use tracing::{info, warn};

/// 下游事件阶段的行数统计
#[derive(Debug, Clone, Copy, Default)]
pub struct DownstreamCounts {
    pub quality_checks: usize,
    pub defects: usize,
    pub consumptions: usize,
    pub downtimes: usize,
    pub oee_rows: usize,
}

pub struct DownstreamGenerator;

impl DownstreamGenerator {
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        lookback_days: i64,
        reference: &ReferenceSet,
        facility: &FacilitySet,
        orders: &[OrderRecord],
    ) -> SimulatorResult<DownstreamCounts> {
        let mut counts = DownstreamCounts::default();

        Self::insert_quality_checks(conn, pools, rng, now, facility, orders, &mut counts)?;
        Self::insert_consumption(conn, rng, now, reference, orders, &mut counts)?;
        Self::insert_downtimes(
            conn, pools, rng, now, lookback_days, facility, orders, &mut counts,
        )?;
        Self::insert_oee_metrics(conn, rng, now, facility, &mut counts)?;

        info!(
            quality_checks = counts.quality_checks,
            defects = counts.defects,
            consumptions = counts.consumptions,
            downtimes = counts.downtimes,
            oee_rows = counts.oee_rows,
            "下游事件生成完成"
        );
        Ok(counts)
    }

    /// 每张已开工工单一条质检记录，缺陷率驱动缺陷明细
    fn insert_quality_checks(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        facility: &FacilitySet,
        orders: &[OrderRecord],
        counts: &mut DownstreamCounts,
    ) -> SimulatorResult<()> {
        let inspectors: Vec<i64> = {
            let qc: Vec<i64> = facility
                .employees
                .iter()
                .filter(|e| e.role == "Quality Control")
                .map(|e| e.id)
                .collect();
            if qc.is_empty() {
                warn!("无 Quality Control 岗位员工，质检员降级为全员随机");
                facility.employees.iter().map(|e| e.id).collect()
            } else {
                qc
            }
        };

        for order in orders.iter().filter(|o| o.execution.is_started()) {
            let qc_date = order.execution.actual_end().unwrap_or(now);
            let category = routing::defect_category(&order.work_center_name);

            // 基础缺陷率 = 2% × 工作中心质量系数 × 状态系数
            // 在制工单缺陷率偏高（尚未返工修正）
            let status_factor = if order.execution.actual_end().is_some() {
                0.8
            } else {
                1.2
            };
            let base_rate = 0.02
                * routing::work_center_quality_factor(&order.work_center_name)
                * status_factor;

            // 3% 概率出现质量事故
            let (defect_raw, rework_raw) = if rng.random_range(0..100) < 3 {
                (
                    base_rate * rng.random_range(2.0..=4.0),
                    rng.random_range(0.05..=0.2),
                )
            } else {
                (
                    base_rate * rng.random_range(0.5..=1.5),
                    rng.random_range(0.0..=0.1),
                )
            };

            // 先舍入缺陷率与返工率，良率取补，保证三者和恒为 1
            let defect_rate = round4(defect_raw.clamp(0.0, 0.5));
            let rework_rate = round4(rework_raw);
            let yield_rate = round4(1.0 - defect_rate - rework_rate);
            let result = QcResult::from_rates(defect_rate, rework_rate);

            let comments = match pools
                .qc_comments
                .get(category)
                .and_then(|pool| pool.choose(rng))
            {
                Some(base) => {
                    let suffix = match result {
                        QcResult::Pass => ". Passed quality inspection.",
                        QcResult::Rework => ". Minor issues require rework.",
                        QcResult::Fail => ". Significant issues detected, failed QC.",
                    };
                    format!("{}{}", base, suffix)
                }
                None => "Standard quality check performed.".to_string(),
            };

            let check = QualityCheck {
                order_id: order.id,
                date: qc_date,
                result,
                comments,
                defect_rate,
                rework_rate,
                yield_rate,
                inspector_id: inspectors[rng.random_range(0..inspectors.len())],
            };
            let check_id = QualityCheckRepository::insert(conn, &check)?;
            counts.quality_checks += 1;

            if defect_rate > 0.0 {
                counts.defects +=
                    Self::insert_defects(conn, rng, order, check_id, defect_rate, category)?;
            }
        }
        Ok(())
    }

    /// 按缺陷率折算缺陷件数，拆分到 1-3 种缺陷类型
    fn insert_defects(
        conn: &Connection,
        rng: &mut ChaCha8Rng,
        order: &OrderRecord,
        check_id: i64,
        defect_rate: f64,
        category: &str,
    ) -> SimulatorResult<usize> {
        let pool = routing::defect_pool(category);
        let total = ((order.quantity as f64 * defect_rate) as i64).max(1);

        let type_count = rng.random_range(1..=pool.len().min(3)).min(total as usize);
        let defect_types: Vec<&str> = pool.choose_multiple(rng, type_count).copied().collect();
        let quantities = distribute_quantity(rng, total, defect_types.len());

        // 缺陷率越高严重度越高
        let (severity_min, severity_max) = if defect_rate > 0.2 {
            (3, 5)
        } else if defect_rate > 0.1 {
            (2, 4)
        } else {
            (1, 3)
        };

        for (defect_type, quantity) in defect_types.iter().zip(quantities) {
            let severity = rng.random_range(severity_min..=severity_max);
            let defect = Defect {
                check_id,
                defect_type: defect_type.to_string(),
                severity,
                quantity,
                location: routing::DEFECT_LOCATIONS
                    .choose(rng)
                    .copied()
                    .unwrap_or("Center")
                    .to_string(),
                root_cause: routing::root_cause_pool(&order.work_center_name)
                    .choose(rng)
                    .copied()
                    .unwrap_or("Under investigation")
                    .to_string(),
                action_taken: routing::action_pool(severity)
                    .choose(rng)
                    .copied()
                    .unwrap_or("Logged for review")
                    .to_string(),
            };
            DefectRepository::insert(conn, &defect)?;
        }
        Ok(defect_types.len())
    }

    /// 已开工工单按 BOM 展开物料消耗；无 BOM 的产品随机取 3-5 项物料
    fn insert_consumption(
        conn: &Connection,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        reference: &ReferenceSet,
        orders: &[OrderRecord],
        counts: &mut DownstreamCounts,
    ) -> SimulatorResult<()> {
        for order in orders.iter().filter(|o| o.execution.is_started()) {
            let consumption_date = order.execution.actual_end().unwrap_or(now);
            let completed = order.execution.actual_end().is_some();

            let bom = BomRepository::list_for_product(conn, order.product_id)?;
            let lines: Vec<(i64, f64)> = if bom.is_empty() {
                // 无 BOM: 随机物料近似（单耗 5%-50% 折算）
                let count = rng.random_range(3..=5).min(reference.items.len());
                reference
                    .items
                    .choose_multiple(rng, count)
                    .map(|item| {
                        (
                            item.id,
                            round2(order.quantity as f64 * rng.random_range(0.05..=0.5)),
                        )
                    })
                    .collect()
            } else {
                bom.iter()
                    .map(|line| {
                        (
                            line.component_item_id,
                            line.quantity * order.quantity as f64 * (1.0 + line.scrap_factor),
                        )
                    })
                    .collect()
            };

            for (item_id, planned_quantity) in lines {
                // 已完工: 计划附近波动；在制: 只消耗了部分
                let actual_quantity = if completed {
                    planned_quantity * (1.0 + rng.random_range(-0.05..=0.10))
                } else {
                    planned_quantity * rng.random_range(0.3..=0.8)
                };
                let variance_percent = if planned_quantity > 0.0 {
                    round2((actual_quantity - planned_quantity) / planned_quantity * 100.0)
                } else {
                    0.0
                };

                ConsumptionRepository::insert(
                    conn,
                    &MaterialConsumption {
                        order_id: order.id,
                        item_id,
                        planned_quantity: round2(planned_quantity),
                        actual_quantity: round2(actual_quantity),
                        variance_percent,
                        consumption_date,
                        lot_number: order.lot_number.clone(),
                    },
                )?;
                counts.consumptions += 1;
            }
        }
        Ok(())
    }

    /// 每台机台 0-3 条停机，保养逾期机台非计划停机概率上浮
    #[allow(clippy::too_many_arguments)]
    fn insert_downtimes(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        lookback_days: i64,
        facility: &FacilitySet,
        orders: &[OrderRecord],
        counts: &mut DownstreamCounts,
    ) -> SimulatorResult<()> {
        let count_weights = WeightedIndex::new([50u32, 30, 15, 5])?;

        let technicians: Vec<i64> = facility
            .employees
            .iter()
            .filter(|e| e.role == "Technician")
            .map(|e| e.id)
            .collect();
        let operators: Vec<i64> = facility
            .employees
            .iter()
            .filter(|e| e.role == "Operator")
            .map(|e| e.id)
            .collect();
        let everyone: Vec<i64> = facility.employees.iter().map(|e| e.id).collect();

        for machine in &facility.machines {
            let event_count = count_weights.sample(rng);
            if event_count == 0 {
                continue;
            }

            let days_since_maintenance = (now - machine.last_maintenance_date).num_days();
            let overdue = days_since_maintenance > 30;

            // 距上次保养越久，非计划停机概率越高
            let base_prob = if days_since_maintenance < 15 {
                0.02
            } else if days_since_maintenance < 30 {
                0.05
            } else {
                (0.05 + (days_since_maintenance - 30) as f64 * 0.005).min(0.15)
            };
            let unplanned_prob =
                base_prob * routing::breakdown_factor(&machine.machine_type);
            let category_weights =
                WeightedIndex::new([(1.0 - unplanned_prob).max(0.1), unplanned_prob])?;

            for _ in 0..event_count {
                let category = if category_weights.sample(rng) == 0 {
                    DowntimeCategory::Planned
                } else {
                    DowntimeCategory::Unplanned
                };

                let reason = match category {
                    DowntimeCategory::Planned => pools
                        .downtime_reasons
                        .planned
                        .choose(rng)
                        .cloned()
                        .unwrap_or_else(|| "Scheduled Maintenance".to_string()),
                    DowntimeCategory::Unplanned => {
                        Self::pick_unplanned_reason(pools, rng, overdue)?
                    }
                };

                let duration_minutes: i64 = match reason.as_str() {
                    "Scheduled Maintenance" => rng.random_range(60..=240),
                    "Equipment Failure" => {
                        if overdue {
                            rng.random_range(60..=240)
                        } else {
                            rng.random_range(30..=120)
                        }
                    }
                    "Setup/Changeover" | "Cleaning" => rng.random_range(15..=60),
                    _ => rng.random_range(10..=90),
                };

                let start_time =
                    now - Duration::minutes(rng.random_range(0..=lookback_days * 24 * 60));
                let end_time = start_time + Duration::minutes(duration_minutes);
                // 跨过当前时刻的停机视为仍在进行
                let (end_time, duration) = if end_time > now {
                    (None, None)
                } else {
                    (Some(end_time), Some(duration_minutes))
                };

                let window_end = end_time.unwrap_or(now);
                let order_id = orders
                    .iter()
                    .find(|o| {
                        o.machine_id == machine.id
                            && o.execution.actual_start().is_some_and(|s| s <= window_end)
                            && o.execution.actual_end().unwrap_or(now) >= start_time
                    })
                    .map(|o| o.id);

                // 设备类停机由技术员上报，其余操作工为主
                let technical = matches!(category, DowntimeCategory::Planned)
                    || matches!(
                        reason.as_str(),
                        "Equipment Failure" | "Tool Breakage" | "Unexpected Maintenance"
                    );
                let reporter_pool: &[i64] = if technical && !technicians.is_empty() {
                    &technicians
                } else if !technical && !operators.is_empty() {
                    if rng.random_range(0..100) < 70 || technicians.is_empty() {
                        &operators
                    } else {
                        &technicians
                    }
                } else {
                    &everyone
                };

                let description = match routing::downtime_descriptions(&reason)
                    .and_then(|pool| pool.choose(rng))
                {
                    Some(text) => text.to_string(),
                    None => format!("{} occurred", reason),
                };

                DowntimeRepository::insert(
                    conn,
                    &Downtime {
                        machine_id: machine.id,
                        order_id,
                        start_time,
                        end_time,
                        duration,
                        reason,
                        category,
                        description,
                        reported_by: reporter_pool[rng.random_range(0..reporter_pool.len())],
                    },
                )?;
                counts.downtimes += 1;
            }
        }
        Ok(())
    }

    /// 非计划停机原因按保养状态加权抽样
    ///
    /// 逾期机台偏向设备故障/意外维修，新保养机台偏向缺料/缺员
    fn pick_unplanned_reason(
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        overdue: bool,
    ) -> SimulatorResult<String> {
        let weighted: Vec<(&str, u32)> = routing::UNPLANNED_REASON_WEIGHTS
            .iter()
            .filter(|(reason, _, _)| pools.downtime_reasons.unplanned.iter().any(|r| r == reason))
            .map(|(reason, when_overdue, when_fresh)| {
                (*reason, if overdue { *when_overdue } else { *when_fresh })
            })
            .collect();

        if weighted.is_empty() {
            return Ok(pools
                .downtime_reasons
                .unplanned
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "Equipment Failure".to_string()));
        }

        let index = WeightedIndex::new(weighted.iter().map(|(_, w)| *w))?.sample(rng);
        Ok(weighted[index].0.to_string())
    }

    /// 每台机台近 31 天的日度 OEE，叠加机龄/保养周期/日历效应
    fn insert_oee_metrics(
        conn: &Connection,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        facility: &FacilitySet,
        counts: &mut DownstreamCounts,
    ) -> SimulatorResult<()> {
        for machine in &facility.machines {
            let (base_availability, base_performance, base_quality) =
                routing::oee_baseline(&machine.machine_type);

            // 机龄衰减: 每年 2%，下限 85%
            let years_old =
                (now - machine.installation_date).num_days() as f64 / 365.0;
            let age_factor = (1.0 - years_old * 0.02).max(0.85);
            let availability_age = age_factor * 0.9 + 0.1;
            let performance_age = age_factor * 0.8 + 0.2;
            let quality_age = age_factor * 0.95 + 0.05;

            // 15% 的机台在窗口中段出现一次小故障，次日部分恢复
            let failure_day: Option<i64> = if rng.random_range(0..100) < 15 {
                Some(rng.random_range(5..=25))
            } else {
                None
            };

            for day_index in 0..=30i64 {
                let date = now - Duration::days(30 - day_index);

                // 保养周期内的性能滑坡
                let hours_since_maintenance =
                    (date - machine.last_maintenance_date).num_hours() as f64;
                let cycle_position = (hours_since_maintenance
                    / machine.maintenance_frequency as f64)
                    .clamp(0.0, 1.0);
                let availability_maint =
                    (1.0 - 0.2 * cycle_position.powf(1.5)).max(0.8);
                let performance_maint =
                    (1.0 - 0.15 * cycle_position.powf(1.2)).max(0.85);
                let quality_maint = (1.0 - 0.1 * cycle_position).max(0.9);

                let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
                let weekend_factor = if weekend { 0.95 } else { 1.0 };
                let month_start_factor = if date.day() < 3 { 0.98 } else { 1.0 };
                let daily_noise = rng.random_range(0.97..=1.03);

                // 临近计划保养的预防性减速
                let days_to_next =
                    (machine.next_maintenance_date - date).num_days();
                let pre_maintenance_factor = if days_to_next > 0 && days_to_next < 10 {
                    1.0 - 0.05 * (10 - days_to_next) as f64 / 10.0
                } else {
                    1.0
                };

                let failure_factor = match failure_day {
                    Some(day) if day_index == day => rng.random_range(0.5..=0.7),
                    Some(day) if day_index == day + 1 => rng.random_range(0.7..=0.9),
                    _ => 1.0,
                };

                let availability = round4(
                    (base_availability
                        * availability_age
                        * availability_maint
                        * weekend_factor
                        * month_start_factor
                        * daily_noise
                        * pre_maintenance_factor
                        * failure_factor)
                        .min(0.998),
                );
                let performance = round4(
                    (base_performance
                        * performance_age
                        * performance_maint
                        * weekend_factor
                        * month_start_factor
                        * daily_noise
                        * pre_maintenance_factor
                        * failure_factor)
                        .min(0.998),
                );
                // 质量对日常波动与故障的敏感度低于可用率
                let quality = round4(
                    (base_quality
                        * quality_age
                        * quality_maint
                        * (daily_noise * 0.3 + 0.7)
                        * (failure_factor * 0.5 + 0.5))
                        .min(0.999),
                );
                let oee = round4(availability * performance * quality);

                let planned_production_time: i64 = if weekend { 240 } else { 480 };
                let downtime =
                    (planned_production_time as f64 * (1.0 - availability)) as i64;

                OeeRepository::insert(
                    conn,
                    &OeeMetric {
                        machine_id: machine.id,
                        date,
                        availability,
                        performance,
                        quality,
                        oee,
                        planned_production_time,
                        actual_production_time: planned_production_time - downtime,
                        downtime,
                    },
                )?;
                counts.oee_rows += 1;
            }
        }
        Ok(())
    }
}

/// 把缺陷总数随机拆成 n 份，每份至少 1
fn distribute_quantity(rng: &mut ChaCha8Rng, total: i64, parts: usize) -> Vec<i64> {
    let parts = parts.max(1).min((total as usize).max(1));
    let mut remaining = total;
    let mut result = Vec::with_capacity(parts);
    for i in 0..parts {
        let slots_left = (parts - i - 1) as i64;
        if i == parts - 1 {
            result.push(remaining);
        } else {
            let share = rng.random_range(1..=(remaining - slots_left).max(1));
            result.push(share);
            remaining -= share;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn distribute_covers_total() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for total in [1i64, 2, 3, 10, 250] {
            for parts in 1..=3usize {
                let shares = distribute_quantity(&mut rng, total, parts);
                assert_eq!(shares.iter().sum::<i64>(), total);
                assert!(shares.iter().all(|&s| s >= 1));
            }
        }
    }
}
