// ==========================================
// MES 数据仿真系统 - 依赖实体生成器
// ==========================================
// 职责: 生成引用根实体的二级实体
//       BOM 行 / 机台 / 员工
// 要点: 机台按 associated_machines 关键词落位，落空降级为
//       全量随机并记 warn；BOM 按固定配方表展开
// ==========================================

use crate::config::DataPools;
use crate::domain::facility::{Employee, Machine};
use crate::domain::product::BomLine;
use crate::domain::supply::InventoryItem;
use crate::domain::types::{MachineStatus, ProductLevel};
use crate::engine::error::{SimulatorError, SimulatorResult};
use crate::engine::reference::{ItemRecord, ReferenceSet};
use crate::engine::{round2, routing, short_uuid};
use crate::repository::{BomRepository, EmployeeRepository, InventoryRepository, MachineRepository};
use chrono::{Duration, NaiveDateTime};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use tracing::{info, warn};

/// 已落库的机台（工单分派与下游事件生成用）
#[derive(Debug, Clone)]
pub struct MachineRecord {
    pub id: i64,
    pub machine_type: String,
    pub work_center_id: i64,
    pub work_center_name: String,
    pub installation_date: NaiveDateTime,
    pub last_maintenance_date: NaiveDateTime,
    pub next_maintenance_date: NaiveDateTime,
    pub maintenance_frequency: i64,
}

/// 已落库的员工
#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub id: i64,
    pub role: String,
}

/// 依赖实体阶段的产出
#[derive(Debug, Clone)]
pub struct FacilitySet {
    pub machines: Vec<MachineRecord>,
    pub employees: Vec<EmployeeRecord>,
}

pub struct DependentGenerator;

impl DependentGenerator {
    pub fn generate(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        reference: &mut ReferenceSet,
        employee_count: usize,
    ) -> SimulatorResult<FacilitySet> {
        let bom_lines = Self::insert_bill_of_materials(conn, pools, rng, now, reference)?;
        let machines = Self::insert_machines(conn, pools, rng, now, reference)?;
        let employees = Self::insert_employees(conn, pools, rng, now, reference, employee_count)?;

        info!(
            bom_lines,
            machines = machines.len(),
            employees = employees.len(),
            "依赖实体生成完成"
        );
        Ok(FacilitySet {
            machines,
            employees,
        })
    }

    /// 按固定配方表展开 BOM，未覆盖的产品补兜底组件
    ///
    /// 配方里的子装配（Frame/Wheel 等）同时是产品: 若库存中不存在同名
    /// 物料，先为其补建库存行，保证 BOM 外键始终指向 Inventory。
    fn insert_bill_of_materials(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        reference: &mut ReferenceSet,
    ) -> SimulatorResult<usize> {
        let first_supplier = *reference.supplier_ids.first().ok_or(
            SimulatorError::EmptyCandidateSet {
                stage: "dependent/bom",
                entity: "Suppliers",
            },
        )?;

        // 配方引用但库存缺失的产品型组件，补建库存行
        for (_, components) in routing::BOM_STRUCTURE {
            for (component_name, _) in components.iter() {
                let in_inventory = reference
                    .items
                    .iter()
                    .any(|item| item.name.eq_ignore_ascii_case(component_name));
                if in_inventory {
                    continue;
                }
                let Some(product) = reference
                    .products
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(component_name))
                else {
                    continue;
                };

                let item = InventoryItem {
                    name: product.name.clone(),
                    category: product.category.clone(),
                    quantity: rng.random_range(20..=100),
                    reorder_level: rng.random_range(10..=30),
                    supplier_id: first_supplier,
                    lead_time: rng.random_range(5..=15),
                    cost: round2(product.cost * rng.random_range(0.7..=0.9)),
                    lot_number: format!("LOT-{}", short_uuid(rng)),
                    location: pools
                        .storage_locations
                        .choose(rng)
                        .cloned()
                        .unwrap_or_else(|| "Warehouse A".to_string()),
                    last_received_date: now - Duration::days(rng.random_range(1..=30)),
                };
                let id = InventoryRepository::insert(conn, &item)?;
                info!(component = %item.name, item_id = id, "为产品型组件补建库存行");
                reference.items.push(ItemRecord {
                    id,
                    name: item.name.clone(),
                });
            }
        }

        let mut inserted = 0usize;

        // 配方表展开
        for (parent_name, components) in routing::BOM_STRUCTURE {
            let Some(parent) = reference
                .products
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(parent_name))
            else {
                warn!(product = parent_name, "配方父项不在产品池中，跳过");
                continue;
            };
            if BomRepository::has_bom(conn, parent.id)? {
                continue;
            }

            for (component_name, quantity) in components.iter() {
                let Some(item) = reference
                    .items
                    .iter()
                    .find(|i| i.name.eq_ignore_ascii_case(component_name))
                else {
                    warn!(
                        product = parent_name,
                        component = component_name,
                        "配方组件不在库存池中，跳过该行"
                    );
                    continue;
                };

                // 原材料损耗高，组件损耗低
                let scrap_factor = match routing::product_level(&item.name) {
                    ProductLevel::RawMaterial => round2(rng.random_range(0.05..=0.15)),
                    _ => round2(rng.random_range(0.0..=0.05)),
                };
                BomRepository::insert(
                    conn,
                    &BomLine {
                        product_id: parent.id,
                        component_item_id: item.id,
                        quantity: *quantity,
                        scrap_factor,
                    },
                )?;
                inserted += 1;
            }
        }

        // 未覆盖的非原材料产品补兜底组件
        let default_ids: Vec<(i64, &str)> = routing::DEFAULT_BOM_COMPONENTS
            .iter()
            .filter_map(|name| {
                reference
                    .items
                    .iter()
                    .find(|i| i.name.eq_ignore_ascii_case(name))
                    .map(|i| (i.id, *name))
            })
            .collect();

        for product in &reference.products {
            if routing::BOM_STRUCTURE
                .iter()
                .any(|(name, _)| product.name.eq_ignore_ascii_case(name))
            {
                continue;
            }
            if product.level == ProductLevel::RawMaterial {
                continue;
            }
            if default_ids.is_empty() || BomRepository::has_bom(conn, product.id)? {
                continue;
            }

            let count = rng.random_range(1..=default_ids.len());
            let (qty_min, qty_max) = routing::default_bom_quantity_range(product.level);
            for (item_id, _) in default_ids.choose_multiple(rng, count) {
                BomRepository::insert(
                    conn,
                    &BomLine {
                        product_id: product.id,
                        component_item_id: *item_id,
                        quantity: rng.random_range(qty_min..=qty_max) as f64,
                        scrap_factor: round2(rng.random_range(0.01..=0.05)),
                    },
                )?;
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    /// 每种机型建 1-3 台，按 associated_machines 关键词落位
    fn insert_machines(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        reference: &ReferenceSet,
    ) -> SimulatorResult<Vec<MachineRecord>> {
        if reference.work_centers.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "dependent/machines",
                entity: "WorkCenters",
            });
        }

        let cost_range = &pools.cost_ranges.machines;
        let status_weights = WeightedIndex::new([80u32, 15, 4, 1])?;
        let status_pool = [
            MachineStatus::Running,
            MachineStatus::Idle,
            MachineStatus::Maintenance,
            MachineStatus::Breakdown,
        ];

        let mut machines = Vec::new();
        for (index, machine_type) in pools.machine_types.iter().enumerate() {
            let capacity = &pools.nominal_capacity[machine_type];
            let uom = &pools.capacity_uom[machine_type];
            // 机台命名取机型前 3 个字符，按字符而非字节截断
            let type_prefix: String = machine_type.chars().take(3).collect();

            // 按关键词匹配适配的工作中心
            let mut suitable: Vec<&crate::engine::reference::WorkCenterRecord> = reference
                .work_centers
                .iter()
                .filter(|wc| {
                    wc.associated_machines.iter().any(|assoc| {
                        assoc
                            .to_lowercase()
                            .contains(&machine_type.to_lowercase())
                    })
                })
                .collect();
            if suitable.is_empty() {
                warn!(machine_type = %machine_type, "无适配工作中心，降级为全量随机落位");
                suitable = reference.work_centers.iter().collect();
            }

            for unit in 0..rng.random_range(1..=3) {
                let work_center = suitable[rng.random_range(0..suitable.len())];

                let installation_date = now - Duration::days(rng.random_range(90..=1000));
                let last_maintenance = now - Duration::days(rng.random_range(1..=30));
                let maintenance_frequency = rng.random_range(200..=300);
                let next_maintenance = last_maintenance + Duration::hours(maintenance_frequency);

                // 机龄越大效率越低
                let days_old = (now - installation_date).num_days();
                let efficiency = round2((0.98 - days_old as f64 / 10_000.0).max(0.7));

                let machine = Machine {
                    name: format!("Machine {}-{}{}", type_prefix, index + 1, unit),
                    machine_type: machine_type.clone(),
                    work_center_id: work_center.id,
                    status: status_pool[status_weights.sample(rng)],
                    nominal_capacity: round2(rng.random_range(capacity.min..=capacity.max)),
                    capacity_uom: uom.clone(),
                    setup_time: rng.random_range(10..=30),
                    efficiency_factor: efficiency,
                    maintenance_frequency,
                    last_maintenance_date: last_maintenance,
                    next_maintenance_date: next_maintenance,
                    product_changeover_time: rng.random_range(15..=45),
                    cost_per_hour: round2(rng.random_range(cost_range.min..=cost_range.max)),
                    installation_date,
                    model_number: routing::machine_models(machine_type)
                        .choose(rng)
                        .copied()
                        .unwrap_or("STD-100")
                        .to_string(),
                };
                let id = MachineRepository::insert(conn, &machine)?;
                machines.push(MachineRecord {
                    id,
                    machine_type: machine_type.clone(),
                    work_center_id: work_center.id,
                    work_center_name: work_center.name.clone(),
                    installation_date,
                    last_maintenance_date: last_maintenance,
                    next_maintenance_date: next_maintenance,
                    maintenance_frequency,
                });
            }
        }
        Ok(machines)
    }

    /// 岗位按权重分布，时薪随岗位与工龄上浮
    fn insert_employees(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        reference: &ReferenceSet,
        employee_count: usize,
    ) -> SimulatorResult<Vec<EmployeeRecord>> {
        if reference.shift_ids.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "dependent/employees",
                entity: "Shifts",
            });
        }

        let role_weights =
            WeightedIndex::new(routing::ROLE_TABLE.iter().map(|(_, weight, _, _)| *weight))?;
        let tenure_weights = WeightedIndex::new([20u32, 50, 30])?;
        let base_rate = pools.employee_hourly_rate_range.min;

        let mut employees = Vec::with_capacity(employee_count);
        for _ in 0..employee_count {
            let (role, _, rate_offset, skill_pool) = routing::ROLE_TABLE[role_weights.sample(rng)];

            let skill_count = rng.random_range(2..=skill_pool.len().min(4));
            let skills: Vec<&str> = skill_pool
                .choose_multiple(rng, skill_count)
                .copied()
                .collect();

            // 工龄分桶: 新人 / 常规 / 资深
            let days_employed: i64 = match tenure_weights.sample(rng) {
                0 => rng.random_range(1..=90),
                1 => rng.random_range(91..=365),
                _ => rng.random_range(366..=1825),
            };
            // 工龄加成最高 20%（满 5 年）
            let tenure_bonus = (days_employed as f64 / 1825.0 * 0.2).min(0.2);
            let hourly_rate = round2((base_rate + rate_offset) * (1.0 + tenure_bonus));

            let employee = Employee {
                name: Name().fake_with_rng(rng),
                role: role.to_string(),
                shift_id: reference.shift_ids[rng.random_range(0..reference.shift_ids.len())],
                hourly_rate,
                skills: skills.join(", "),
                hire_date: now - Duration::days(days_employed),
            };
            let id = EmployeeRepository::insert(conn, &employee)?;
            employees.push(EmployeeRecord {
                id,
                role: role.to_string(),
            });
        }
        Ok(employees)
    }
}
