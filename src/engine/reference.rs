// ==========================================
// MES 数据仿真系统 - 参考实体生成器
// ==========================================
// 职责: 生成无外键依赖的根实体
//       供应商 / 产品 / 库存物料 / 工作中心 / 班次
// 约束: 所有随机取值来自传入 RNG，名称池来自数据池配置
// ==========================================

use crate::config::DataPools;
use crate::domain::facility::{Shift, WorkCenter};
use crate::domain::product::Product;
use crate::domain::supply::{InventoryItem, Supplier};
use crate::domain::types::ProductLevel;
use crate::engine::error::{SimulatorError, SimulatorResult};
use crate::engine::{round2, routing, short_uuid};
use crate::repository::{
    InventoryRepository, ProductRepository, ShiftRepository, SupplierRepository,
    WorkCenterRepository,
};
use chrono::{Datelike, Duration, NaiveDateTime};
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use tracing::info;

/// 已落库的产品（后续阶段按层级抽样、查 BOM 用）
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub level: ProductLevel,
    pub standard_process_time: f64,
    pub cost: f64,
}

/// 已落库的库存物料
#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub id: i64,
    pub name: String,
}

/// 已落库的工作中心
#[derive(Debug, Clone)]
pub struct WorkCenterRecord {
    pub id: i64,
    pub name: String,
    /// 适配机型关键词（机台落位用）
    pub associated_machines: Vec<String>,
}

/// 参考实体阶段的产出（后续阶段的外键候选集）
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    pub supplier_ids: Vec<i64>,
    pub products: Vec<ProductRecord>,
    pub items: Vec<ItemRecord>,
    pub work_centers: Vec<WorkCenterRecord>,
    pub shift_ids: Vec<i64>,
}

pub struct ReferenceGenerator;

impl ReferenceGenerator {
    /// 生成全部根实体，返回后续阶段所需的 ID 集
    pub fn generate(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
    ) -> SimulatorResult<ReferenceSet> {
        let supplier_ids = Self::insert_suppliers(conn, pools, rng)?;
        let products = Self::insert_products(conn, pools, rng)?;
        let items = Self::insert_inventory(conn, pools, rng, now, &supplier_ids)?;
        let work_centers = Self::insert_work_centers(conn, pools, rng, now)?;
        let shift_ids = Self::insert_shifts(conn)?;

        info!(
            suppliers = supplier_ids.len(),
            products = products.len(),
            items = items.len(),
            work_centers = work_centers.len(),
            shifts = shift_ids.len(),
            "参考实体生成完成"
        );

        Ok(ReferenceSet {
            supplier_ids,
            products,
            items,
            work_centers,
            shift_ids,
        })
    }

    fn insert_suppliers(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
    ) -> SimulatorResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(pools.suppliers.len());
        for spec in &pools.suppliers {
            let contact_name: String = Name().fake_with_rng(rng);
            let email: String = FreeEmail().fake_with_rng(rng);
            let phone: String = PhoneNumber().fake_with_rng(rng);
            let supplier = Supplier {
                name: spec.name.clone(),
                lead_time: spec.lead_time,
                reliability_score: round2(rng.random_range(0.80..=0.99)),
                contact_info: format!("Contact: {}, Email: {}, Phone: {}", contact_name, email, phone),
            };
            ids.push(SupplierRepository::insert(conn, &supplier)?);
        }
        Ok(ids)
    }

    fn insert_products(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
    ) -> SimulatorResult<Vec<ProductRecord>> {
        let cost_range = &pools.cost_ranges.products;
        let mut products = Vec::with_capacity(pools.product_names.len());

        for (name, description) in pools
            .product_names
            .iter()
            .zip(pools.product_descriptions.iter())
        {
            let level = routing::product_level(name);
            let category = routing::product_category(name).to_string();

            let process_time =
                routing::process_time_factor(level) * rng.random_range(0.8..=1.2);

            // 成本按层级分桶: 成品最贵，原材料最便宜
            let cost = match level {
                ProductLevel::FinishedProduct => {
                    rng.random_range(cost_range.min * 5.0..=cost_range.max)
                }
                ProductLevel::Subassembly => {
                    rng.random_range(cost_range.min * 2.0..=cost_range.max * 0.6)
                }
                ProductLevel::Component => {
                    rng.random_range(cost_range.min..=cost_range.max * 0.3)
                }
                ProductLevel::RawMaterial => {
                    rng.random_range(cost_range.min * 0.1..=cost_range.max * 0.1)
                }
            };

            let product = Product {
                name: name.clone(),
                description: description.clone(),
                category: category.clone(),
                cost: round2(cost),
                standard_process_time: round2(process_time),
                is_active: rng.random_range(0..100) < 95,
            };
            let id = ProductRepository::insert(conn, &product)?;
            products.push(ProductRecord {
                id,
                name: name.clone(),
                category,
                level,
                standard_process_time: product.standard_process_time,
                cost: product.cost,
            });
        }
        Ok(products)
    }

    fn insert_inventory(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
        supplier_ids: &[i64],
    ) -> SimulatorResult<Vec<ItemRecord>> {
        if supplier_ids.is_empty() {
            return Err(SimulatorError::EmptyCandidateSet {
                stage: "reference/inventory",
                entity: "Suppliers",
            });
        }

        // 配置里实际存在的缺货候选中随机取 3 项，保持临界缺货状态
        let mut shortage_pool: Vec<&str> = routing::SHORTAGE_CANDIDATES
            .iter()
            .copied()
            .filter(|candidate| pools.inventory_names.iter().any(|n| n == candidate))
            .collect();
        shortage_pool.shuffle(rng);
        let shortage_items: Vec<&str> = shortage_pool.into_iter().take(3).collect();

        let cost_range = &pools.cost_ranges.components;
        let lead_min = pools.lead_time_range.min as i64;
        let lead_max = pools.lead_time_range.max as i64;
        let mut items = Vec::with_capacity(pools.inventory_names.len());

        for name in &pools.inventory_names {
            let category = match routing::inventory_category(name) {
                Some(c) => c.to_string(),
                None => pools
                    .material_categories
                    .choose(rng)
                    .cloned()
                    .unwrap_or_else(|| "Raw Material".to_string()),
            };

            let mut quantity: i64 = match category.as_str() {
                "Raw Material" => rng.random_range(100..=300),
                "Electronic Component" | "Mechanical Component" => rng.random_range(80..=200),
                "Assembly" => rng.random_range(50..=150),
                _ => rng.random_range(40..=120),
            };

            let is_shortage = shortage_items.iter().any(|s| s == name);
            if is_shortage {
                quantity = rng.random_range(5..=15);
            }

            let reorder_level: i64 = if routing::CRITICAL_RAW_MATERIALS.iter().any(|c| c == name) {
                (quantity as f64 * rng.random_range(0.05..=0.15)) as i64
            } else if is_shortage {
                // 再订货点远高于现库存，保证缺货告警可见
                rng.random_range(50..=80)
            } else {
                // 库存健康度加权: 充裕 / 适中 / 偏低
                let bucket = rng.random_range(0..100);
                let fraction = if bucket < 85 {
                    rng.random_range(0.05..=0.15)
                } else if bucket < 97 {
                    rng.random_range(0.15..=0.25)
                } else {
                    rng.random_range(0.4..=0.6)
                };
                (quantity as f64 * fraction) as i64
            };
            let reorder_level = reorder_level.max(1);

            let received_days_ago: i64 = if quantity < reorder_level {
                rng.random_range(1..=15)
            } else {
                rng.random_range(1..=90)
            };

            let item = InventoryItem {
                name: name.clone(),
                category,
                quantity,
                reorder_level,
                supplier_id: supplier_ids[rng.random_range(0..supplier_ids.len())],
                lead_time: rng.random_range(lead_min..=lead_max),
                cost: round2(rng.random_range(cost_range.min..=cost_range.max)),
                lot_number: format!("LOT-{}", short_uuid(rng)),
                location: pools
                    .storage_locations
                    .choose(rng)
                    .cloned()
                    .unwrap_or_else(|| "Warehouse A".to_string()),
                last_received_date: now - Duration::days(received_days_ago),
            };
            let id = InventoryRepository::insert(conn, &item)?;
            items.push(ItemRecord {
                id,
                name: name.clone(),
            });
        }
        Ok(items)
    }

    fn insert_work_centers(
        conn: &Connection,
        pools: &DataPools,
        rng: &mut ChaCha8Rng,
        now: NaiveDateTime,
    ) -> SimulatorResult<Vec<WorkCenterRecord>> {
        let cost_range = &pools.cost_ranges.work_centers;

        // 专用工序里随机指定一个瓶颈中心，产能压到 60-80%
        let bottleneck_pool: Vec<&str> = routing::BOTTLENECK_CANDIDATES
            .iter()
            .copied()
            .filter(|candidate| pools.work_centers.iter().any(|wc| &wc.name == candidate))
            .collect();
        let bottleneck = bottleneck_pool.choose(rng).copied();
        if let Some(name) = bottleneck {
            info!(work_center = name, "本轮产能瓶颈工作中心");
        }

        // 季节性产能系数: 冬季偏低，夏季偏高
        let seasonal_factor = match now.month() {
            11 | 12 | 1 => 0.9,
            6 | 7 | 8 => 1.1,
            _ => 1.0,
        };

        let mut centers = Vec::with_capacity(pools.work_centers.len());
        for spec in &pools.work_centers {
            let is_bottleneck = bottleneck == Some(spec.name.as_str());
            let capacity_factor = if is_bottleneck {
                rng.random_range(0.6..=0.8)
            } else {
                1.0
            };
            let description = if is_bottleneck {
                format!("{} (Current production bottleneck)", spec.description)
            } else {
                spec.description.clone()
            };

            // 备用产线可能停用
            let is_active = if spec.name == "Final Assembly Line 2" {
                rng.random_range(0..100) < 80
            } else {
                true
            };

            let center = WorkCenter {
                name: spec.name.clone(),
                description,
                capacity: round2(spec.capacity * capacity_factor * seasonal_factor),
                capacity_uom: spec.capacity_uom.clone(),
                cost_per_hour: round2(rng.random_range(cost_range.min..=cost_range.max)),
                location: routing::PLANT_AREAS
                    .choose(rng)
                    .copied()
                    .unwrap_or("Main Factory")
                    .to_string(),
                is_active,
            };
            let id = WorkCenterRepository::insert(conn, &center)?;
            centers.push(WorkCenterRecord {
                id,
                name: spec.name.clone(),
                associated_machines: spec.associated_machines.clone(),
            });
        }
        Ok(centers)
    }

    fn insert_shifts(conn: &Connection) -> SimulatorResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(routing::SHIFT_TABLE.len());
        for (name, start, end, capacity, is_weekend) in routing::SHIFT_TABLE {
            let shift = Shift {
                name: name.to_string(),
                start_time: start.to_string(),
                end_time: end.to_string(),
                capacity: *capacity,
                is_weekend: *is_weekend,
            };
            ids.push(ShiftRepository::insert(conn, &shift)?);
        }
        Ok(ids)
    }
}
