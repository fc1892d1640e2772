// ==========================================
// MES 数据仿真系统 - 仿真调度器
// ==========================================
// 职责: 按阶段顺序驱动生成器，保证引用与时间一致性
// 事务语义: 四个阶段在同一个事务内完成，任一阶段失败整体回滚，
//           数据库要么为空要么是一致的完整数据集
// 复现语义: 同种子 + 同基准时刻 + 同配置 => 逐字节相同的数据集
// ==========================================

use crate::config::DataPools;
use crate::db;
use crate::engine::dependent::DependentGenerator;
use crate::engine::downstream::DownstreamGenerator;
use crate::engine::error::SimulatorResult;
use crate::engine::reference::ReferenceGenerator;
use crate::engine::work_orders::WorkOrderGenerator;
use crate::repository;
use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;
use tracing::info;

/// 仿真参数
#[derive(Debug, Clone)]
pub struct SimulatorOptions {
    /// 随机种子，None 时取基准时刻的 Unix 秒
    pub seed: Option<u64>,
    /// 历史数据窗口（天）
    pub lookback_days: i64,
    /// 排程数据窗口（天）
    pub lookahead_days: i64,
    /// 工单数量
    pub order_count: usize,
    /// 员工数量
    pub employee_count: usize,
    /// 所有相对时间的锚点（"当前时刻"）
    pub reference_time: NaiveDateTime,
}

impl SimulatorOptions {
    pub fn new(reference_time: NaiveDateTime) -> Self {
        SimulatorOptions {
            seed: None,
            lookback_days: 90,
            lookahead_days: 14,
            order_count: 200,
            employee_count: 50,
            reference_time,
        }
    }

    fn effective_seed(&self) -> u64 {
        self.seed
            .unwrap_or_else(|| self.reference_time.and_utc().timestamp() as u64)
    }
}

/// 一轮生成的行数统计
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationSummary {
    pub suppliers: usize,
    pub products: usize,
    pub inventory_items: usize,
    pub work_centers: usize,
    pub shifts: usize,
    pub machines: usize,
    pub employees: usize,
    pub work_orders: usize,
    pub quality_checks: usize,
    pub defects: usize,
    pub consumptions: usize,
    pub downtimes: usize,
    pub oee_rows: usize,
}

/// MES 数据仿真器
pub struct MesSimulator {
    pools: DataPools,
    options: SimulatorOptions,
}

impl MesSimulator {
    pub fn new(pools: DataPools, options: SimulatorOptions) -> Self {
        MesSimulator { pools, options }
    }

    /// 建表建索引（幂等）
    pub fn create_schema(&self, conn: &Connection) -> SimulatorResult<()> {
        repository::create_schema(conn)?;
        Ok(())
    }

    /// 全量生成（单事务）
    pub fn generate_all(&self, conn: &mut Connection) -> SimulatorResult<GenerationSummary> {
        let seed = self.options.effective_seed();
        let now = self.options.reference_time;
        info!(
            seed,
            reference_time = %now,
            lookback_days = self.options.lookback_days,
            lookahead_days = self.options.lookahead_days,
            order_count = self.options.order_count,
            "开始生成仿真数据集"
        );
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let tx = conn.transaction()?;

        let mut reference = ReferenceGenerator::generate(&tx, &self.pools, &mut rng, now)?;
        let facility = DependentGenerator::generate(
            &tx,
            &self.pools,
            &mut rng,
            now,
            &mut reference,
            self.options.employee_count,
        )?;
        let orders = WorkOrderGenerator::generate(
            &tx,
            &mut rng,
            now,
            self.options.lookback_days,
            self.options.lookahead_days,
            self.options.order_count,
            &reference,
            &facility,
        )?;
        let downstream = DownstreamGenerator::generate(
            &tx,
            &self.pools,
            &mut rng,
            now,
            self.options.lookback_days,
            &reference,
            &facility,
            &orders,
        )?;

        tx.commit()?;

        let summary = GenerationSummary {
            suppliers: self.pools.suppliers.len(),
            products: reference.products.len(),
            inventory_items: reference.items.len(),
            work_centers: reference.work_centers.len(),
            shifts: reference.shift_ids.len(),
            machines: facility.machines.len(),
            employees: facility.employees.len(),
            work_orders: orders.len(),
            quality_checks: downstream.quality_checks,
            defects: downstream.defects,
            consumptions: downstream.consumptions,
            downtimes: downstream.downtimes,
            oee_rows: downstream.oee_rows,
        };
        info!(?summary, "仿真数据集生成完成");
        Ok(summary)
    }

    /// 清空既有数据后重新生成（保留表结构）
    pub fn refresh(&self, conn: &mut Connection) -> SimulatorResult<GenerationSummary> {
        info!("清空既有数据集");
        db::truncate_all_tables(conn)?;
        self.generate_all(conn)
    }
}
