// ==========================================
// MES 数据仿真系统 - 运行事件仓储
// ==========================================
// 职责: MaterialConsumption / Downtimes / OEEMetrics 表的数据访问
// ==========================================

use crate::domain::events::{Downtime, MaterialConsumption, OeeMetric};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

pub struct ConsumptionRepository;

impl ConsumptionRepository {
    /// 插入物料消耗记录，返回自增 ConsumptionID
    pub fn insert(conn: &Connection, record: &MaterialConsumption) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO MaterialConsumption (
                OrderID, ItemID, PlannedQuantity, ActualQuantity,
                VariancePercent, ConsumptionDate, LotNumber
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.order_id,
                record.item_id,
                record.planned_quantity,
                record.actual_quantity,
                record.variance_percent,
                record.consumption_date,
                record.lot_number,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct DowntimeRepository;

impl DowntimeRepository {
    /// 插入停机事件，返回自增 DowntimeID
    pub fn insert(conn: &Connection, downtime: &Downtime) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Downtimes (
                MachineID, OrderID, StartTime, EndTime, Duration,
                Reason, Category, Description, ReportedBy
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                downtime.machine_id,
                downtime.order_id,
                downtime.start_time,
                downtime.end_time,
                downtime.duration,
                downtime.reason,
                downtime.category.as_str(),
                downtime.description,
                downtime.reported_by,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct OeeRepository;

impl OeeRepository {
    /// 插入 OEE 日度指标，返回自增 MetricID
    pub fn insert(conn: &Connection, metric: &OeeMetric) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO OEEMetrics (
                MachineID, Date, Availability, Performance, Quality, OEE,
                PlannedProductionTime, ActualProductionTime, Downtime
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                metric.machine_id,
                metric.date,
                metric.availability,
                metric.performance,
                metric.quality,
                metric.oee,
                metric.planned_production_time,
                metric.actual_production_time,
                metric.downtime,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
