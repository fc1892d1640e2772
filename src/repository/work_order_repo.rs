// ==========================================
// MES 数据仿真系统 - 工单仓储
// ==========================================
// 职责: WorkOrders 表的数据访问
// 说明: 列映射时由 OrderExecution 变体派生可空列，
//       scheduled/cancelled 的实际执行列必然写入 NULL
// ==========================================

use crate::domain::types::WorkOrderStatus;
use crate::domain::work_order::WorkOrder;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

/// 产线流图所需的工单行
#[derive(Debug, Clone)]
pub struct OrderFlowRow {
    pub order_id: i64,
    pub lot_number: String,
    pub product_name: String,
    pub product_category: String,
    pub quantity: i64,
    pub planned_start: NaiveDateTime,
    pub planned_end: NaiveDateTime,
    pub status: WorkOrderStatus,
    pub work_center_name: String,
}

pub struct WorkOrderRepository;

impl WorkOrderRepository {
    /// 插入工单，返回自增 OrderID
    pub fn insert(conn: &Connection, order: &WorkOrder) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO WorkOrders (
                ProductID, WorkCenterID, MachineID, EmployeeID, Quantity,
                PlannedStartTime, PlannedEndTime, ActualStartTime, ActualEndTime,
                Status, Priority, LeadTime, LotNumber,
                ActualProduction, Scrap, SetupTimeActual
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                order.product_id,
                order.work_center_id,
                order.machine_id,
                order.employee_id,
                order.quantity,
                order.planned_start,
                order.planned_end,
                order.execution.actual_start(),
                order.execution.actual_end(),
                order.status().as_str(),
                order.priority,
                order.lead_time,
                order.lot_number,
                order.execution.actual_production(),
                order.execution.scrap(),
                order.execution.setup_minutes(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询产线流图所需的工单行（可按批次号过滤）
    ///
    /// 按 OrderID 排序，保证图构建顺序确定。
    pub fn list_flow_rows(
        conn: &Connection,
        lot_number: Option<&str>,
    ) -> RepositoryResult<Vec<OrderFlowRow>> {
        let sql = r#"
            SELECT
                wo.OrderID,
                wo.LotNumber,
                p.Name,
                p.Category,
                wo.Quantity,
                wo.PlannedStartTime,
                wo.PlannedEndTime,
                wo.Status,
                wc.Name
            FROM WorkOrders wo
            JOIN Products p ON wo.ProductID = p.ProductID
            JOIN WorkCenters wc ON wo.WorkCenterID = wc.WorkCenterID
            WHERE (?1 IS NULL OR wo.LotNumber = ?1)
            ORDER BY wo.OrderID
        "#;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![lot_number], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, NaiveDateTime>(5)?,
                row.get::<_, NaiveDateTime>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (order_id, lot, name, category, qty, start, end, status_raw, wc_name) = row?;
            let status = WorkOrderStatus::parse(&status_raw).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "WorkOrders.Status".to_string(),
                    message: format!("非法状态值: {}", status_raw),
                }
            })?;
            result.push(OrderFlowRow {
                order_id,
                lot_number: lot,
                product_name: name,
                product_category: category,
                quantity: qty,
                planned_start: start,
                planned_end: end,
                status,
                work_center_name: wc_name,
            });
        }
        Ok(result)
    }

    pub fn count_by_status(conn: &Connection, status: WorkOrderStatus) -> RepositoryResult<i64> {
        let n = conn.query_row(
            "SELECT COUNT(*) FROM WorkOrders WHERE Status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
