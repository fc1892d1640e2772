// ==========================================
// MES 数据仿真系统 - 质量仓储
// ==========================================
// 职责: QualityControl / Defects 表的数据访问
// ==========================================

use crate::domain::quality::{Defect, QualityCheck};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

pub struct QualityCheckRepository;

impl QualityCheckRepository {
    /// 插入质检记录，返回自增 CheckID
    pub fn insert(conn: &Connection, check: &QualityCheck) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO QualityControl (
                OrderID, Date, Result, Comments,
                DefectRate, ReworkRate, YieldRate, InspectorID
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                check.order_id,
                check.date,
                check.result.as_str(),
                check.comments,
                check.defect_rate,
                check.rework_rate,
                check.yield_rate,
                check.inspector_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct DefectRepository;

impl DefectRepository {
    /// 插入缺陷明细，返回自增 DefectID
    pub fn insert(conn: &Connection, defect: &Defect) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Defects (
                CheckID, DefectType, Severity, Quantity, Location, RootCause, ActionTaken
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                defect.check_id,
                defect.defect_type,
                defect.severity,
                defect.quantity,
                defect.location,
                defect.root_cause,
                defect.action_taken,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
