// ==========================================
// MES 数据仿真系统 - 供应链仓储
// ==========================================
// 职责: Suppliers / Inventory 表的数据访问
// ==========================================

use crate::domain::supply::{InventoryItem, Supplier};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

pub struct SupplierRepository;

impl SupplierRepository {
    /// 插入供应商，返回自增 SupplierID
    pub fn insert(conn: &Connection, supplier: &Supplier) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Suppliers (Name, LeadTime, ReliabilityScore, ContactInfo)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                supplier.name,
                supplier.lead_time,
                supplier.reliability_score,
                supplier.contact_info,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct InventoryRepository;

impl InventoryRepository {
    /// 插入库存物料，返回自增 ItemID
    pub fn insert(conn: &Connection, item: &InventoryItem) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Inventory (
                Name, Category, Quantity, ReorderLevel, SupplierID,
                LeadTime, Cost, LotNumber, Location, LastReceivedDate
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                item.name,
                item.category,
                item.quantity,
                item.reorder_level,
                item.supplier_id,
                item.lead_time,
                item.cost,
                item.lot_number,
                item.location,
                item.last_received_date,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
