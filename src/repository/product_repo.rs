// ==========================================
// MES 数据仿真系统 - 产品/BOM 仓储
// ==========================================
// 职责: Products / BillOfMaterials 表的数据访问
// ==========================================

use crate::domain::product::{BomLine, Product};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

pub struct ProductRepository;

impl ProductRepository {
    /// 插入产品，返回自增 ProductID
    pub fn insert(conn: &Connection, product: &Product) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Products (Name, Description, Category, Cost, StandardProcessTime, IsActive)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                product.name,
                product.description,
                product.category,
                product.cost,
                product.standard_process_time,
                product.is_active,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn count(conn: &Connection) -> RepositoryResult<i64> {
        let n = conn.query_row("SELECT COUNT(*) FROM Products", [], |row| row.get(0))?;
        Ok(n)
    }
}

pub struct BomRepository;

impl BomRepository {
    /// 插入 BOM 行，返回自增 BOMID
    pub fn insert(conn: &Connection, line: &BomLine) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO BillOfMaterials (ProductID, ComponentID, Quantity, ScrapFactor)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                line.product_id,
                line.component_item_id,
                line.quantity,
                line.scrap_factor,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询某产品的全部 BOM 行（按 BOMID 排序，保证遍历顺序确定）
    pub fn list_for_product(conn: &Connection, product_id: i64) -> RepositoryResult<Vec<BomLine>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT ProductID, ComponentID, Quantity, ScrapFactor
            FROM BillOfMaterials
            WHERE ProductID = ?1
            ORDER BY BOMID
            "#,
        )?;
        let rows = stmt.query_map(params![product_id], |row| {
            Ok(BomLine {
                product_id: row.get(0)?,
                component_item_id: row.get(1)?,
                quantity: row.get(2)?,
                scrap_factor: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn has_bom(conn: &Connection, product_id: i64) -> RepositoryResult<bool> {
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM BillOfMaterials WHERE ProductID = ?1",
            params![product_id],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }
}
