// ==========================================
// MES 数据仿真系统 - 结构自省与只读查询
// ==========================================
// 职责:
// - 枚举业务表并给出列/外键/行数/样例行 (JSON 形态)
// - 执行受限的只读 SQL（仅 SELECT / WITH，单语句）
// 红线: 任何写操作在语句下发前拒绝，不依赖数据库报错兜底
// ==========================================

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// 查询接口错误类型
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("数据库操作失败: {0}")]
    Database(#[from] rusqlite::Error),

    /// 语句在下发前被静态检查拒绝
    #[error("仅允许只读查询: {message}")]
    NotReadOnly { message: String },
}

/// 列定义
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub notnull: bool,
    pub primary_key: bool,
}

/// 外键定义
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyInfo {
    /// 被引用表
    pub table: String,
    /// 本表列
    pub from: String,
    /// 被引用列
    pub to: String,
}

/// 表描述（结构 + 行数 + 样例行）
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
    pub row_count: i64,
    pub sample_rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

pub struct SchemaInspector;

impl SchemaInspector {
    /// 枚举全部业务表（按名称排序）并返回结构描述
    pub fn describe(conn: &Connection, sample_limit: usize) -> Result<Vec<TableInfo>, QueryError> {
        let table_names: Vec<String> = {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name",
            )?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let mut tables = Vec::with_capacity(table_names.len());
        for name in table_names {
            tables.push(Self::describe_table(conn, &name, sample_limit)?);
        }
        debug!(tables = tables.len(), "表结构自省完成");
        Ok(tables)
    }

    fn describe_table(
        conn: &Connection,
        name: &str,
        sample_limit: usize,
    ) -> Result<TableInfo, QueryError> {
        // 表名来自 sqlite_master，双引号括起防止与关键字冲突
        let columns: Vec<ColumnInfo> = {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", name))?;
            let rows = stmt.query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get(1)?,
                    data_type: row.get(2)?,
                    notnull: row.get::<_, i64>(3)? != 0,
                    primary_key: row.get::<_, i64>(5)? != 0,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let foreign_keys: Vec<ForeignKeyInfo> = {
            let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list(\"{}\")", name))?;
            let rows = stmt.query_map([], |row| {
                Ok(ForeignKeyInfo {
                    table: row.get(2)?,
                    from: row.get(3)?,
                    to: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let row_count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", name), [], |row| {
                row.get(0)
            })?;

        let sample_rows = if sample_limit > 0 {
            Self::collect_rows(
                conn,
                &format!("SELECT * FROM \"{}\" LIMIT {}", name, sample_limit),
            )?
        } else {
            Vec::new()
        };

        Ok(TableInfo {
            name: name.to_string(),
            columns,
            foreign_keys,
            row_count,
            sample_rows,
        })
    }

    fn collect_rows(
        conn: &Connection,
        sql: &str,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, QueryError> {
        let mut stmt = conn.prepare(sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut object = serde_json::Map::with_capacity(column_names.len());
            for (index, column) in column_names.iter().enumerate() {
                object.insert(column.clone(), value_to_json(row.get_ref(index)?));
            }
            result.push(object);
        }
        Ok(result)
    }
}

/// 执行受限的只读 SQL，返回 JSON 行集合
///
/// # 拒绝规则
/// - 首关键字不是 SELECT / WITH
/// - 语句中间出现分号（多语句注入）
pub fn run_read_only_query(
    conn: &Connection,
    sql: &str,
) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, QueryError> {
    let trimmed = sql.trim().trim_end_matches(';').trim();
    if trimmed.is_empty() {
        return Err(QueryError::NotReadOnly {
            message: "空语句".to_string(),
        });
    }
    if trimmed.contains(';') {
        return Err(QueryError::NotReadOnly {
            message: "不允许多条语句".to_string(),
        });
    }
    let first_word = trimmed
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase();
    if first_word != "SELECT" && first_word != "WITH" {
        return Err(QueryError::NotReadOnly {
            message: format!("仅允许 SELECT / WITH 开头的语句，收到 `{}`", first_word),
        });
    }

    SchemaInspector::collect_rows(conn, trimmed)
}

/// SQLite 值 -> JSON 值
///
/// BLOB 不外带原始字节，降级为长度描述
fn value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(n) => serde_json::Value::Number(n.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Blob(bytes) => serde_json::Value::String(format!("<blob {} bytes>", bytes.len())),
    }
}
