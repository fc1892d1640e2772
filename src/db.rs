// ==========================================
// MES 数据仿真系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少偶发 busy 错误
// - 提供 truncate 基础设施（刷新模式：清空数据、保留 schema）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;
use tracing::{debug, info};

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库连接（测试用途）
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 清空所有业务表数据，保留表结构
///
/// # 规则
/// - 清空期间临时关闭外键检查，结束后恢复
/// - 整个清空过程包在一个事务里，失败时整体回滚
/// - 自增计数器 (sqlite_sequence) 一并重置，保证重新生成后 ID 从 1 开始
pub fn truncate_all_tables(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")?;

    let result = truncate_in_transaction(conn);

    // 无论成败都要恢复外键检查
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    result
}

fn truncate_in_transaction(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;

    // 按名称排序，保证删除顺序确定
    let tables: Vec<String> = {
        let mut stmt = tx.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    // 逐表日志降级为 debug，刷新模式下 14 张表不刷屏
    for table in &tables {
        debug!(table = %table, "清空表");
        tx.execute(&format!("DELETE FROM {}", table), [])?;
    }

    // sqlite_sequence 仅在存在自增列时出现
    let has_sequence: bool = tx
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='sqlite_sequence' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .unwrap_or(false);
    if has_sequence {
        tx.execute("DELETE FROM sqlite_sequence", [])?;
    }

    tx.commit()?;
    info!(tables = tables.len(), "所有业务表已清空");
    Ok(())
}
