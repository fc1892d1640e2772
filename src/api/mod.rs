// ==========================================
// MES 数据仿真系统 - 数据集查询接口
// ==========================================
// 面向生成结果的只读访问: 表结构自省 + 受限 SQL 查询
// ==========================================

mod inspect;

pub use inspect::{
    run_read_only_query, ColumnInfo, ForeignKeyInfo, QueryError, SchemaInspector, TableInfo,
};
