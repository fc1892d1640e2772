// ==========================================
// MES 数据仿真系统 - 配置层
// ==========================================
// 职责: 加载/校验数据池配置 (data_pools.json)
// 红线: 缺失必需键必须在任何写入发生之前快速失败
// ==========================================

pub mod data_pools;

pub use data_pools::{ConfigError, CostRanges, DataPools, Range, SupplierSpec, WorkCenterSpec};
