// ==========================================
// MES 数据仿真系统
// ==========================================
// 面向 MES (制造执行系统) 原型与测试场景的合成数据生成器:
// 在 SQLite 中生成引用一致、时间一致、同种子可复现的
// 生产数据集（产品/BOM/工单/质检/停机/OEE），并提供
// 生产流图分析与只读查询接口。
// ==========================================

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod repository;

pub use config::DataPools;
pub use engine::{
    GenerationSummary, MesSimulator, ProductionGraph, SimulatorError, SimulatorOptions,
    WorkCenterMetrics,
};
