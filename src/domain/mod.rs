// ==========================================
// MES 数据仿真系统 - 领域模型层
// ==========================================
// 职责: 定义实体与类型
// 红线: 不含数据访问逻辑,不含生成逻辑
// ==========================================

pub mod events;
pub mod facility;
pub mod product;
pub mod quality;
pub mod supply;
pub mod types;
pub mod work_order;

// 重导出核心类型
pub use events::{Downtime, MaterialConsumption, OeeMetric};
pub use facility::{Employee, Machine, Shift, WorkCenter};
pub use product::{BomLine, Product};
pub use quality::{Defect, QualityCheck};
pub use supply::{InventoryItem, Supplier};
pub use types::{
    DowntimeCategory, MachineStatus, ProductLevel, QcResult, WorkOrderStatus,
};
pub use work_order::{OrderExecution, WorkOrder};
