// ==========================================
// MES 数据仿真系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 连接句柄显式传入 (&Connection)，不持有全局会话；
//       rusqlite::Transaction 可解引用为 Connection，
//       生成流程得以在单一事务内贯穿所有仓储调用
// ==========================================

pub mod error;
pub mod events_repo;
pub mod facility_repo;
pub mod product_repo;
pub mod quality_repo;
pub mod schema;
pub mod supply_repo;
pub mod work_order_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use events_repo::{ConsumptionRepository, DowntimeRepository, OeeRepository};
pub use facility_repo::{
    EmployeeRepository, MachineRepository, ShiftRepository, WorkCenterRepository,
};
pub use product_repo::{BomRepository, ProductRepository};
pub use quality_repo::{DefectRepository, QualityCheckRepository};
pub use schema::create_schema;
pub use supply_repo::{InventoryRepository, SupplierRepository};
pub use work_order_repo::{OrderFlowRow, WorkOrderRepository};
