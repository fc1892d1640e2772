// ==========================================
// MES 数据仿真系统 - 数据库 Schema
// ==========================================
// 职责: 幂等建表 (CREATE TABLE IF NOT EXISTS)
// 说明: 表名/列名沿用 MES 仪表盘与查询层所依赖的既有契约，
//       不可擅自改名
// ==========================================

use crate::repository::error::RepositoryResult;
use rusqlite::Connection;
use tracing::info;

/// 幂等创建全部业务表
///
/// 重复调用不产生重复表、不报错。
pub fn create_schema(conn: &Connection) -> RepositoryResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS Products (
          ProductID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL UNIQUE,
          Description TEXT,
          Category TEXT,
          Cost REAL NOT NULL,
          StandardProcessTime REAL,
          IsActive INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS Suppliers (
          SupplierID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          LeadTime INTEGER NOT NULL,
          ReliabilityScore REAL,
          ContactInfo TEXT
        );

        CREATE TABLE IF NOT EXISTS Inventory (
          ItemID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          Category TEXT,
          Quantity INTEGER NOT NULL,
          ReorderLevel INTEGER NOT NULL,
          SupplierID INTEGER REFERENCES Suppliers(SupplierID),
          LeadTime INTEGER NOT NULL,
          Cost REAL NOT NULL,
          LotNumber TEXT,
          Location TEXT,
          LastReceivedDate TEXT
        );

        CREATE TABLE IF NOT EXISTS BillOfMaterials (
          BOMID INTEGER PRIMARY KEY AUTOINCREMENT,
          ProductID INTEGER NOT NULL REFERENCES Products(ProductID),
          ComponentID INTEGER NOT NULL REFERENCES Inventory(ItemID),
          Quantity REAL NOT NULL,
          ScrapFactor REAL NOT NULL DEFAULT 0.0
        );

        CREATE TABLE IF NOT EXISTS WorkCenters (
          WorkCenterID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          Description TEXT,
          Capacity REAL NOT NULL,
          CapacityUOM TEXT NOT NULL,
          CostPerHour REAL NOT NULL,
          Location TEXT,
          IsActive INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS Machines (
          MachineID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          Type TEXT,
          WorkCenterID INTEGER REFERENCES WorkCenters(WorkCenterID),
          Status TEXT CHECK (Status IN ('running', 'idle', 'maintenance', 'breakdown')),
          NominalCapacity REAL NOT NULL,
          CapacityUOM TEXT NOT NULL,
          SetupTime INTEGER NOT NULL,
          EfficiencyFactor REAL NOT NULL,
          MaintenanceFrequency INTEGER NOT NULL,
          LastMaintenanceDate TEXT,
          NextMaintenanceDate TEXT,
          ProductChangeoverTime INTEGER NOT NULL,
          CostPerHour REAL NOT NULL,
          InstallationDate TEXT,
          ModelNumber TEXT
        );

        CREATE TABLE IF NOT EXISTS Shifts (
          ShiftID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          StartTime TEXT NOT NULL,
          EndTime TEXT NOT NULL,
          Capacity REAL NOT NULL,
          IsWeekend INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS Employees (
          EmployeeID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          Role TEXT,
          ShiftID INTEGER REFERENCES Shifts(ShiftID),
          HourlyRate REAL NOT NULL,
          Skills TEXT,
          HireDate TEXT
        );

        CREATE TABLE IF NOT EXISTS WorkOrders (
          OrderID INTEGER PRIMARY KEY AUTOINCREMENT,
          ProductID INTEGER NOT NULL REFERENCES Products(ProductID),
          WorkCenterID INTEGER NOT NULL REFERENCES WorkCenters(WorkCenterID),
          MachineID INTEGER NOT NULL REFERENCES Machines(MachineID),
          EmployeeID INTEGER NOT NULL REFERENCES Employees(EmployeeID),
          Quantity INTEGER NOT NULL,
          PlannedStartTime TEXT NOT NULL,
          PlannedEndTime TEXT NOT NULL,
          ActualStartTime TEXT,
          ActualEndTime TEXT,
          Status TEXT CHECK (Status IN ('scheduled', 'in_progress', 'completed', 'cancelled')),
          Priority INTEGER NOT NULL,
          LeadTime INTEGER NOT NULL,
          LotNumber TEXT,
          ActualProduction INTEGER,
          Scrap INTEGER,
          SetupTimeActual INTEGER
        );

        CREATE TABLE IF NOT EXISTS Downtimes (
          DowntimeID INTEGER PRIMARY KEY AUTOINCREMENT,
          MachineID INTEGER NOT NULL REFERENCES Machines(MachineID),
          OrderID INTEGER REFERENCES WorkOrders(OrderID),
          StartTime TEXT NOT NULL,
          EndTime TEXT,
          Duration INTEGER,
          Reason TEXT NOT NULL,
          Category TEXT NOT NULL CHECK (Category IN ('planned', 'unplanned')),
          Description TEXT,
          ReportedBy INTEGER REFERENCES Employees(EmployeeID)
        );

        CREATE TABLE IF NOT EXISTS QualityControl (
          CheckID INTEGER PRIMARY KEY AUTOINCREMENT,
          OrderID INTEGER NOT NULL REFERENCES WorkOrders(OrderID),
          Date TEXT NOT NULL,
          Result TEXT CHECK (Result IN ('pass', 'fail', 'rework')),
          Comments TEXT,
          DefectRate REAL,
          ReworkRate REAL,
          YieldRate REAL,
          InspectorID INTEGER REFERENCES Employees(EmployeeID)
        );

        CREATE TABLE IF NOT EXISTS Defects (
          DefectID INTEGER PRIMARY KEY AUTOINCREMENT,
          CheckID INTEGER NOT NULL REFERENCES QualityControl(CheckID),
          DefectType TEXT NOT NULL,
          Severity INTEGER,
          Quantity INTEGER NOT NULL DEFAULT 1,
          Location TEXT,
          RootCause TEXT,
          ActionTaken TEXT
        );

        CREATE TABLE IF NOT EXISTS MaterialConsumption (
          ConsumptionID INTEGER PRIMARY KEY AUTOINCREMENT,
          OrderID INTEGER NOT NULL REFERENCES WorkOrders(OrderID),
          ItemID INTEGER NOT NULL REFERENCES Inventory(ItemID),
          PlannedQuantity REAL NOT NULL,
          ActualQuantity REAL,
          VariancePercent REAL,
          ConsumptionDate TEXT,
          LotNumber TEXT
        );

        CREATE TABLE IF NOT EXISTS OEEMetrics (
          MetricID INTEGER PRIMARY KEY AUTOINCREMENT,
          MachineID INTEGER NOT NULL REFERENCES Machines(MachineID),
          Date TEXT NOT NULL,
          Availability REAL,
          Performance REAL,
          Quality REAL,
          OEE REAL,
          PlannedProductionTime INTEGER,
          ActualProductionTime INTEGER,
          Downtime INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_inventory_supplier ON Inventory(SupplierID);
        CREATE INDEX IF NOT EXISTS idx_bom_product ON BillOfMaterials(ProductID);
        CREATE INDEX IF NOT EXISTS idx_machines_work_center ON Machines(WorkCenterID);
        CREATE INDEX IF NOT EXISTS idx_work_orders_product ON WorkOrders(ProductID);
        CREATE INDEX IF NOT EXISTS idx_work_orders_machine ON WorkOrders(MachineID);
        CREATE INDEX IF NOT EXISTS idx_work_orders_status ON WorkOrders(Status);
        CREATE INDEX IF NOT EXISTS idx_work_orders_lot ON WorkOrders(LotNumber);
        CREATE INDEX IF NOT EXISTS idx_qc_order ON QualityControl(OrderID);
        CREATE INDEX IF NOT EXISTS idx_defects_check ON Defects(CheckID);
        CREATE INDEX IF NOT EXISTS idx_consumption_order ON MaterialConsumption(OrderID);
        CREATE INDEX IF NOT EXISTS idx_downtimes_machine ON Downtimes(MachineID);
        CREATE INDEX IF NOT EXISTS idx_oee_machine_date ON OEEMetrics(MachineID, Date);
        "#,
    )?;

    info!("数据库 schema 已就绪 (14 张业务表)");
    Ok(())
}
