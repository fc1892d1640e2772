// ==========================================
// MES 数据仿真系统 - 产线资源仓储
// ==========================================
// 职责: WorkCenters / Machines / Shifts / Employees 表的数据访问
// ==========================================

use crate::domain::facility::{Employee, Machine, Shift, WorkCenter};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection};

pub struct WorkCenterRepository;

impl WorkCenterRepository {
    /// 插入工作中心，返回自增 WorkCenterID
    pub fn insert(conn: &Connection, center: &WorkCenter) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO WorkCenters (
                Name, Description, Capacity, CapacityUOM, CostPerHour, Location, IsActive
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                center.name,
                center.description,
                center.capacity,
                center.capacity_uom,
                center.cost_per_hour,
                center.location,
                center.is_active,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct MachineRepository;

impl MachineRepository {
    /// 插入机台，返回自增 MachineID
    pub fn insert(conn: &Connection, machine: &Machine) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Machines (
                Name, Type, WorkCenterID, Status, NominalCapacity, CapacityUOM,
                SetupTime, EfficiencyFactor, MaintenanceFrequency,
                LastMaintenanceDate, NextMaintenanceDate, ProductChangeoverTime,
                CostPerHour, InstallationDate, ModelNumber
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                machine.name,
                machine.machine_type,
                machine.work_center_id,
                machine.status.as_str(),
                machine.nominal_capacity,
                machine.capacity_uom,
                machine.setup_time,
                machine.efficiency_factor,
                machine.maintenance_frequency,
                machine.last_maintenance_date,
                machine.next_maintenance_date,
                machine.product_changeover_time,
                machine.cost_per_hour,
                machine.installation_date,
                machine.model_number,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct ShiftRepository;

impl ShiftRepository {
    /// 插入班次，返回自增 ShiftID
    pub fn insert(conn: &Connection, shift: &Shift) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Shifts (Name, StartTime, EndTime, Capacity, IsWeekend)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                shift.name,
                shift.start_time,
                shift.end_time,
                shift.capacity,
                shift.is_weekend,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

pub struct EmployeeRepository;

impl EmployeeRepository {
    /// 插入员工，返回自增 EmployeeID
    pub fn insert(conn: &Connection, employee: &Employee) -> RepositoryResult<i64> {
        conn.execute(
            r#"
            INSERT INTO Employees (Name, Role, ShiftID, HourlyRate, Skills, HireDate)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                employee.name,
                employee.role,
                employee.shift_id,
                employee.hourly_rate,
                employee.skills,
                employee.hire_date,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
