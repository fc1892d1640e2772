// ==========================================
// 集成测试公共脚手架
// ==========================================
// 小规模数据池 + 内存库，保证用例秒级完成
// ==========================================
#![allow(dead_code)] // 各测试二进制只用到部分辅助函数

use chrono::{NaiveDate, NaiveDateTime};
use mes_simulator::engine::{GenerationSummary, MesSimulator, SimulatorOptions};
use mes_simulator::{db, DataPools};
use rusqlite::Connection;

/// 固定基准时刻，保证所有时间窗断言可复现
pub fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn small_pools() -> DataPools {
    DataPools::from_json(
        r#"{
        "product_names": [
            "eBike T101", "Frame", "Wheel", "Seat",
            "Steel Bolts", "Aluminum Tubing", "Rubber Grips"
        ],
        "product_descriptions": [
            "Touring e-bike", "Welded aluminum frame", "Complete wheel", "Gel saddle",
            "Stainless bolts", "Aluminum tubing stock", "Molded rubber grips"
        ],
        "inventory_names": [
            "Steel Bolts", "Aluminum Tubing", "Rubber Grips",
            "Wheel Spokes", "Tire Rubber", "Seat Padding"
        ],
        "suppliers": [
            {"name": "Acme Metals", "lead_time": 7},
            {"name": "Pacific Polymer", "lead_time": 14}
        ],
        "work_centers": [
            {
                "name": "Frame Fabrication",
                "description": "Frame welding cell",
                "capacity": 40.0,
                "capacity_uom": "units/hour",
                "associated_machines": ["Frame Welding"]
            },
            {
                "name": "Wheel Production",
                "description": "Wheel building line",
                "capacity": 60.0,
                "capacity_uom": "units/hour",
                "associated_machines": ["Wheel Assembly"]
            },
            {
                "name": "Final Assembly Line 1",
                "description": "Primary assembly line",
                "capacity": 25.0,
                "capacity_uom": "units/hour",
                "associated_machines": ["Final Assembly"]
            }
        ],
        "machine_types": ["Frame Welding", "Wheel Assembly", "Final Assembly"],
        "nominal_capacity": {
            "Frame Welding": {"min": 10.0, "max": 20.0},
            "Wheel Assembly": {"min": 20.0, "max": 35.0},
            "Final Assembly": {"min": 5.0, "max": 12.0}
        },
        "capacity_uom": {
            "Frame Welding": "units/hour",
            "Wheel Assembly": "units/hour",
            "Final Assembly": "units/hour"
        },
        "material_categories": ["Raw Material", "Mechanical Component"],
        "storage_locations": ["Warehouse A", "Warehouse B"],
        "cost_ranges": {
            "products": {"min": 100.0, "max": 1000.0},
            "components": {"min": 1.0, "max": 50.0},
            "work_centers": {"min": 50.0, "max": 200.0},
            "machines": {"min": 20.0, "max": 100.0}
        },
        "lead_time_range": {"min": 1.0, "max": 30.0},
        "employee_hourly_rate_range": {"min": 15.0, "max": 40.0},
        "downtime_reasons": {
            "planned": ["Scheduled Maintenance", "Setup/Changeover", "Cleaning"],
            "unplanned": [
                "Equipment Failure", "Material Shortage",
                "Operator Absence", "Quality Issue", "Tool Breakage"
            ]
        },
        "qc_comments": {
            "frame": ["Weld seams inspected"],
            "wheels": ["Trueness measured"],
            "final_assembly": ["Functional test completed"],
            "general": ["Dimensional check against drawing"]
        }
    }"#,
    )
    .unwrap()
}

pub fn small_options(seed: u64) -> SimulatorOptions {
    let mut options = SimulatorOptions::new(reference_time());
    options.seed = Some(seed);
    options.lookback_days = 30;
    options.lookahead_days = 7;
    options.order_count = 40;
    options.employee_count = 20;
    options
}

/// 建内存库并全量生成
pub fn generate(seed: u64) -> (Connection, GenerationSummary) {
    let simulator = MesSimulator::new(small_pools(), small_options(seed));
    let mut conn = db::open_in_memory_connection().unwrap();
    simulator.create_schema(&conn).unwrap();
    let summary = simulator.generate_all(&mut conn).unwrap();
    (conn, summary)
}

/// 统计满足 where 子句的行数
pub fn count_where(conn: &Connection, table: &str, predicate: &str) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE {}", table, predicate),
        [],
        |row| row.get(0),
    )
    .unwrap()
}

pub fn count_all(conn: &Connection, table: &str) -> i64 {
    count_where(conn, table, "1=1")
}
