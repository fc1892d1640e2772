// ==========================================
// 端到端生成测试: 引用一致性 / 时间一致性 / 状态机约束
// ==========================================

mod common;

use common::{count_all, count_where, generate};
use mes_simulator::logging;

#[test]
fn generates_expected_row_counts() {
    logging::init_test();
    let (conn, summary) = generate(42);

    assert_eq!(count_all(&conn, "Suppliers"), 2);
    assert_eq!(count_all(&conn, "Products"), 7);
    assert_eq!(count_all(&conn, "WorkCenters"), 3);
    assert_eq!(count_all(&conn, "Shifts"), 5);
    assert_eq!(count_all(&conn, "WorkOrders"), 40);
    assert_eq!(count_all(&conn, "Employees"), 20);

    assert_eq!(summary.work_orders, 40);
    assert_eq!(summary.products, 7);
    assert_eq!(count_all(&conn, "Machines") as usize, summary.machines);
    assert_eq!(
        count_all(&conn, "QualityControl") as usize,
        summary.quality_checks
    );
    // 每台机台 31 天日度 OEE
    assert_eq!(count_all(&conn, "OEEMetrics") as usize, summary.machines * 31);

    // BOM 配方展开过（Frame 的原材料配方在池内全量可解析）
    assert!(count_all(&conn, "BillOfMaterials") > 0);
}

#[test]
fn minimal_plant_scenario() {
    // 3 产品 / 5 物料 / 2 工作中心 / 10 工单的最小场景
    let pools = mes_simulator::DataPools::from_json(
        r#"{
        "product_names": ["eBike T101", "Frame", "Steel Bolts"],
        "product_descriptions": ["Touring e-bike", "Welded frame", "Stainless bolts"],
        "inventory_names": [
            "Steel Bolts", "Aluminum Tubing", "Rubber Grips", "Wheel Spokes", "Tire Rubber"
        ],
        "suppliers": [{"name": "Acme Metals", "lead_time": 7}],
        "work_centers": [
            {
                "name": "Frame Fabrication",
                "description": "Frame welding cell",
                "capacity": 40.0,
                "capacity_uom": "units/hour",
                "associated_machines": ["Frame Welding"]
            },
            {
                "name": "Final Assembly Line 1",
                "description": "Primary assembly line",
                "capacity": 25.0,
                "capacity_uom": "units/hour",
                "associated_machines": ["Final Assembly"]
            }
        ],
        "machine_types": ["Frame Welding", "Final Assembly"],
        "nominal_capacity": {
            "Frame Welding": {"min": 10.0, "max": 20.0},
            "Final Assembly": {"min": 5.0, "max": 12.0}
        },
        "capacity_uom": {
            "Frame Welding": "units/hour",
            "Final Assembly": "units/hour"
        },
        "material_categories": ["Raw Material"],
        "storage_locations": ["Warehouse A"],
        "cost_ranges": {
            "products": {"min": 100.0, "max": 1000.0},
            "components": {"min": 1.0, "max": 50.0},
            "work_centers": {"min": 50.0, "max": 200.0},
            "machines": {"min": 20.0, "max": 100.0}
        },
        "lead_time_range": {"min": 1.0, "max": 30.0},
        "employee_hourly_rate_range": {"min": 15.0, "max": 40.0},
        "downtime_reasons": {
            "planned": ["Scheduled Maintenance"],
            "unplanned": ["Equipment Failure", "Material Shortage"]
        },
        "qc_comments": {"general": ["Dimensional check against drawing"]}
    }"#,
    )
    .unwrap();

    let mut options = common::small_options(6);
    options.order_count = 10;
    options.employee_count = 8;

    let simulator = mes_simulator::engine::MesSimulator::new(pools, options);
    let mut conn = mes_simulator::db::open_in_memory_connection().unwrap();
    simulator.create_schema(&conn).unwrap();
    let summary = simulator.generate_all(&mut conn).unwrap();

    assert_eq!(summary.work_orders, 10);
    assert_eq!(count_all(&conn, "WorkOrders"), 10);
    assert_eq!(count_all(&conn, "Products"), 3);
    assert_eq!(count_all(&conn, "WorkCenters"), 2);
    // 工单只引用这 3 个产品
    assert_eq!(
        count_where(&conn, "WorkOrders", "ProductID NOT IN (1, 2, 3)"),
        0
    );
    // 质检与消耗只挂在已开工工单上
    assert_eq!(
        count_where(
            &conn,
            "QualityControl qc JOIN WorkOrders wo ON qc.OrderID = wo.OrderID",
            "wo.Status NOT IN ('in_progress', 'completed')"
        ),
        0
    );
}

#[test]
fn all_foreign_keys_resolve() {
    let (conn, _) = generate(7);

    let orphan_checks = [
        ("WorkOrders wo LEFT JOIN Products p ON wo.ProductID = p.ProductID", "p.ProductID IS NULL"),
        ("WorkOrders wo LEFT JOIN Machines m ON wo.MachineID = m.MachineID", "m.MachineID IS NULL"),
        ("WorkOrders wo LEFT JOIN Employees e ON wo.EmployeeID = e.EmployeeID", "e.EmployeeID IS NULL"),
        ("WorkOrders wo LEFT JOIN WorkCenters wc ON wo.WorkCenterID = wc.WorkCenterID", "wc.WorkCenterID IS NULL"),
        ("BillOfMaterials b LEFT JOIN Inventory i ON b.ComponentID = i.ItemID", "i.ItemID IS NULL"),
        ("BillOfMaterials b LEFT JOIN Products p ON b.ProductID = p.ProductID", "p.ProductID IS NULL"),
        ("QualityControl qc LEFT JOIN WorkOrders wo ON qc.OrderID = wo.OrderID", "wo.OrderID IS NULL"),
        ("Defects d LEFT JOIN QualityControl qc ON d.CheckID = qc.CheckID", "qc.CheckID IS NULL"),
        ("MaterialConsumption mc LEFT JOIN WorkOrders wo ON mc.OrderID = wo.OrderID", "wo.OrderID IS NULL"),
        ("MaterialConsumption mc LEFT JOIN Inventory i ON mc.ItemID = i.ItemID", "i.ItemID IS NULL"),
        ("Downtimes dt LEFT JOIN Machines m ON dt.MachineID = m.MachineID", "m.MachineID IS NULL"),
        ("OEEMetrics o LEFT JOIN Machines m ON o.MachineID = m.MachineID", "m.MachineID IS NULL"),
    ];
    for (join, predicate) in orphan_checks {
        let orphans: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE {}", join, predicate),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0, "悬空外键: {}", join);
    }
}

#[test]
fn execution_fields_follow_status() {
    let (conn, _) = generate(99);

    // 已排程/已取消: 不允许出现任何实际执行字段
    assert_eq!(
        count_where(
            &conn,
            "WorkOrders",
            "Status IN ('scheduled', 'cancelled') AND (ActualStartTime IS NOT NULL \
             OR ActualEndTime IS NOT NULL OR ActualProduction IS NOT NULL \
             OR Scrap IS NOT NULL OR SetupTimeActual IS NOT NULL)"
        ),
        0
    );

    // 执行中: 有开工无完工
    assert_eq!(
        count_where(
            &conn,
            "WorkOrders",
            "Status = 'in_progress' AND (ActualStartTime IS NULL OR ActualEndTime IS NOT NULL)"
        ),
        0
    );

    // 已完工: 实际字段齐备且数量闭合
    assert_eq!(
        count_where(
            &conn,
            "WorkOrders",
            "Status = 'completed' AND (ActualStartTime IS NULL OR ActualEndTime IS NULL \
             OR ActualProduction IS NULL OR Scrap IS NULL \
             OR ActualProduction + Scrap != Quantity)"
        ),
        0
    );

    // 完工时间不早于开工时间
    assert_eq!(
        count_where(
            &conn,
            "WorkOrders",
            "Status = 'completed' AND ActualEndTime < ActualStartTime"
        ),
        0
    );
}

#[test]
fn completed_orders_are_anchored_in_the_past() {
    // 已完工工单的计划窗和实际窗都不得越过基准时刻
    let reference = "2025-06-01 12:00:00";
    for seed in 0..20u64 {
        let (conn, _) = generate(seed);
        assert_eq!(
            count_where(
                &conn,
                "WorkOrders",
                &format!(
                    "Status = 'completed' AND datetime(PlannedEndTime) > datetime('{}')",
                    reference
                )
            ),
            0,
            "种子 {} 出现计划窗在未来的已完工工单",
            seed
        );
        assert_eq!(
            count_where(
                &conn,
                "WorkOrders",
                &format!(
                    "Status = 'completed' AND datetime(ActualEndTime) > datetime('{}')",
                    reference
                )
            ),
            0,
            "种子 {} 出现未来完工的工单",
            seed
        );
        // 质检日期继承实际完工时间，同样不得在未来
        assert_eq!(
            count_where(
                &conn,
                "QualityControl qc JOIN WorkOrders wo ON qc.OrderID = wo.OrderID",
                &format!(
                    "wo.Status = 'completed' AND datetime(qc.Date) > datetime('{}')",
                    reference
                )
            ),
            0,
            "种子 {} 出现未来质检记录",
            seed
        );
    }
}

#[test]
fn multibyte_machine_type_generates_without_panicking() {
    // 机型名含多字节字符时，机台命名按字符截断
    let pools = mes_simulator::DataPools::from_json(
        r#"{
        "product_names": ["eBike T101", "Frame"],
        "product_descriptions": ["Touring e-bike", "Welded frame"],
        "inventory_names": ["Steel Bolts", "Aluminum Tubing"],
        "suppliers": [{"name": "Acme Metals", "lead_time": 7}],
        "work_centers": [
            {
                "name": "Frame Fabrication",
                "description": "Frame welding cell",
                "capacity": 40.0,
                "capacity_uom": "units/hour",
                "associated_machines": ["A焊接机"]
            }
        ],
        "machine_types": ["A焊接机"],
        "nominal_capacity": {"A焊接机": {"min": 10.0, "max": 20.0}},
        "capacity_uom": {"A焊接机": "units/hour"},
        "material_categories": ["Raw Material"],
        "storage_locations": ["Warehouse A"],
        "cost_ranges": {
            "products": {"min": 100.0, "max": 1000.0},
            "components": {"min": 1.0, "max": 50.0},
            "work_centers": {"min": 50.0, "max": 200.0},
            "machines": {"min": 20.0, "max": 100.0}
        },
        "lead_time_range": {"min": 1.0, "max": 30.0},
        "employee_hourly_rate_range": {"min": 15.0, "max": 40.0},
        "downtime_reasons": {
            "planned": ["Scheduled Maintenance"],
            "unplanned": ["Equipment Failure"]
        },
        "qc_comments": {"general": ["Dimensional check against drawing"]}
    }"#,
    )
    .unwrap();

    let mut options = common::small_options(17);
    options.order_count = 10;
    options.employee_count = 5;

    let simulator = mes_simulator::engine::MesSimulator::new(pools, options);
    let mut conn = mes_simulator::db::open_in_memory_connection().unwrap();
    simulator.create_schema(&conn).unwrap();
    simulator.generate_all(&mut conn).unwrap();

    assert!(count_all(&conn, "Machines") >= 1);
    // 前缀保留前 3 个字符: "A焊接"
    assert_eq!(
        count_where(&conn, "Machines", "Name NOT LIKE 'Machine A焊接-%'"),
        0
    );
}

#[test]
fn quality_rates_are_closed_and_results_match_thresholds() {
    let (conn, summary) = generate(5);
    assert!(summary.quality_checks > 0);

    let mut stmt = conn
        .prepare("SELECT DefectRate, ReworkRate, YieldRate, Result FROM QualityControl")
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .unwrap();

    for row in rows {
        let (defect, rework, yield_rate, result) = row.unwrap();
        assert!(
            (defect + rework + yield_rate - 1.0).abs() < 1e-6,
            "比率不闭合: {} + {} + {}",
            defect,
            rework,
            yield_rate
        );
        let expected = if defect + rework >= 0.15 {
            "fail"
        } else if defect + rework >= 0.05 {
            "rework"
        } else {
            "pass"
        };
        assert_eq!(result, expected, "defect={} rework={}", defect, rework);
    }

    // 质检只针对已开工工单
    assert_eq!(
        count_where(
            &conn,
            "QualityControl qc JOIN WorkOrders wo ON qc.OrderID = wo.OrderID",
            "wo.Status NOT IN ('in_progress', 'completed')"
        ),
        0
    );
}

#[test]
fn consumption_targets_started_orders_only() {
    let (conn, summary) = generate(13);
    assert!(summary.consumptions > 0);

    assert_eq!(
        count_where(
            &conn,
            "MaterialConsumption mc JOIN WorkOrders wo ON mc.OrderID = wo.OrderID",
            "wo.Status NOT IN ('in_progress', 'completed')"
        ),
        0
    );
    // 计划消耗为正
    assert_eq!(
        count_where(&conn, "MaterialConsumption", "PlannedQuantity <= 0"),
        0
    );
}

#[test]
fn ongoing_downtime_has_open_end() {
    let (conn, _) = generate(21);

    // EndTime 与 Duration 同生共死
    assert_eq!(
        count_where(
            &conn,
            "Downtimes",
            "(EndTime IS NULL) != (Duration IS NULL)"
        ),
        0
    );
    assert_eq!(count_where(&conn, "Downtimes", "Duration <= 0"), 0);
}

#[test]
fn oee_components_multiply_and_stay_in_range() {
    let (conn, _) = generate(33);

    let mut stmt = conn
        .prepare(
            "SELECT Availability, Performance, Quality, OEE, \
             PlannedProductionTime, ActualProductionTime, Downtime FROM OEEMetrics",
        )
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
            ))
        })
        .unwrap();

    for row in rows {
        let (availability, performance, quality, oee, planned, actual, downtime) = row.unwrap();
        for rate in [availability, performance, quality, oee] {
            assert!(rate > 0.0 && rate < 1.0, "OEE 比率越界: {}", rate);
        }
        // 舍入后仍应保持乘积关系
        assert!(
            (oee - availability * performance * quality).abs() < 1e-3,
            "oee = {} != {} * {} * {}",
            oee,
            availability,
            performance,
            quality
        );
        assert_eq!(planned, actual + downtime);
        assert!(planned == 480 || planned == 240);
    }
}
