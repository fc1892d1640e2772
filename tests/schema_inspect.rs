// ==========================================
// 结构自省与只读查询集成测试
// ==========================================

mod common;

use common::generate;
use mes_simulator::api::{run_read_only_query, QueryError, SchemaInspector};

#[test]
fn describe_lists_all_business_tables() {
    let (conn, _) = generate(4);
    let tables = SchemaInspector::describe(&conn, 3).unwrap();

    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "BillOfMaterials",
            "Defects",
            "Downtimes",
            "Employees",
            "Inventory",
            "Machines",
            "MaterialConsumption",
            "OEEMetrics",
            "Products",
            "QualityControl",
            "Shifts",
            "Suppliers",
            "WorkCenters",
            "WorkOrders",
        ]
    );

    let work_orders = tables.iter().find(|t| t.name == "WorkOrders").unwrap();
    assert_eq!(work_orders.row_count, 40);
    assert_eq!(work_orders.sample_rows.len(), 3);
    assert!(work_orders
        .foreign_keys
        .iter()
        .any(|fk| fk.table == "Products" && fk.from == "ProductID"));
    assert!(work_orders
        .columns
        .iter()
        .any(|c| c.name == "OrderID" && c.primary_key));
}

#[test]
fn read_only_queries_work_against_generated_data() {
    let (conn, _) = generate(4);

    let rows = run_read_only_query(
        &conn,
        "SELECT Status, COUNT(*) AS n FROM WorkOrders GROUP BY Status ORDER BY Status",
    )
    .unwrap();
    let total: i64 = rows.iter().map(|r| r["n"].as_i64().unwrap()).sum();
    assert_eq!(total, 40);
}

#[test]
fn mutation_attempts_are_rejected() {
    let (conn, _) = generate(4);

    for sql in [
        "DELETE FROM WorkOrders",
        "DROP TABLE Products",
        "SELECT 1; DROP TABLE Products",
    ] {
        let err = run_read_only_query(&conn, sql).unwrap_err();
        assert!(matches!(err, QueryError::NotReadOnly { .. }));
    }
    // 拒绝发生在下发前，数据不受影响
    let rows = run_read_only_query(&conn, "SELECT COUNT(*) AS n FROM WorkOrders").unwrap();
    assert_eq!(rows[0]["n"].as_i64().unwrap(), 40);
}
