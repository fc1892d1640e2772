// ==========================================
// 生产流图集成测试: 生成数据集上的关键路径与瓶颈评分
// ==========================================

mod common;

use common::generate;
use mes_simulator::repository::WorkOrderRepository;
use mes_simulator::ProductionGraph;
use std::collections::BTreeMap;

#[test]
fn critical_path_follows_planned_time_order() {
    let (conn, _) = generate(17);

    let rows = WorkOrderRepository::list_flow_rows(&conn, None).unwrap();
    assert_eq!(rows.len(), 40);

    let starts: BTreeMap<i64, _> = rows
        .iter()
        .map(|r| (r.order_id, r.planned_start))
        .collect();

    let graph = ProductionGraph::build(rows);
    let path = graph.critical_path();
    assert!(!path.is_empty());

    // 关键路径按计划开工时间单调不减
    for pair in path.windows(2) {
        assert!(
            starts[&pair[0]] <= starts[&pair[1]],
            "关键路径时间倒挂: {} -> {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn lot_filter_restricts_rows() {
    let (conn, _) = generate(29);

    let all = WorkOrderRepository::list_flow_rows(&conn, None).unwrap();
    let lot = all[0].lot_number.clone();
    let expected = all.iter().filter(|r| r.lot_number == lot).count();

    let filtered = WorkOrderRepository::list_flow_rows(&conn, Some(&lot)).unwrap();
    assert_eq!(filtered.len(), expected);
    assert!(filtered.iter().all(|r| r.lot_number == lot));
}

#[test]
fn bottleneck_metrics_cover_all_orders() {
    let (conn, _) = generate(8);

    let rows = WorkOrderRepository::list_flow_rows(&conn, None).unwrap();
    let total = rows.len();
    let graph = ProductionGraph::build(rows);
    let metrics = graph.bottleneck_metrics();

    assert!(!metrics.is_empty());
    assert_eq!(metrics.iter().map(|m| m.order_count).sum::<usize>(), total);

    // 降序排列，分值在 [0, 1]
    for pair in metrics.windows(2) {
        assert!(pair[0].bottleneck_score >= pair[1].bottleneck_score);
    }
    for metric in &metrics {
        assert!(metric.bottleneck_score >= 0.0 && metric.bottleneck_score <= 1.0);
        assert!(metric.on_critical_path <= metric.order_count);
        assert!(metric.in_progress <= metric.order_count);
    }
}
