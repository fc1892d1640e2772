// ==========================================
// MES 数据仿真系统 - 生产流图分析
// ==========================================
// 职责: 从工单构建有向依赖图，求关键路径与瓶颈评分
// 建图规则:
//   - 同批次内按计划时间的先后顺承边，权重 1
//   - 零部件/子装配 -> 成品的物料依赖边，权重 2（覆盖同顶点对的顺承边）
// 关键路径: 去环（剔除起点晚于终点的边）后拓扑松弛求最长路
// ==========================================

use crate::domain::types::WorkOrderStatus;
use crate::repository::OrderFlowRow;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::debug;

/// 工作中心瓶颈指标
///
/// bottleneck_score = 0.5 × 关键路径占比 + 0.3 × 归一化平均工期 + 0.2 × 在制占比
#[derive(Debug, Clone, PartialEq)]
pub struct WorkCenterMetrics {
    pub work_center: String,
    pub order_count: usize,
    pub total_duration_hours: f64,
    pub on_critical_path: usize,
    pub in_progress: usize,
    pub bottleneck_score: f64,
}

/// 生产流图（顶点 = 工单）
#[derive(Debug)]
pub struct ProductionGraph {
    nodes: Vec<OrderFlowRow>,
    /// (源顶点, 目标顶点) -> 权重，BTreeMap 保证遍历顺序稳定
    edges: BTreeMap<(usize, usize), i64>,
}

impl ProductionGraph {
    /// 从工单行集合建图
    pub fn build(rows: Vec<OrderFlowRow>) -> Self {
        let mut graph = ProductionGraph {
            nodes: rows,
            edges: BTreeMap::new(),
        };
        graph.add_timing_edges();
        graph.add_material_edges();
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "生产流图构建完成"
        );
        graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 同批次内时间不重叠的工单对连顺承边
    fn add_timing_edges(&mut self) {
        let mut lots: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, row) in self.nodes.iter().enumerate() {
            lots.entry(row.lot_number.as_str()).or_default().push(index);
        }

        for indices in lots.values_mut() {
            indices.sort_by_key(|&i| (self.nodes[i].planned_start, self.nodes[i].order_id));
            for (pos, &source) in indices.iter().enumerate() {
                for &target in &indices[pos + 1..] {
                    if self.nodes[source].planned_end <= self.nodes[target].planned_start {
                        self.edges.entry((source, target)).or_insert(1);
                    }
                }
            }
        }
    }

    /// 同批次内零部件/子装配工单 -> 成品工单的物料依赖边
    fn add_material_edges(&mut self) {
        let mut lots: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, row) in self.nodes.iter().enumerate() {
            lots.entry(row.lot_number.as_str()).or_default().push(index);
        }

        let mut material_edges = Vec::new();
        for indices in lots.values() {
            for &source in indices {
                let upstream = &self.nodes[source];
                if upstream.product_category != "Components"
                    && upstream.product_category != "Subassemblies"
                {
                    continue;
                }
                for &target in indices {
                    let downstream = &self.nodes[target];
                    if downstream.product_category == "Electric Bikes"
                        && upstream.planned_end <= downstream.planned_start
                    {
                        material_edges.push((source, target));
                    }
                }
            }
        }
        // 物料依赖优先级高于顺承边
        for (source, target) in material_edges {
            self.edges.insert((source, target), 2);
        }
    }

    /// 关键路径上的工单 ID（按执行顺序）
    ///
    /// 计划时间倒挂产生的环通过剔除"起点晚于终点"的边消除，
    /// 随后在 DAG 上做拓扑序最长路松弛。
    pub fn critical_path(&self) -> Vec<i64> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let node_count = self.nodes.len();
        let mut successors: Vec<Vec<(usize, i64)>> = vec![Vec::new(); node_count];
        let mut in_degree = vec![0usize; node_count];
        for (&(source, target), &weight) in &self.edges {
            // 去环: 只保留时间正向的边
            if self.nodes[source].planned_start > self.nodes[target].planned_start {
                continue;
            }
            successors[source].push((target, weight));
            in_degree[target] += 1;
        }

        // Kahn 拓扑排序，队列按顶点序号处理保证确定性
        let mut queue: Vec<usize> = (0..node_count).filter(|&i| in_degree[i] == 0).collect();
        let mut topo_order = Vec::with_capacity(node_count);
        let mut head = 0;
        while head < queue.len() {
            let node = queue[head];
            head += 1;
            topo_order.push(node);
            for &(target, _) in &successors[node] {
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    queue.push(target);
                }
            }
        }

        // 最长路松弛: 源点距离 0，其余 MIN
        let mut dist = vec![i64::MIN; node_count];
        let mut pred: Vec<Option<usize>> = vec![None; node_count];
        for &node in &topo_order {
            if dist[node] == i64::MIN {
                dist[node] = 0;
            }
            for &(target, weight) in &successors[node] {
                if dist[node] + weight > dist[target] {
                    dist[target] = dist[node] + weight;
                    pred[target] = Some(node);
                }
            }
        }

        // 距离最大的顶点作为汇点，并列取序号最小者
        let mut sink = 0;
        for node in 1..node_count {
            if dist[node] > dist[sink] {
                sink = node;
            }
        }

        let mut path = Vec::new();
        let mut cursor = Some(sink);
        while let Some(node) = cursor {
            path.push(self.nodes[node].order_id);
            cursor = pred[node];
        }
        path.reverse();
        path
    }

    /// 工作中心瓶颈评分（按分值降序）
    pub fn bottleneck_metrics(&self) -> Vec<WorkCenterMetrics> {
        let critical: Vec<i64> = self.critical_path();

        struct Accumulator {
            order_count: usize,
            total_duration_hours: f64,
            on_critical_path: usize,
            in_progress: usize,
        }
        let mut centers: BTreeMap<&str, Accumulator> = BTreeMap::new();

        for row in &self.nodes {
            let entry = centers
                .entry(row.work_center_name.as_str())
                .or_insert(Accumulator {
                    order_count: 0,
                    total_duration_hours: 0.0,
                    on_critical_path: 0,
                    in_progress: 0,
                });
            entry.order_count += 1;
            entry.total_duration_hours += duration_hours(row.planned_start, row.planned_end);
            if critical.contains(&row.order_id) {
                entry.on_critical_path += 1;
            }
            if row.status == WorkOrderStatus::InProgress {
                entry.in_progress += 1;
            }
        }

        let mut metrics: Vec<WorkCenterMetrics> = centers
            .into_iter()
            .map(|(name, acc)| {
                let order_count = acc.order_count as f64;
                let critical_fraction = acc.on_critical_path as f64 / order_count;
                let average_hours = acc.total_duration_hours / order_count;
                let in_progress_fraction = acc.in_progress as f64 / order_count;
                let score = 0.5 * critical_fraction
                    + 0.3 * (average_hours / 8.0).min(1.0)
                    + 0.2 * in_progress_fraction;
                WorkCenterMetrics {
                    work_center: name.to_string(),
                    order_count: acc.order_count,
                    total_duration_hours: round3(acc.total_duration_hours),
                    on_critical_path: acc.on_critical_path,
                    in_progress: acc.in_progress,
                    bottleneck_score: round3(score),
                }
            })
            .collect();

        // 同分按名称排序，保证输出稳定
        metrics.sort_by(|a, b| {
            b.bottleneck_score
                .partial_cmp(&a.bottleneck_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.work_center.cmp(&b.work_center))
        });
        metrics
    }
}

fn duration_hours(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn row(
        order_id: i64,
        lot: &str,
        category: &str,
        work_center: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: WorkOrderStatus,
    ) -> OrderFlowRow {
        OrderFlowRow {
            order_id,
            lot_number: lot.to_string(),
            product_name: format!("Item {}", order_id),
            product_category: category.to_string(),
            quantity: 100,
            planned_start: start,
            planned_end: end,
            status,
            work_center_name: work_center.to_string(),
        }
    }

    #[test]
    fn empty_graph_yields_empty_path() {
        let graph = ProductionGraph::build(Vec::new());
        assert!(graph.critical_path().is_empty());
        assert!(graph.bottleneck_metrics().is_empty());
    }

    #[test]
    fn isolated_order_is_its_own_path() {
        let graph = ProductionGraph::build(vec![row(
            42,
            "LOT-A",
            "Components",
            "Frame Fabrication",
            dt(1, 8),
            dt(1, 16),
            WorkOrderStatus::Completed,
        )]);
        assert_eq!(graph.critical_path(), vec![42]);
    }

    #[test]
    fn chained_lot_forms_critical_path() {
        // 5 顶点: 同批次 4 张顺承工单 + 1 张与链路无关的并行工单
        let graph = ProductionGraph::build(vec![
            row(
                1,
                "LOT-A",
                "Components",
                "Frame Fabrication",
                dt(1, 8),
                dt(1, 12),
                WorkOrderStatus::Completed,
            ),
            row(
                2,
                "LOT-A",
                "Subassemblies",
                "Wheel Production",
                dt(1, 13),
                dt(1, 18),
                WorkOrderStatus::Completed,
            ),
            row(
                3,
                "LOT-A",
                "Electric Bikes",
                "Final Assembly Line 1",
                dt(2, 8),
                dt(2, 16),
                WorkOrderStatus::InProgress,
            ),
            row(
                4,
                "LOT-B",
                "Components",
                "Battery Production",
                dt(1, 8),
                dt(1, 10),
                WorkOrderStatus::Completed,
            ),
            row(
                5,
                "LOT-A",
                "Components",
                "Packaging and Shipping",
                dt(3, 8),
                dt(3, 12),
                WorkOrderStatus::Scheduled,
            ),
        ]);

        // 1 -> 2 (顺承) -> 3 (物料依赖, 权 2) -> 5 (顺承) 为最长链
        let path = graph.critical_path();
        assert_eq!(path, vec![1, 2, 3, 5]);
    }

    #[test]
    fn material_edges_stay_within_a_lot() {
        // 同批次: 子装配 -> 成品的物料依赖边覆盖顺承边，权重升为 2
        let same_lot = ProductionGraph::build(vec![
            row(
                10,
                "LOT-A",
                "Subassemblies",
                "Motor Assembly",
                dt(1, 8),
                dt(1, 12),
                WorkOrderStatus::Completed,
            ),
            row(
                20,
                "LOT-A",
                "Electric Bikes",
                "Final Assembly Line 1",
                dt(2, 8),
                dt(2, 16),
                WorkOrderStatus::Scheduled,
            ),
        ]);
        assert_eq!(same_lot.edge_count(), 1);
        assert_eq!(same_lot.critical_path(), vec![10, 20]);

        // 跨批次: 没有任何依赖边
        let cross_lot = ProductionGraph::build(vec![
            row(
                10,
                "LOT-A",
                "Subassemblies",
                "Motor Assembly",
                dt(1, 8),
                dt(1, 12),
                WorkOrderStatus::Completed,
            ),
            row(
                20,
                "LOT-B",
                "Electric Bikes",
                "Final Assembly Line 1",
                dt(2, 8),
                dt(2, 16),
                WorkOrderStatus::Scheduled,
            ),
        ]);
        assert_eq!(cross_lot.edge_count(), 0);
        assert_eq!(cross_lot.critical_path().len(), 1);
    }

    #[test]
    fn backward_edge_is_dropped_before_relaxation() {
        // 计划时间倒挂的脏数据: 子装配工单 planned_end 早于 planned_start，
        // 物料依赖边与顺承边构成环，求最长路前必须剔除起点晚于终点的边
        let graph = ProductionGraph::build(vec![
            row(
                1,
                "LOT-A",
                "Electric Bikes",
                "Final Assembly Line 1",
                dt(1, 8),
                dt(1, 16),
                WorkOrderStatus::Completed,
            ),
            row(
                2,
                "LOT-A",
                "Subassemblies",
                "Motor Assembly",
                dt(3, 8),
                dt(1, 6),
                WorkOrderStatus::Completed,
            ),
        ]);
        // 顺承边 1->2 与物料依赖边 2->1 构成环
        assert_eq!(graph.edge_count(), 2);
        // 倒挂的物料边被剔除，路径沿顺承边展开且不会死循环
        assert_eq!(graph.critical_path(), vec![1, 2]);
    }

    #[test]
    fn bottleneck_scores_rank_busy_centers_first() {
        let graph = ProductionGraph::build(vec![
            row(
                1,
                "LOT-A",
                "Components",
                "Battery Production",
                dt(1, 8),
                dt(1, 20),
                WorkOrderStatus::InProgress,
            ),
            row(
                2,
                "LOT-B",
                "Components",
                "Packaging and Shipping",
                dt(1, 8),
                dt(1, 9),
                WorkOrderStatus::Completed,
            ),
        ]);

        let metrics = graph.bottleneck_metrics();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].work_center, "Battery Production");
        assert!(metrics[0].bottleneck_score > metrics[1].bottleneck_score);
        for metric in &metrics {
            assert!(metric.bottleneck_score >= 0.0 && metric.bottleneck_score <= 1.0);
        }
    }
}
