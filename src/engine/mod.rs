// ==========================================
// MES 数据仿真系统 - 生成引擎
// ==========================================
// 职责: 按依赖顺序生成各类实体并保证引用/时间一致性
// 阶段: 参考实体 -> 依赖实体 -> 工单 -> 下游事件
// 约束: 随机流只来自显式传入的种子化 RNG，同种子同配置可复现
// ==========================================

pub mod dependent;
pub mod downstream;
pub mod error;
pub mod flow_graph;
pub mod reference;
pub mod routing;
pub mod simulator;
pub mod work_orders;

pub use error::{SimulatorError, SimulatorResult};
pub use flow_graph::{ProductionGraph, WorkCenterMetrics};
pub use simulator::{GenerationSummary, MesSimulator, SimulatorOptions};

/// 保留两位小数（成本、比率类字段）
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 保留四位小数（质检/OEE 比率字段，先舍入再求和保证闭合）
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// 由 RNG 派生批次号/物料批号用的短 UUID 段
///
/// 不使用 Uuid::new_v4: 它直接取操作系统熵源，会破坏同种子复现。
pub(crate) fn short_uuid<R: rand::Rng>(rng: &mut R) -> String {
    let uuid = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
    uuid.simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round4(0.123456), 0.1235);
    }

    #[test]
    fn short_uuid_is_seed_deterministic() {
        let a = short_uuid(&mut ChaCha8Rng::seed_from_u64(7));
        let b = short_uuid(&mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }
}
