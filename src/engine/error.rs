// ==========================================
// MES 数据仿真系统 - 引擎层错误类型
// ==========================================
// 错误分级:
// - 配置错误: 致命，任何写入发生前中止
// - 持久化错误: 致命，整个生成事务回滚
// - 引用一致性错误: 致命（上游阶段产出为空）
// - 启发式落空: 本地降级为随机选择，只记 warn，不上抛
// ==========================================

use crate::config::ConfigError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 仿真引擎错误类型
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("数据库操作失败: {0}")]
    Database(#[from] rusqlite::Error),

    /// 权重表来自常量或配置，出错说明配置里出现了全零/负数权重
    #[error("采样权重非法: {0}")]
    Weights(#[from] rand::distr::weighted::Error),

    /// 必需外键的候选集为空 —— 说明上游阶段没有产出实体，属于配置/流程错误
    #[error("引用一致性违规: 阶段 `{stage}` 需要至少一个 `{entity}` 候选，但候选集为空")]
    EmptyCandidateSet {
        stage: &'static str,
        entity: &'static str,
    },
}

/// Result 类型别名
pub type SimulatorResult<T> = Result<T, SimulatorError>;
