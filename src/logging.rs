// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 生成阶段在 info 级打点（阶段完成、行数统计），
// 启发式降级在 warn 级，逐表/逐行细节在 debug 级
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=mes_simulator=debug 可看到逐表清空、
///   兜底库存补建等生成细节
///
/// # 示例
/// ```no_run
/// use mes_simulator::logging;
/// logging::init();
/// ```
pub fn init() {
    // 从环境变量读取日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 配置日志格式
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 默认只放开本 crate 的 debug 日志，便于定位生成阶段问题
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("mes_simulator=debug"))
        .with_test_writer()
        .try_init();
}
