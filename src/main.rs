// ==========================================
// MES 数据仿真系统 - 命令行入口
// ==========================================
// 模式:
// - create:  删除既有数据库文件，建库建表后全量生成
// - refresh: 保留表结构，清空数据后重新生成
// - auto:    数据库文件存在则 refresh，否则 create
// ==========================================

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use mes_simulator::engine::{MesSimulator, SimulatorOptions};
use mes_simulator::{db, logging, DataPools};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "mes-simulator",
    about = "生成引用一致、同种子可复现的合成 MES 数据集 (SQLite)"
)]
struct Cli {
    /// 数据池配置文件路径
    #[arg(long, default_value = "data/data_pools.json")]
    config: PathBuf,

    /// 目标 SQLite 数据库路径
    #[arg(long, default_value = "mes.db")]
    db: PathBuf,

    /// 随机种子（缺省取当前 Unix 秒，记入日志便于复现）
    #[arg(long)]
    seed: Option<u64>,

    /// 历史数据窗口（天）
    #[arg(long, default_value_t = 90)]
    lookback: i64,

    /// 排程数据窗口（天）
    #[arg(long, default_value_t = 14)]
    lookahead: i64,

    /// 工单数量
    #[arg(long, default_value_t = 200)]
    orders: usize,

    /// 员工数量
    #[arg(long, default_value_t = 50)]
    employees: usize,

    /// 生成模式
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Mode {
    /// 删库重建
    Create,
    /// 清空数据后重新生成（保留表结构）
    Refresh,
    /// 数据库存在则 refresh，否则 create
    Auto,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let pools = DataPools::load(&cli.config)
        .with_context(|| format!("加载数据池配置失败: {}", cli.config.display()))?;

    let mut options = SimulatorOptions::new(Utc::now().naive_utc());
    options.seed = cli.seed;
    options.lookback_days = cli.lookback;
    options.lookahead_days = cli.lookahead;
    options.order_count = cli.orders;
    options.employee_count = cli.employees;

    let db_exists = cli.db.exists();
    // auto 模式归一为 create / refresh
    let use_refresh = match cli.mode {
        Mode::Refresh => true,
        Mode::Create => false,
        Mode::Auto => db_exists,
    };
    info!(
        mode = if use_refresh { "refresh" } else { "create" },
        db = %cli.db.display(),
        "生成模式已确定"
    );

    let db_path = cli
        .db
        .to_str()
        .with_context(|| format!("数据库路径不是合法 UTF-8: {}", cli.db.display()))?;

    let simulator = MesSimulator::new(pools, options);
    let summary = if use_refresh {
        if !db_exists {
            bail!(
                "refresh 模式要求数据库已存在: {}（先用 create 模式初始化）",
                cli.db.display()
            );
        }
        let mut conn = db::open_sqlite_connection(db_path)?;
        simulator.refresh(&mut conn)?
    } else {
        if db_exists {
            std::fs::remove_file(&cli.db)
                .with_context(|| format!("删除既有数据库失败: {}", cli.db.display()))?;
        }
        let mut conn = db::open_sqlite_connection(db_path)?;
        simulator.create_schema(&conn)?;
        simulator.generate_all(&mut conn)?
    };

    info!(
        work_orders = summary.work_orders,
        quality_checks = summary.quality_checks,
        oee_rows = summary.oee_rows,
        "数据集写入完成: {}",
        cli.db.display()
    );
    Ok(())
}
