//! # Sortarm CLI
//!
//! 水果分拣机械臂的命令行工具。内置模拟硬件，可以在没有机械臂和相机的
//! 机器上演练完整的分拣流程。
//!
//! ```bash
//! # 生成默认配置
//! sortarm-cli config init
//!
//! # 用脚本化的分类结果跑 5 轮分拣
//! sortarm-cli run --cycles 5 --script detections.json
//!
//! # 单独移动到某个标定位姿
//! sortarm-cli move bin_a --yes
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod sim;

use commands::{ClassifyCommand, ConfigCommand, GripCommand, MoveCommand, RunCommand};

/// Sortarm CLI - 水果分拣机械臂命令行工具
#[derive(Parser, Debug)]
#[command(name = "sortarm-cli")]
#[command(about = "Command-line interface for the sortarm fruit sorting arm", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/sortarm/sortarm.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 在模拟硬件上运行分拣会话
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 移动到标定位姿
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 张开或自适应闭合夹爪
    Grip {
        #[command(flatten)]
        args: GripCommand,
    },

    /// 解析分类服务响应并显示路由结果
    Classify {
        #[command(flatten)]
        args: ClassifyCommand,
    },
}

fn main() -> Result<()> {
    sortarm_sdk::logging::init_logging_with("sortarm=info")?;

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => sortarm_sdk::SorterConfig::default_path()?,
    };

    tracing::debug!("Using config {}", config_path.display());

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config_path),
        Commands::Run { args } => args.execute(&config_path),
        Commands::Move { args } => args.execute(&config_path),
        Commands::Grip { args } => args.execute(&config_path),
        Commands::Classify { args } => args.execute(&config_path),
    }
}
