//! # Armlink CLI
//!
//! 机械臂指令服务的命令行入口。
//!
//! ```bash
//! # 以仿真后端启动守护进程
//! armlink-cli serve --port 50003
//!
//! # 离线校验一份指令脚本
//! armlink-cli check motions.txt
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{CheckCommand, ServeCommand};

/// Armlink CLI - 机械臂指令服务命令行工具
#[derive(Parser, Debug)]
#[command(name = "armlink-cli")]
#[command(about = "Command-line interface for the armlink robot-arm command server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动指令服务（仿真设备后端）
    Serve {
        #[command(flatten)]
        args: ServeCommand,
    },

    /// 离线校验指令脚本
    Check {
        #[command(flatten)]
        args: CheckCommand,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { args } => args.run(),
        Commands::Check { args } => args.run(),
    }
}
