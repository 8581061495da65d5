//! # Armlink Server
//!
//! 指令引擎的 TCP 宿主：监听上位机连接，逐行读入指令，经解析与
//! 分派后把响应写回同一连接。
//!
//! ## 模块
//!
//! - `config`: 服务配置（TOML）
//! - `server`: 监听循环与连接线程管理
//! - `session`: 单连接会话（读行 → 解析 → 分派 → 写响应）
//! - `sim`: 无硬件时使用的仿真设备后端
//!
//! 行框架沿用上位机侧约定：入站以 `\n` 结尾，出站以 `\r\n` 结尾。

pub mod config;
pub mod server;
pub mod session;
pub mod sim;

pub use config::ServerConfig;
pub use server::Server;
pub use sim::{SimDigitalIo, SimGripper, SimMotionController, SimStateProvider, sim_arm};

use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServerError {
    /// 监听/连接 IO 错误
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件读取或反序列化失败
    #[error("config error: {0}")]
    Config(String),
}
