//! 服务配置

use crate::ServerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    // 上位机侧历史默认端口
    50003
}

/// 服务配置（TOML）
///
/// ```toml
/// bind = "0.0.0.0"
/// port = 50003
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_bind")]
    pub bind: String,
    /// 监听端口（0 表示由系统分配，测试用）
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 从 TOML 文件加载
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.as_ref().display())))?;
        toml::from_str(&text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// `bind:port` 形式的监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
