//! serve 子命令
//!
//! 以仿真设备后端宿主指令引擎，直到 Ctrl-C。

use anyhow::{Context, Result};
use armlink_engine::{CustomRegistry, Dispatcher, Engine};
use armlink_server::{Server, ServerConfig, SimDigitalIo, SimGripper, sim_arm};
use clap::Args;
use crossbeam_channel::bounded;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub struct ServeCommand {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 监听地址（覆盖配置文件）
    #[arg(long)]
    bind: Option<String>,

    /// 监听端口（覆盖配置文件）
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeCommand {
    pub fn run(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        let (controller, state) = sim_arm();
        let mut registry = CustomRegistry::new();
        registry.register("ECHO", |fields: &[String]| Ok(Some(fields[1..].join(","))));

        let dispatcher = Arc::new(Dispatcher::new(
            Engine::new(controller),
            Arc::new(SimGripper::default()),
            Arc::new(SimDigitalIo::default()),
            state,
            registry,
        ));

        let mut server = Server::spawn(&config.listen_addr(), dispatcher)?;
        info!(
            "armlink daemon ready on {} (simulated backends)",
            server.local_addr()
        );

        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        ctrlc::set_handler(move || {
            let _ = shutdown_tx.try_send(());
        })
        .context("failed to install Ctrl-C handler")?;

        let _ = shutdown_rx.recv();
        info!("shutting down");
        server.shutdown();
        Ok(())
    }
}
