//! 监听循环与连接线程管理

use crate::ServerError;
use crate::session::run_session;
use armlink_engine::Dispatcher;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// 接受循环的空转轮询间隔
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// TCP 服务
///
/// 绑定后在独立线程接受连接，每个连接再起一个会话线程；所有会话
/// 共享同一个 `Dispatcher`（同一条机械臂）。
pub struct Server {
    addr: SocketAddr,
    /// 运行标志（用于接受线程生命周期联动）
    running: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
}

impl Server {
    /// 绑定地址并启动接受循环
    ///
    /// 端口 0 表示由系统分配（测试用），实际地址见 [`Server::local_addr`]。
    pub fn spawn(listen_addr: &str, dispatcher: Arc<Dispatcher>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(listen_addr)?;
        // 非阻塞接受，使运行标志能在无连接时被观察到
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        info!("listening on {addr}");

        let running = Arc::new(AtomicBool::new(true));
        let accept_running = running.clone();
        let accept_thread = thread::spawn(move || {
            accept_loop(listener, dispatcher, accept_running);
        });

        Ok(Self {
            addr,
            running,
            accept_thread: Some(accept_thread),
        })
    }

    /// 实际监听地址
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// 停止接受新连接并回收接受线程
    ///
    /// 已建立的会话在各自对端断开时自然结束。
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.accept_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn accept_loop(listener: TcpListener, dispatcher: Arc<Dispatcher>, running: Arc<AtomicBool>) {
    while running.load(Ordering::Acquire) {
        match listener.accept() {
            Ok((stream, peer)) => {
                debug!("accepted connection from {peer}");
                // 会话按阻塞 IO 工作
                if let Err(err) = stream.set_nonblocking(false) {
                    error!("failed to configure stream for {peer}: {err}");
                    continue;
                }
                let dispatcher = dispatcher.clone();
                thread::spawn(move || {
                    if let Err(err) = run_session(stream, dispatcher) {
                        error!("session for {peer} ended with IO error: {err}");
                    }
                });
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(err) => {
                error!("accept failed: {err}");
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
    debug!("accept loop stopped");
}
