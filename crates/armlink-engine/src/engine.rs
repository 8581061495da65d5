//! 引擎门面
//!
//! `Engine` 封装运动队列与排空线程的生命周期，对外提供入队、清队、
//! 立即执行与状态查询。

use crate::device::MotionController;
use crate::error::EngineError;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::params::ParamStore;
use crate::pipeline::{drain_loop, execute_command};
use crate::queue::MotionQueue;
use crate::state::{AtomicEngineState, EngineState};
use armlink_protocol::{MotionParam, RobotCommand};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{JoinHandle, spawn};
use tracing::{debug, error, trace};

/// 指令执行引擎
///
/// 构造时启动排空线程，Drop 时回收。队列与当前参数集在排空线程和
/// 调用方线程之间共享；立即路径绕过队列直达控制器，既不等待也不
/// 阻塞排空。
pub struct Engine {
    queue: Arc<MotionQueue>,
    params: Arc<ParamStore>,
    controller: Arc<dyn MotionController>,
    state: Arc<AtomicEngineState>,
    /// 运行标志（用于排空线程生命周期联动）
    running: Arc<AtomicBool>,
    metrics: Arc<EngineMetrics>,
    /// 排空线程句柄（Drop 时 join）
    drain_thread: Option<JoinHandle<()>>,
}

impl Engine {
    /// 创建引擎并启动排空线程
    pub fn new(controller: Arc<dyn MotionController>) -> Self {
        let queue = Arc::new(MotionQueue::new());
        let params = Arc::new(ParamStore::new());
        let state = Arc::new(AtomicEngineState::default());
        let running = Arc::new(AtomicBool::new(true));
        let metrics = Arc::new(EngineMetrics::new());

        let drain_thread = {
            let queue = queue.clone();
            let controller = controller.clone();
            let params = params.clone();
            let state = state.clone();
            let running = running.clone();
            let metrics = metrics.clone();
            spawn(move || {
                drain_loop(queue, controller, params, state, running, metrics);
            })
        };

        Self {
            queue,
            params,
            controller,
            state,
            running,
            metrics,
            drain_thread: Some(drain_thread),
        }
    }

    /// 追加指令到运动队列，立即返回（不等待排空）
    pub fn enqueue(&self, commands: &[RobotCommand]) -> Result<(), EngineError> {
        self.queue.append(commands)?;
        self.metrics.record_enqueued(commands.len() as u64);
        trace!(
            "enqueued {} command(s), queue depth {}",
            commands.len(),
            self.queue.len()
        );
        Ok(())
    }

    /// 原子清空队列（也解除失败停止状态）
    pub fn clear(&self) {
        let removed = self.queue.clear();
        self.metrics.record_clear();
        debug!("queue cleared, {removed} pending entry(ies) dropped");
    }

    /// 立即路径：同步执行，绕过运动队列
    ///
    /// 逐条执行，失败即返回；失败不影响队列状态。
    pub fn execute(&self, commands: &[RobotCommand]) -> Result<(), EngineError> {
        for command in commands {
            execute_command(command, self.controller.as_ref(), &self.params).map_err(|err| {
                self.metrics.record_failure();
                EngineError::Execution(err)
            })?;
            self.metrics.record_immediate();
        }
        Ok(())
    }

    /// 当前排空状态
    pub fn state(&self) -> EngineState {
        self.state.get(Ordering::Acquire)
    }

    /// 当前队列深度
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// 队列是否因执行失败停止
    pub fn is_halted(&self) -> bool {
        self.queue.is_halted()
    }

    /// 当前参数集快照
    pub fn current_params(&self) -> MotionParam {
        self.params.load()
    }

    /// 指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.queue.notify_shutdown();
        if let Some(handle) = self.drain_thread.take() {
            if handle.join().is_err() {
                error!("drain thread panicked during shutdown");
            }
        }
    }
}
