//! 排空循环模块
//!
//! 后台线程按 FIFO 把队列条目交给运动控制器。循环只在 `Sleep`
//! （定时）和 `Sync`（等待沉降）两处挂起，两处都不持队列锁，因此
//! 连续的运动条目之间没有多余停顿，控制器可以平滑衔接。

use crate::device::{DeviceError, MotionController};
use crate::metrics::EngineMetrics;
use crate::params::ParamStore;
use crate::queue::MotionQueue;
use crate::state::{AtomicEngineState, EngineState};
use armlink_protocol::RobotCommand;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// 排空循环
///
/// # 参数
/// - `queue`: 共享运动队列
/// - `controller`: 运动控制器（与立即路径共享）
/// - `params`: 当前参数集（与立即路径共享）
/// - `state`: 对外可见的排空状态
/// - `running`: 生命周期标志，复位后循环退出
pub fn drain_loop(
    queue: Arc<MotionQueue>,
    controller: Arc<dyn MotionController>,
    params: Arc<ParamStore>,
    state: Arc<AtomicEngineState>,
    running: Arc<AtomicBool>,
    metrics: Arc<EngineMetrics>,
) {
    debug!("drain loop started");

    while let Some(command) = queue.next_blocking(&running, &state) {
        let result = match command {
            RobotCommand::Sync => {
                state.set(EngineState::BarrierWait, Ordering::Release);
                trace!("barrier reached, waiting for prior motion to settle");
                let result = controller.await_settle();
                state.set(EngineState::Draining, Ordering::Release);
                result
            }
            other => execute_command(&other, controller.as_ref(), &params),
        };

        match result {
            Ok(()) => metrics.record_drained(),
            Err(err) => {
                // 失败即停：余下条目保留在队列里，等操作员清队
                error!("drain halted at failing entry: {err}");
                metrics.record_failure();
                queue.halt();
                state.set(EngineState::Halted, Ordering::Release);
            }
        }
    }

    state.set(EngineState::Idle, Ordering::Release);
    debug!("drain loop stopped");
}

/// 单条指令的执行语义，排空路径与立即路径共用
///
/// `Sync` 在这里是单纯的沉降等待；排空循环在调用前后自行维护
/// `BarrierWait` 状态。
pub(crate) fn execute_command(
    command: &RobotCommand,
    controller: &dyn MotionController,
    params: &ParamStore,
) -> Result<(), DeviceError> {
    match *command {
        RobotCommand::Motion { kind, pose } => {
            trace!("issuing {kind:?} motion");
            controller.issue_motion(kind, pose, &params.load())
        }
        RobotCommand::Param(new_params) => {
            params.store(new_params);
            trace!("current parameter set updated");
            Ok(())
        }
        RobotCommand::Sleep { seconds } => {
            match Duration::try_from_secs_f64(seconds) {
                Ok(duration) => spin_sleep::sleep(duration),
                Err(_) => warn!("ignoring unrepresentable sleep of {seconds} s"),
            }
            Ok(())
        }
        RobotCommand::Sync => controller.await_settle(),
    }
}
