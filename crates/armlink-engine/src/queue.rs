//! 运动队列
//!
//! 接收线程（追加、清空）与排空线程（弹出）之间唯一共享的缓冲区。
//! 锁只在缓冲区变更期间持有；排空线程在 `Sleep`/`Sync` 挂起时不持
//! 锁，追加延迟从不被排空侧的等待放大。

use crate::error::EngineError;
use crate::state::{AtomicEngineState, EngineState};
use armlink_protocol::RobotCommand;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct QueueInner {
    buf: VecDeque<RobotCommand>,
    /// 排空因执行失败停止；置位期间拒绝追加，`clear` 复位
    halted: bool,
}

/// 严格 FIFO 的运动队列
///
/// 进程生命周期内持续存在；变更路径只有追加、单条弹出（排空侧）
/// 和原子整体清空。
#[derive(Debug, Default)]
pub struct MotionQueue {
    inner: Mutex<QueueInner>,
    cond: Condvar,
}

impl MotionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一批指令，保持入队顺序
    ///
    /// 队列处于停止状态时拒绝（`QueueHalted`），保留现场等操作员
    /// 清队。
    pub fn append(&self, commands: &[RobotCommand]) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        if inner.halted {
            return Err(EngineError::QueueHalted);
        }
        inner.buf.extend(commands.iter().copied());
        drop(inner);
        self.cond.notify_one();
        Ok(())
    }

    /// 原子清空所有未下发条目，并解除停止状态
    ///
    /// 返回被移除的条目数。对已交给控制器的在途运动无影响。
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let removed = inner.buf.len();
        inner.buf.clear();
        inner.halted = false;
        drop(inner);
        self.cond.notify_one();
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().buf.is_empty()
    }

    pub fn is_halted(&self) -> bool {
        self.inner.lock().halted
    }

    /// 排空侧：标记停止（队列内容保留）
    pub(crate) fn halt(&self) {
        self.inner.lock().halted = true;
    }

    /// 排空侧：阻塞等待下一个条目
    ///
    /// 等待期间把共享状态维持为 `Idle`（或 `Halted`），取到条目后
    /// 置为 `Draining`。`running` 复位后返回 `None`。
    pub(crate) fn next_blocking(
        &self,
        running: &AtomicBool,
        state: &AtomicEngineState,
    ) -> Option<RobotCommand> {
        let mut inner = self.inner.lock();
        loop {
            if !running.load(Ordering::Acquire) {
                return None;
            }
            if !inner.halted {
                if let Some(command) = inner.buf.pop_front() {
                    state.set(EngineState::Draining, Ordering::Release);
                    return Some(command);
                }
                state.set(EngineState::Idle, Ordering::Release);
            } else {
                state.set(EngineState::Halted, Ordering::Release);
            }
            self.cond.wait(&mut inner);
        }
    }

    /// 唤醒排空线程检查 `running` 标志
    pub(crate) fn notify_shutdown(&self) {
        self.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armlink_protocol::{MotionKind, Pose, Transform};

    fn motion(x: f64) -> RobotCommand {
        RobotCommand::Motion {
            kind: MotionKind::Linear,
            pose: Pose::Transform(Transform::new(x, 0.0, 0.0, 0.0, 0.0, 0.0)),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let queue = MotionQueue::new();
        queue.append(&[motion(1.0)]).unwrap();
        queue.append(&[motion(2.0), motion(3.0)]).unwrap();
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_clear_empties_queue() {
        let queue = MotionQueue::new();
        queue
            .append(&[motion(1.0), RobotCommand::Sync, motion(2.0)])
            .unwrap();
        assert_eq!(queue.clear(), 3);
        assert!(queue.is_empty());
        // 清空后追加的条目不受之前的 clear 影响
        queue.append(&[motion(4.0)]).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_halted_queue_rejects_append() {
        let queue = MotionQueue::new();
        queue.append(&[motion(1.0)]).unwrap();
        queue.halt();
        assert!(queue.is_halted());
        assert!(matches!(
            queue.append(&[motion(2.0)]),
            Err(EngineError::QueueHalted)
        ));
        // 现场保留
        assert_eq!(queue.len(), 1);

        // clear 解除停止
        queue.clear();
        assert!(!queue.is_halted());
        queue.append(&[motion(3.0)]).unwrap();
    }
}
