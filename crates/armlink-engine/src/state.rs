//! 引擎状态机定义
//!
//! 状态由排空线程维护，接收线程与操作员查询只读。

use std::sync::atomic::{AtomicU8, Ordering};

/// 排空状态
///
/// - **Idle**: 队列为空，没有排空在进行
/// - **Draining**: 排空循环正在把队列条目交给运动控制器
/// - **BarrierWait**: 排空循环停在 `Sync` 条目上，等待控制器沉降
/// - **Halted**: 某条目执行失败，排空停止，队列余下条目保留
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EngineState {
    #[default]
    Idle = 0,
    Draining = 1,
    BarrierWait = 2,
    Halted = 3,
}

impl EngineState {
    /// 从 u8 转换，无效值返回 Idle
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Draining,
            2 => Self::BarrierWait,
            3 => Self::Halted,
            _ => Self::Idle,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_halted(self) -> bool {
        self == Self::Halted
    }
}

/// 引擎状态（原子版本，用于线程间共享）
#[derive(Debug)]
pub struct AtomicEngineState {
    inner: AtomicU8,
}

impl AtomicEngineState {
    pub fn new(state: EngineState) -> Self {
        Self {
            inner: AtomicU8::new(state.as_u8()),
        }
    }

    pub fn get(&self, ordering: Ordering) -> EngineState {
        EngineState::from_u8(self.inner.load(ordering))
    }

    pub fn set(&self, state: EngineState, ordering: Ordering) {
        self.inner.store(state.as_u8(), ordering);
    }
}

impl Default for AtomicEngineState {
    fn default() -> Self {
        Self::new(EngineState::Idle)
    }
}
