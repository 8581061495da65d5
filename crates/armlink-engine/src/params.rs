//! 当前运动参数集
//!
//! 写入很少（`PARAM` 指令），读取在每条运动下发时发生；用 `ArcSwap`
//! 让排空线程与立即路径无锁读取。

use arc_swap::ArcSwap;
use armlink_protocol::MotionParam;
use std::sync::Arc;

/// 当前参数集的无锁快照容器
///
/// 队列排空与立即执行共用同一份当前参数：排空到的 `Param` 条目和
/// 立即执行的 `Param` 指令都更新这里，对之后下发的运动生效，
/// 从不回溯已下发的运动。
#[derive(Debug, Default)]
pub struct ParamStore {
    inner: ArcSwap<MotionParam>,
}

impl ParamStore {
    /// 以默认参数集创建
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> MotionParam {
        **self.inner.load()
    }

    pub fn store(&self, params: MotionParam) {
        self.inner.store(Arc::new(params));
    }
}
