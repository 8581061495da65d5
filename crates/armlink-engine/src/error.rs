//! 引擎层错误类型定义

use crate::device::DeviceError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// 协作者拒绝了一条指令
    #[error("execution failure: {0}")]
    Execution(#[from] DeviceError),

    /// 排空因先前失败而停止，需 `DEQUEUE` 清队后恢复
    #[error("motion queue halted by a prior execution failure")]
    QueueHalted,

    /// 没有注册对应的自定义指令处理器
    #[error("no custom handler registered for {0:?}")]
    UnhandledCustom(String),
}
