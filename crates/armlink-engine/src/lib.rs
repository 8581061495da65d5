//! # Armlink Engine
//!
//! 指令执行引擎：在立即执行与运动队列之间分派指令，并用独立的
//! 排空线程把队列条目交给外部运动控制器。
//!
//! ## 模块
//!
//! - `device`: 外部协作者接口（运动控制器、夹爪、数字 I/O、状态源）
//! - `queue`: 运动队列（互斥缓冲 + 条件变量）
//! - `pipeline`: 排空循环与单条指令执行语义
//! - `engine`: 对外门面，管理排空线程生命周期
//! - `dispatch`: 指令路由表
//! - `registry`: 自定义指令处理器注册表
//! - `state`: 引擎状态机（原子共享）
//! - `metrics`: 原子计数器
//!
//! ## 并发模型
//!
//! 指令接收与队列排空互不阻塞：接收线程只在缓冲区变更时短暂持锁，
//! 排空线程在 `Sleep`/`Sync` 挂起时不持锁。`Execute` 立即路径绕过
//! 队列，同步直达控制器；引擎本身不对立即与排空路径做串行化，由
//! 控制器实现自行裁决。

pub mod device;
pub mod dispatch;
pub mod engine;
mod error;
pub mod metrics;
pub mod params;
pub mod pipeline;
pub mod queue;
pub mod registry;
pub mod state;

pub use device::{
    DeviceError, DeviceErrorKind, DigitalIoDriver, GripperDriver, MotionController,
    StateProvider,
};
pub use dispatch::Dispatcher;
pub use engine::Engine;
pub use error::EngineError;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use params::ParamStore;
pub use queue::MotionQueue;
pub use registry::{CustomHandler, CustomRegistry};
pub use state::{AtomicEngineState, EngineState};
