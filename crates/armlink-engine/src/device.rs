//! 外部协作者接口
//!
//! 引擎只依赖这些 trait，不依赖任何硬件实现。所有方法取 `&self`，
//! 实现方用内部可变性自行加锁；同一个控制器可能同时收到排空路径
//! 与立即路径的调用。

use armlink_protocol::{IoLevel, IoSource, JointAngles, MotionKind, MotionParam, Pose, Transform};
use thiserror::Error;

/// 设备错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    Unknown,
    /// 目标超出可达范围或参数越界
    OutOfEnvelope,
    /// 设备未就绪（未激活、未上电）
    NotReady,
    Busy,
    /// 后端通信失败
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct DeviceError {
    pub kind: DeviceErrorKind,
    pub message: String,
}

impl DeviceError {
    pub fn new(kind: DeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn out_of_envelope(message: impl Into<String>) -> Self {
        Self::new(DeviceErrorKind::OutOfEnvelope, message)
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(DeviceErrorKind::NotReady, message)
    }
}

impl From<String> for DeviceError {
    fn from(message: String) -> Self {
        Self::new(DeviceErrorKind::Unknown, message)
    }
}

impl From<&str> for DeviceError {
    fn from(message: &str) -> Self {
        Self::new(DeviceErrorKind::Unknown, message)
    }
}

/// 运动控制器接口
///
/// 连续收到多条运动且无间歇时，平滑衔接（blending）由控制器负责；
/// 引擎保证排空循环不会在两条运动之间插入多余的等待。
pub trait MotionController: Send + Sync {
    /// 以给定参数集下发一条运动，被拒绝时返回原因
    fn issue_motion(
        &self,
        kind: MotionKind,
        pose: Pose,
        params: &MotionParam,
    ) -> Result<(), DeviceError>;

    /// 阻塞直到此前下发的所有运动沉降
    fn await_settle(&self) -> Result<(), DeviceError>;
}

/// 夹爪驱动接口
pub trait GripperDriver: Send + Sync {
    fn activate(&self) -> Result<(), DeviceError>;

    /// 当前开度
    fn get_position(&self) -> Result<f64, DeviceError>;

    /// 移动到预定义标签位置
    fn set(&self, label: &str) -> Result<(), DeviceError>;
}

/// 数字 I/O 驱动接口
pub trait DigitalIoDriver: Send + Sync {
    fn read_input(&self, source: IoSource) -> Result<IoLevel, DeviceError>;

    fn write_output(&self, source: IoSource, level: IoLevel) -> Result<(), DeviceError>;
}

/// 机械臂当前状态源
pub trait StateProvider: Send + Sync {
    fn current_frame(&self) -> Result<Transform, DeviceError>;

    fn current_joints(&self) -> Result<JointAngles, DeviceError>;
}
