//! 队列指令数据模型
//!
//! `RobotCommand` 是运动队列的条目类型，四个变体对应四种排空语义：
//! 运动（交给控制器）、参数（更新当前参数集）、休眠（暂停排空）、
//! 同步屏障（等待控制器沉降）。

use crate::pose::Pose;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// 编译期断言：确保 RobotCommand 永远实现 Copy，这对 SmallVec 性能至关重要
// 如果未来有人给 RobotCommand 添加非 Copy 字段（如 String），这里会编译失败
#[cfg(test)]
const _: () = {
    fn assert_copy<T: Copy>() {}
    fn check() {
        assert_copy::<RobotCommand>();
    }
    let _ = check;
};

/// 指令缓冲区类型
///
/// 一条 `EXECUTE`/`ENQUEUE` 行今天只携带一条 `RobotCommand`，
/// 但文法将其建模为可重复元素；栈上预留 2 个位置，单条指令不分配堆。
pub type CommandBuffer = SmallVec<[RobotCommand; 2]>;

/// 插补方式
///
/// 线格式关键字：`L` / `LR` / `J` / `JR`。
/// 相对变体（`*R`）的位姿解释为相对当前位姿的偏移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    Linear,
    LinearRelative,
    Joint,
    JointRelative,
}

impl MotionKind {
    /// 线格式关键字
    pub fn keyword(self) -> &'static str {
        match self {
            MotionKind::Linear => "L",
            MotionKind::LinearRelative => "LR",
            MotionKind::Joint => "J",
            MotionKind::JointRelative => "JR",
        }
    }
}

/// 运动参数集
///
/// 线格式为 6 个位置参数，顺序固定。协议层不做范围检查，
/// 越界值由运动控制器在执行时拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionParam {
    pub speed: f64,
    pub accel: f64,
    pub blend_linear: f64,
    pub blend_angular: f64,
    pub tcp_speed_linear: f64,
    pub tcp_speed_angular: f64,
}

impl MotionParam {
    /// 线格式字段数
    pub const FIELD_COUNT: usize = 6;

    pub fn from_array(v: [f64; 6]) -> Self {
        Self {
            speed: v[0],
            accel: v[1],
            blend_linear: v[2],
            blend_angular: v[3],
            tcp_speed_linear: v[4],
            tcp_speed_angular: v[5],
        }
    }

    pub fn to_array(self) -> [f64; 6] {
        [
            self.speed,
            self.accel,
            self.blend_linear,
            self.blend_angular,
            self.tcp_speed_linear,
            self.tcp_speed_angular,
        ]
    }
}

/// 队列指令
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RobotCommand {
    /// 运动指令：以当前参数集交给运动控制器
    Motion { kind: MotionKind, pose: Pose },
    /// 更新当前参数集，对后续排空的运动生效，不回溯
    Param(MotionParam),
    /// 暂停排空指定秒数（不阻塞指令接收）
    Sleep { seconds: f64 },
    /// 同步屏障：等待此前所有运动沉降
    Sync,
}

impl RobotCommand {
    pub fn motion(kind: MotionKind, pose: impl Into<Pose>) -> Self {
        RobotCommand::Motion {
            kind,
            pose: pose.into(),
        }
    }

    pub fn sleep(seconds: f64) -> Self {
        RobotCommand::Sleep { seconds }
    }
}
