//! 顶层指令数据模型
//!
//! 每行解析出一条 `Instruction`，由分派器路由到立即执行、入队、
//! 清队或查询路径。

use crate::command::CommandBuffer;
use serde::{Deserialize, Serialize};

/// 夹爪操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GripperOp {
    Activate,
    Get,
    /// 移动到预定义标签位置（标签原样透传给夹爪驱动）
    Set(String),
}

/// 数字 I/O 信号源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IoSource {
    /// Beckhoff 总线端口（需要端口号）
    Beckhoff { index: u8 },
    /// 腕部 I/O（无端口号）
    Wrist,
}

/// 数字电平
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IoLevel {
    High,
    Low,
}

impl IoLevel {
    /// 线格式关键字
    pub fn keyword(self) -> &'static str {
        match self {
            IoLevel::High => "HIGH",
            IoLevel::Low => "LOW",
        }
    }
}

/// 数字 I/O 操作方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoKind {
    /// 读取输入电平（产生响应行）
    Input,
    /// 写出输出电平
    Output(IoLevel),
}

/// 数字 I/O 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalOp {
    pub source: IoSource,
    pub kind: IoKind,
}

/// 当前状态查询目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentOp {
    /// 当前笛卡尔位姿
    Frame,
    /// 当前关节角
    Joint,
}

/// 顶层指令
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// 立即同步执行，绕过运动队列
    Execute(CommandBuffer),
    /// 追加到运动队列，立即返回
    Enqueue(CommandBuffer),
    /// 原子清空运动队列（不打断在途运动）
    Dequeue,
    Gripper(GripperOp),
    Digital(DigitalOp),
    Current(CurrentOp),
    /// 不透明字段序列，按第一个字段路由到注册的处理器
    Custom(Vec<String>),
}
