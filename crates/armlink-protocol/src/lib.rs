//! # Armlink Protocol
//!
//! 机械臂文本指令协议定义（无 I/O 依赖）
//!
//! ## 模块
//!
//! - `token`: 行分词（逗号分隔字段）
//! - `pose`: 位姿数据类型（笛卡尔 / 关节角）
//! - `command`: 队列指令数据模型（`RobotCommand`）
//! - `instruction`: 顶层指令数据模型（`Instruction`）
//! - `parse`: 按关键字文法解析字段序列
//! - `encode`: 响应行编码
//!
//! ## 线格式
//!
//! 每行一条指令，字段用逗号分隔，字段两侧空白忽略。
//! 关键字大小写不敏感；`CUSTOM` 的负载字段原样透传。

pub mod command;
pub mod encode;
pub mod instruction;
pub mod parse;
pub mod pose;
pub mod token;

// 重新导出常用类型
pub use command::*;
pub use encode::*;
pub use instruction::*;
pub use parse::{Expected, parse_line};
pub use pose::*;
pub use token::tokenize;

use thiserror::Error;

/// 协议解析错误类型
///
/// 解析是按行原子的：任何错误都不会产生部分 `Instruction`。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// 行级错误（空行、空字段）
    #[error("malformed line: {0}")]
    MalformedLine(String),

    /// 指令级错误，携带出错字段下标和期望的文法记号
    #[error("malformed instruction: field {index}: expected {expected}")]
    MalformedInstruction { index: usize, expected: Expected },
}
