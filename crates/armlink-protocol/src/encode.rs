//! 响应行编码
//!
//! 出站行沿用入站的逗号分隔约定。浮点数用 Rust `Display` 的最短
//! 往返表示渲染，保证解析-编码往返不丢精度。

use crate::ProtocolError;
use crate::instruction::IoLevel;
use crate::pose::{JointAngles, Transform};
use std::fmt::Write;

/// 查询结果响应
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// 同步执行成功
    Ok,
    /// 单个数值（如夹爪开度）
    Float(f64),
    /// 数字输入电平
    Level(IoLevel),
    /// 当前笛卡尔位姿
    Transform(Transform),
    /// 当前关节角
    Joints(JointAngles),
    /// 自定义处理器的原样负载
    Text(String),
}

impl Response {
    /// 渲染为一条出站行（不含行终止符）
    pub fn encode(&self) -> String {
        match self {
            Response::Ok => "OK".to_string(),
            Response::Float(v) => format!("{v}"),
            Response::Level(level) => level.keyword().to_string(),
            Response::Transform(t) => encode_floats(&t.to_array()),
            Response::Joints(j) => encode_floats(&j.to_array()),
            Response::Text(s) => s.clone(),
        }
    }
}

fn encode_floats(values: &[f64]) -> String {
    let mut out = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // f64 的 Display 即最短往返表示
        let _ = write!(out, "{v}");
    }
    out
}

/// 错误响应代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedLine,
    MalformedInstruction,
    UnhandledCustom,
    ExecutionFailure,
    QueueHalted,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedLine => "MALFORMED_LINE",
            ErrorCode::MalformedInstruction => "MALFORMED_INSTRUCTION",
            ErrorCode::UnhandledCustom => "UNHANDLED_CUSTOM",
            ErrorCode::ExecutionFailure => "EXECUTION_FAILURE",
            ErrorCode::QueueHalted => "QUEUE_HALTED",
        }
    }
}

impl From<&ProtocolError> for ErrorCode {
    fn from(err: &ProtocolError) -> Self {
        match err {
            ProtocolError::MalformedLine(_) => ErrorCode::MalformedLine,
            ProtocolError::MalformedInstruction { .. } => ErrorCode::MalformedInstruction,
        }
    }
}

/// 渲染一条错误行：`ERROR,<CODE>,<message>`
///
/// message 作为最后一个字段，允许含逗号。
pub fn encode_error(code: ErrorCode, message: &str) -> String {
    format!("ERROR,{},{}", code.as_str(), message)
}
