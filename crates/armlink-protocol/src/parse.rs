//! 按关键字文法解析字段序列
//!
//! 每个指令关键字对应一张固定文法表；解析按行原子，任何失败都
//! 返回携带字段下标与期望记号的 `MalformedInstruction`，不产生
//! 部分结果。

use crate::command::{CommandBuffer, MotionKind, MotionParam, RobotCommand};
use crate::instruction::{
    CurrentOp, DigitalOp, GripperOp, Instruction, IoKind, IoLevel, IoSource,
};
use crate::pose::{JointAngles, Pose, Transform};
use crate::{ProtocolError, token};
use std::fmt;

const INSTRUCTION_KEYWORDS: &[&str] = &[
    "EXECUTE", "ENQUEUE", "DEQUEUE", "GRIPPER", "DIGITAL", "CURRENT", "CUSTOM",
];
const COMMAND_KEYWORDS: &[&str] = &["MOTION", "PARAM", "SLEEP", "SYNC"];
const MOTION_KINDS: &[&str] = &["L", "LR", "J", "JR"];
const POSE_KINDS: &[&str] = &["T", "J"];
const GRIPPER_OPS: &[&str] = &["ACTIVATE", "GET", "SET"];
const IO_SOURCES: &[&str] = &["BECKHOFF", "WRIST"];
const IO_KINDS: &[&str] = &["INPUT", "OUTPUT"];
const IO_LEVELS: &[&str] = &["HIGH", "LOW"];
const CURRENT_OPS: &[&str] = &["FRAME", "JOINT"];

/// 文法记号，用于解析诊断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// 闭合关键字集合之一
    Keyword(&'static [&'static str]),
    Float,
    NonNegativeFloat,
    Unsigned8,
    Label,
    EndOfLine,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Keyword(options) => write!(f, "one of {}", options.join("|")),
            Expected::Float => write!(f, "a float"),
            Expected::NonNegativeFloat => write!(f, "a non-negative float"),
            Expected::Unsigned8 => write!(f, "an unsigned 8-bit integer"),
            Expected::Label => write!(f, "a label"),
            Expected::EndOfLine => write!(f, "end of line"),
        }
    }
}

/// 字段游标：顺序消费字段并在失败时报告下标
struct FieldCursor<'a> {
    fields: &'a [&'a str],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(fields: &'a [&'a str]) -> Self {
        Self { fields, pos: 0 }
    }

    fn fail(&self, index: usize, expected: Expected) -> ProtocolError {
        ProtocolError::MalformedInstruction { index, expected }
    }

    fn next(&mut self, expected: Expected) -> Result<&'a str, ProtocolError> {
        let field = self
            .fields
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.fail(self.pos, expected))?;
        self.pos += 1;
        Ok(field)
    }

    /// 匹配闭合关键字集合（大小写不敏感），返回命中的下标
    fn keyword(&mut self, options: &'static [&'static str]) -> Result<usize, ProtocolError> {
        let index = self.pos;
        let field = self.next(Expected::Keyword(options))?;
        options
            .iter()
            .position(|k| field.eq_ignore_ascii_case(k))
            .ok_or_else(|| self.fail(index, Expected::Keyword(options)))
    }

    fn float(&mut self) -> Result<f64, ProtocolError> {
        let index = self.pos;
        let field = self.next(Expected::Float)?;
        field
            .parse::<f64>()
            .map_err(|_| self.fail(index, Expected::Float))
    }

    fn floats6(&mut self) -> Result<[f64; 6], ProtocolError> {
        let mut out = [0.0; 6];
        for slot in &mut out {
            *slot = self.float()?;
        }
        Ok(out)
    }

    fn non_negative_float(&mut self) -> Result<f64, ProtocolError> {
        let index = self.pos;
        let field = self.next(Expected::NonNegativeFloat)?;
        match field.parse::<f64>() {
            // NaN 也不满足 >= 0.0
            Ok(value) if value >= 0.0 => Ok(value),
            _ => Err(self.fail(index, Expected::NonNegativeFloat)),
        }
    }

    fn unsigned8(&mut self) -> Result<u8, ProtocolError> {
        let index = self.pos;
        let field = self.next(Expected::Unsigned8)?;
        field
            .parse::<u8>()
            .map_err(|_| self.fail(index, Expected::Unsigned8))
    }

    fn label(&mut self) -> Result<String, ProtocolError> {
        Ok(self.next(Expected::Label)?.to_string())
    }

    fn rest(&mut self) -> Vec<String> {
        let rest = self.fields[self.pos..]
            .iter()
            .map(|f| f.to_string())
            .collect();
        self.pos = self.fields.len();
        rest
    }

    /// 文法要求所有字段恰好被消费完
    fn finish(&self) -> Result<(), ProtocolError> {
        if self.pos == self.fields.len() {
            Ok(())
        } else {
            Err(self.fail(self.pos, Expected::EndOfLine))
        }
    }
}

/// 解析一行文本为一条 `Instruction`
pub fn parse_line(line: &str) -> Result<Instruction, ProtocolError> {
    let fields = token::tokenize(line)?;
    parse_fields(&fields)
}

/// 解析已分词的字段序列
pub fn parse_fields(fields: &[&str]) -> Result<Instruction, ProtocolError> {
    let mut cur = FieldCursor::new(fields);

    let instruction = match INSTRUCTION_KEYWORDS[cur.keyword(INSTRUCTION_KEYWORDS)?] {
        "EXECUTE" => {
            let mut buf = CommandBuffer::new();
            buf.push(parse_robot_command(&mut cur)?);
            cur.finish()?;
            Instruction::Execute(buf)
        }
        "ENQUEUE" => {
            let mut buf = CommandBuffer::new();
            buf.push(parse_robot_command(&mut cur)?);
            cur.finish()?;
            Instruction::Enqueue(buf)
        }
        "DEQUEUE" => {
            cur.finish()?;
            Instruction::Dequeue
        }
        "GRIPPER" => {
            let op = match GRIPPER_OPS[cur.keyword(GRIPPER_OPS)?] {
                "ACTIVATE" => GripperOp::Activate,
                "GET" => GripperOp::Get,
                "SET" => GripperOp::Set(cur.label()?),
                _ => unreachable!(),
            };
            cur.finish()?;
            Instruction::Gripper(op)
        }
        "DIGITAL" => {
            let source = match IO_SOURCES[cur.keyword(IO_SOURCES)?] {
                "BECKHOFF" => IoSource::Beckhoff {
                    index: cur.unsigned8()?,
                },
                "WRIST" => IoSource::Wrist,
                _ => unreachable!(),
            };
            let kind = match IO_KINDS[cur.keyword(IO_KINDS)?] {
                "INPUT" => IoKind::Input,
                "OUTPUT" => {
                    let level = match IO_LEVELS[cur.keyword(IO_LEVELS)?] {
                        "HIGH" => IoLevel::High,
                        "LOW" => IoLevel::Low,
                        _ => unreachable!(),
                    };
                    IoKind::Output(level)
                }
                _ => unreachable!(),
            };
            cur.finish()?;
            Instruction::Digital(DigitalOp { source, kind })
        }
        "CURRENT" => {
            let op = match CURRENT_OPS[cur.keyword(CURRENT_OPS)?] {
                "FRAME" => CurrentOp::Frame,
                "JOINT" => CurrentOp::Joint,
                _ => unreachable!(),
            };
            cur.finish()?;
            Instruction::Current(op)
        }
        "CUSTOM" => Instruction::Custom(cur.rest()),
        _ => unreachable!(),
    };

    Ok(instruction)
}

/// 从游标贪婪消费一条 `RobotCommand`
///
/// 每次调用恰好消费一条；一行多条由调用方循环（今天一行只有一条）。
fn parse_robot_command(cur: &mut FieldCursor<'_>) -> Result<RobotCommand, ProtocolError> {
    let command = match COMMAND_KEYWORDS[cur.keyword(COMMAND_KEYWORDS)?] {
        "MOTION" => {
            let kind = match MOTION_KINDS[cur.keyword(MOTION_KINDS)?] {
                "L" => MotionKind::Linear,
                "LR" => MotionKind::LinearRelative,
                "J" => MotionKind::Joint,
                "JR" => MotionKind::JointRelative,
                _ => unreachable!(),
            };
            let pose = match POSE_KINDS[cur.keyword(POSE_KINDS)?] {
                "T" => Pose::Transform(Transform::from_array(cur.floats6()?)),
                "J" => Pose::Joints(JointAngles::from_array(cur.floats6()?)),
                _ => unreachable!(),
            };
            RobotCommand::Motion { kind, pose }
        }
        "PARAM" => RobotCommand::Param(MotionParam::from_array(cur.floats6()?)),
        "SLEEP" => RobotCommand::Sleep {
            seconds: cur.non_negative_float()?,
        },
        "SYNC" => RobotCommand::Sync,
        _ => unreachable!(),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_execute_motion() {
        let instr = parse_line("EXECUTE, MOTION, L, T, 0, 0, 0, 0, 0, 0").unwrap();
        match instr {
            Instruction::Execute(buf) => {
                assert_eq!(buf.len(), 1);
                assert_eq!(
                    buf[0],
                    RobotCommand::Motion {
                        kind: MotionKind::Linear,
                        pose: Pose::Transform(Transform::default()),
                    }
                );
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }

    #[test]
    fn test_parse_enqueue_joint_pose() {
        let instr = parse_line("ENQUEUE,MOTION,JR,J,1,2,3,4,5,6").unwrap();
        match instr {
            Instruction::Enqueue(buf) => {
                assert_eq!(
                    buf[0],
                    RobotCommand::Motion {
                        kind: MotionKind::JointRelative,
                        pose: Pose::Joints(JointAngles([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
                    }
                );
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let upper = parse_line("ENQUEUE,SYNC").unwrap();
        let lower = parse_line("enqueue,sync").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_parse_param() {
        let instr = parse_line("ENQUEUE,PARAM,0.5,0.5,0.01,0.1,0.25,1").unwrap();
        match instr {
            Instruction::Enqueue(buf) => {
                assert_eq!(
                    buf[0],
                    RobotCommand::Param(MotionParam::from_array([0.5, 0.5, 0.01, 0.1, 0.25, 1.0]))
                );
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }

    #[test]
    fn test_parse_param_arity_mismatch() {
        // 5 个浮点数：第 7 个字段缺失
        let err = parse_line("ENQUEUE,PARAM,1,2,3,4,5").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 7,
                expected: Expected::Float,
            }
        );
    }

    #[test]
    fn test_parse_sleep() {
        let instr = parse_line("ENQUEUE,SLEEP,1.5").unwrap();
        assert_eq!(
            instr,
            Instruction::Enqueue(CommandBuffer::from_slice(&[RobotCommand::Sleep {
                seconds: 1.5
            }]))
        );
    }

    #[test]
    fn test_parse_negative_sleep_rejected() {
        let err = parse_line("ENQUEUE,SLEEP,-0.5").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 2,
                expected: Expected::NonNegativeFloat,
            }
        );
    }

    #[test]
    fn test_parse_nan_sleep_rejected() {
        assert!(parse_line("EXECUTE,SLEEP,NaN").is_err());
    }

    #[test]
    fn test_parse_sync_no_payload() {
        assert_eq!(
            parse_line("ENQUEUE,SYNC").unwrap(),
            Instruction::Enqueue(CommandBuffer::from_slice(&[RobotCommand::Sync]))
        );
        // SYNC 不接受额外字段
        let err = parse_line("ENQUEUE,SYNC,1").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 2,
                expected: Expected::EndOfLine,
            }
        );
    }

    #[test]
    fn test_parse_dequeue() {
        assert_eq!(parse_line("DEQUEUE").unwrap(), Instruction::Dequeue);
        assert!(parse_line("DEQUEUE,NOW").is_err());
    }

    #[test]
    fn test_parse_gripper() {
        assert_eq!(
            parse_line("GRIPPER,ACTIVATE").unwrap(),
            Instruction::Gripper(GripperOp::Activate)
        );
        assert_eq!(
            parse_line("GRIPPER,GET").unwrap(),
            Instruction::Gripper(GripperOp::Get)
        );
        // 标签原样保留大小写
        assert_eq!(
            parse_line("GRIPPER, SET, Open").unwrap(),
            Instruction::Gripper(GripperOp::Set("Open".to_string()))
        );
    }

    #[test]
    fn test_parse_gripper_set_requires_label() {
        let err = parse_line("GRIPPER,SET").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 2,
                expected: Expected::Label,
            }
        );
    }

    #[test]
    fn test_parse_digital_beckhoff() {
        assert_eq!(
            parse_line("DIGITAL, BECKHOFF, 1, INPUT").unwrap(),
            Instruction::Digital(DigitalOp {
                source: IoSource::Beckhoff { index: 1 },
                kind: IoKind::Input,
            })
        );
        assert_eq!(
            parse_line("DIGITAL,BECKHOFF,255,OUTPUT,HIGH").unwrap(),
            Instruction::Digital(DigitalOp {
                source: IoSource::Beckhoff { index: 255 },
                kind: IoKind::Output(IoLevel::High),
            })
        );
    }

    #[test]
    fn test_parse_digital_wrist_has_no_index() {
        assert_eq!(
            parse_line("DIGITAL,WRIST,OUTPUT,LOW").unwrap(),
            Instruction::Digital(DigitalOp {
                source: IoSource::Wrist,
                kind: IoKind::Output(IoLevel::Low),
            })
        );
        // 腕部 I/O 不接受端口号
        assert!(parse_line("DIGITAL,WRIST,1,INPUT").is_err());
    }

    #[test]
    fn test_parse_digital_index_out_of_range() {
        let err = parse_line("DIGITAL,BECKHOFF,256,INPUT").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 2,
                expected: Expected::Unsigned8,
            }
        );
    }

    #[test]
    fn test_parse_current() {
        assert_eq!(
            parse_line("CURRENT,FRAME").unwrap(),
            Instruction::Current(CurrentOp::Frame)
        );
        assert_eq!(
            parse_line("CURRENT,JOINT").unwrap(),
            Instruction::Current(CurrentOp::Joint)
        );
    }

    #[test]
    fn test_parse_custom_verbatim() {
        let instr = parse_line("CUSTOM, probe, Depth, 12.5").unwrap();
        assert_eq!(
            instr,
            Instruction::Custom(vec![
                "probe".to_string(),
                "Depth".to_string(),
                "12.5".to_string()
            ])
        );
        // 只有关键字也合法
        assert_eq!(parse_line("CUSTOM").unwrap(), Instruction::Custom(vec![]));
    }

    #[test]
    fn test_parse_unknown_keyword() {
        let err = parse_line("FOO, 1, 2").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 0,
                expected: Expected::Keyword(INSTRUCTION_KEYWORDS),
            }
        );
    }

    #[test]
    fn test_parse_bad_float() {
        let err = parse_line("EXECUTE,MOTION,L,T,0,0,abc,0,0,0").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 6,
                expected: Expected::Float,
            }
        );
    }

    #[test]
    fn test_parse_bad_motion_kind() {
        let err = parse_line("EXECUTE,MOTION,X,T,0,0,0,0,0,0").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 2,
                expected: Expected::Keyword(MOTION_KINDS),
            }
        );
    }

    #[test]
    fn test_parse_missing_pose_discriminator() {
        // 判别符位置直接给浮点数
        let err = parse_line("EXECUTE,MOTION,L,0,0,0,0,0,0").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedInstruction {
                index: 3,
                expected: Expected::Keyword(POSE_KINDS),
            }
        );
    }
}
