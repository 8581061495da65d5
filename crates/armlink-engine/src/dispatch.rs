//! 指令路由表
//!
//! 每条已解析的 `Instruction` 在这里被分类：立即执行、入队、清队、
//! 或查询。查询结果打包为 `Response`；火忘（fire-and-forget）路径
//! 成功时返回 `None`，失败时错误经同一返回值上报。

use crate::device::{DigitalIoDriver, GripperDriver, StateProvider};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::registry::CustomRegistry;
use armlink_protocol::{CurrentOp, GripperOp, Instruction, IoKind, Response};
use std::sync::Arc;
use tracing::debug;

/// 指令分派器
///
/// 持有引擎与所有协作者；每个机械臂会话一个实例。
pub struct Dispatcher {
    engine: Engine,
    gripper: Arc<dyn GripperDriver>,
    io: Arc<dyn DigitalIoDriver>,
    state_provider: Arc<dyn StateProvider>,
    registry: CustomRegistry,
}

impl Dispatcher {
    pub fn new(
        engine: Engine,
        gripper: Arc<dyn GripperDriver>,
        io: Arc<dyn DigitalIoDriver>,
        state_provider: Arc<dyn StateProvider>,
        registry: CustomRegistry,
    ) -> Self {
        Self {
            engine,
            gripper,
            io,
            state_provider,
            registry,
        }
    }

    /// 引擎访问（状态/指标查询用）
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// 路由一条指令
    ///
    /// `Ok(Some(_))` 需要编码为响应行，`Ok(None)` 无响应，
    /// `Err(_)` 编码为错误行。
    pub fn dispatch(&self, instruction: Instruction) -> Result<Option<Response>, EngineError> {
        match instruction {
            Instruction::Execute(commands) => {
                self.engine.execute(&commands)?;
                Ok(Some(Response::Ok))
            }
            Instruction::Enqueue(commands) => {
                self.engine.enqueue(&commands)?;
                Ok(None)
            }
            Instruction::Dequeue => {
                self.engine.clear();
                Ok(None)
            }
            Instruction::Gripper(GripperOp::Activate) => {
                self.gripper.activate()?;
                Ok(None)
            }
            Instruction::Gripper(GripperOp::Get) => {
                Ok(Some(Response::Float(self.gripper.get_position()?)))
            }
            Instruction::Gripper(GripperOp::Set(label)) => {
                debug!("gripper set to label {label:?}");
                self.gripper.set(&label)?;
                Ok(None)
            }
            Instruction::Digital(op) => match op.kind {
                IoKind::Input => Ok(Some(Response::Level(self.io.read_input(op.source)?))),
                IoKind::Output(level) => {
                    self.io.write_output(op.source, level)?;
                    Ok(None)
                }
            },
            Instruction::Current(CurrentOp::Frame) => Ok(Some(Response::Transform(
                self.state_provider.current_frame()?,
            ))),
            Instruction::Current(CurrentOp::Joint) => Ok(Some(Response::Joints(
                self.state_provider.current_joints()?,
            ))),
            Instruction::Custom(fields) => {
                Ok(self.registry.handle(&fields)?.map(Response::Text))
            }
        }
    }
}
