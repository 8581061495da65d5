//! 仿真设备后端
//!
//! 无硬件时让守护进程可运行、可测试：运动立即"到位"，夹爪用标签
//! 开度表，数字输出回环到输入。

use armlink_engine::{
    DeviceError, DigitalIoDriver, GripperDriver, MotionController, StateProvider,
};
use armlink_protocol::{
    IoLevel, IoSource, JointAngles, MotionKind, MotionParam, Pose, Transform,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// 仿真臂的共享位姿
#[derive(Debug, Default)]
struct SimPose {
    frame: Mutex<Transform>,
    joints: Mutex<JointAngles>,
}

/// 仿真运动控制器
///
/// 每条运动瞬间完成：绝对目标直接写入共享位姿，相对目标按分量
/// 叠加。沉降等待立即返回。
pub struct SimMotionController {
    pose: Arc<SimPose>,
}

/// 仿真状态源（与控制器共享同一份位姿）
pub struct SimStateProvider {
    pose: Arc<SimPose>,
}

/// 创建一对共享位姿的仿真控制器与状态源
pub fn sim_arm() -> (Arc<SimMotionController>, Arc<SimStateProvider>) {
    let pose = Arc::new(SimPose::default());
    (
        Arc::new(SimMotionController { pose: pose.clone() }),
        Arc::new(SimStateProvider { pose }),
    )
}

impl MotionController for SimMotionController {
    fn issue_motion(
        &self,
        kind: MotionKind,
        pose: Pose,
        params: &MotionParam,
    ) -> Result<(), DeviceError> {
        trace!("sim motion {kind:?} at speed {}", params.speed);
        let relative = matches!(kind, MotionKind::LinearRelative | MotionKind::JointRelative);
        match pose {
            Pose::Transform(target) => {
                let mut frame = self.pose.frame.lock();
                *frame = if relative {
                    let current = frame.to_array();
                    let offset = target.to_array();
                    Transform::from_array(std::array::from_fn(|i| current[i] + offset[i]))
                } else {
                    target
                };
            }
            Pose::Joints(target) => {
                let mut joints = self.pose.joints.lock();
                *joints = if relative {
                    let current = joints.to_array();
                    let offset = target.to_array();
                    JointAngles(std::array::from_fn(|i| current[i] + offset[i]))
                } else {
                    target
                };
            }
        }
        Ok(())
    }

    fn await_settle(&self) -> Result<(), DeviceError> {
        // 运动瞬间完成，永远是已沉降
        Ok(())
    }
}

impl StateProvider for SimStateProvider {
    fn current_frame(&self) -> Result<Transform, DeviceError> {
        Ok(*self.pose.frame.lock())
    }

    fn current_joints(&self) -> Result<JointAngles, DeviceError> {
        Ok(*self.pose.joints.lock())
    }
}

/// 仿真夹爪
///
/// 未激活时拒绝读写；`set` 按标签开度表移动。
pub struct SimGripper {
    activated: Mutex<bool>,
    width: Mutex<f64>,
    labels: HashMap<String, f64>,
}

impl Default for SimGripper {
    fn default() -> Self {
        Self::with_labels([("OPEN", 100.0), ("CLOSED", 0.0)])
    }
}

impl SimGripper {
    /// 自定义标签开度表（标签大小写不敏感）
    pub fn with_labels<'a>(labels: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            activated: Mutex::new(false),
            width: Mutex::new(0.0),
            labels: labels
                .into_iter()
                .map(|(label, width)| (label.to_ascii_uppercase(), width))
                .collect(),
        }
    }
}

impl GripperDriver for SimGripper {
    fn activate(&self) -> Result<(), DeviceError> {
        *self.activated.lock() = true;
        debug!("sim gripper activated");
        Ok(())
    }

    fn get_position(&self) -> Result<f64, DeviceError> {
        if !*self.activated.lock() {
            return Err(DeviceError::not_ready("gripper not activated"));
        }
        Ok(*self.width.lock())
    }

    fn set(&self, label: &str) -> Result<(), DeviceError> {
        if !*self.activated.lock() {
            return Err(DeviceError::not_ready("gripper not activated"));
        }
        let width = self
            .labels
            .get(&label.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| DeviceError::from(format!("unknown gripper label {label:?}")))?;
        *self.width.lock() = width;
        debug!("sim gripper moved to {label:?} (width {width})");
        Ok(())
    }
}

/// 仿真数字 I/O
///
/// 输出被锁存；读输入返回同一信号源上最近锁存的输出电平，
/// 未写过的信号源读出 `Low`。
#[derive(Debug, Default)]
pub struct SimDigitalIo {
    latched: Mutex<HashMap<IoSource, IoLevel>>,
}

impl DigitalIoDriver for SimDigitalIo {
    fn read_input(&self, source: IoSource) -> Result<IoLevel, DeviceError> {
        Ok(self
            .latched
            .lock()
            .get(&source)
            .copied()
            .unwrap_or(IoLevel::Low))
    }

    fn write_output(&self, source: IoSource, level: IoLevel) -> Result<(), DeviceError> {
        trace!("sim io {source:?} <- {level:?}");
        self.latched.lock().insert(source, level);
        Ok(())
    }
}
