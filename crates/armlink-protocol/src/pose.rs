//! 位姿数据类型
//!
//! 运动目标在线上以判别符区分两种形式：
//! - `T`: 笛卡尔位姿（x, y, z, rx, ry, rz）
//! - `J`: 关节角位姿（j1..j6）
//!
//! 判别符与插补方式（`MotionKind`）相互独立；某组合是否被硬件接受
//! 由外部运动控制器裁决，协议层只校验判别符与 6 个浮点数的元数。

use serde::{Deserialize, Serialize};

/// 笛卡尔位姿：位置 + 欧拉角
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl Transform {
    pub fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self { x, y, z, rx, ry, rz }
    }

    pub fn from_array(v: [f64; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    pub fn to_array(self) -> [f64; 6] {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
    }
}

/// 关节角位姿 [J1, J2, J3, J4, J5, J6]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles(pub [f64; 6]);

impl JointAngles {
    pub fn from_array(v: [f64; 6]) -> Self {
        Self(v)
    }

    pub fn to_array(self) -> [f64; 6] {
        self.0
    }
}

/// 运动目标位姿（带判别符的闭合类型）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pose {
    Transform(Transform),
    Joints(JointAngles),
}

impl Pose {
    /// 线格式判别符（`T` / `J`）
    pub fn discriminator(&self) -> &'static str {
        match self {
            Pose::Transform(_) => "T",
            Pose::Joints(_) => "J",
        }
    }

    /// 按线格式字段顺序展开为 6 个浮点数
    pub fn to_array(self) -> [f64; 6] {
        match self {
            Pose::Transform(t) => t.to_array(),
            Pose::Joints(j) => j.to_array(),
        }
    }
}

impl From<Transform> for Pose {
    fn from(t: Transform) -> Self {
        Pose::Transform(t)
    }
}

impl From<JointAngles> for Pose {
    fn from(j: JointAngles) -> Self {
        Pose::Joints(j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_array_roundtrip() {
        let t = Transform::new(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        assert_eq!(Transform::from_array(t.to_array()), t);
    }

    #[test]
    fn test_pose_discriminator() {
        assert_eq!(Pose::Transform(Transform::default()).discriminator(), "T");
        assert_eq!(Pose::Joints(JointAngles::default()).discriminator(), "J");
    }

    #[test]
    fn test_pose_to_array_order() {
        let p = Pose::Transform(Transform::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
        assert_eq!(p.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let p = Pose::Joints(JointAngles([6.0, 5.0, 4.0, 3.0, 2.0, 1.0]));
        assert_eq!(p.to_array(), [6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    }
}
