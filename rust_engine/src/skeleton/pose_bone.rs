//! 姿态骨骼

use glam::{Quat, Vec3};

use super::EulerOrder;

/// 骨骼旋转模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoneRotationMode {
    #[default]
    Quaternion,
    Euler(EulerOrder),
    AxisAngle,
}

/// 姿态骨骼（本地空间的动画状态）
#[derive(Clone, Debug)]
pub struct PoseBone {
    pub name: String,
    pub rotation_mode: BoneRotationMode,
    pub rotation_quaternion: Quat,
    pub rotation_euler: Vec3,
    /// 轴角 (轴, 角度)
    pub rotation_axis_angle: (Vec3, f32),
}

impl PoseBone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rotation_mode: BoneRotationMode::Quaternion,
            rotation_quaternion: Quat::IDENTITY,
            rotation_euler: Vec3::ZERO,
            rotation_axis_angle: (Vec3::Y, 0.0),
        }
    }

    /// 设置四元数旋转并切换到四元数模式
    pub fn with_quaternion(mut self, rotation: Quat) -> Self {
        self.rotation_mode = BoneRotationMode::Quaternion;
        self.rotation_quaternion = rotation;
        self
    }

    /// 设置欧拉角旋转并切换到欧拉模式
    pub fn with_euler(mut self, order: EulerOrder, euler: Vec3) -> Self {
        self.rotation_mode = BoneRotationMode::Euler(order);
        self.rotation_euler = euler;
        self
    }

    /// 设置轴角旋转并切换到轴角模式
    pub fn with_axis_angle(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation_mode = BoneRotationMode::AxisAngle;
        self.rotation_axis_angle = (axis, angle);
        self
    }

    /// 本地空间旋转（按当前旋转模式换算为单位四元数）
    pub fn local_rotation(&self) -> Quat {
        match self.rotation_mode {
            BoneRotationMode::Quaternion => {
                let q = self.rotation_quaternion;
                if q.length_squared() > f32::EPSILON {
                    q.normalize()
                } else {
                    Quat::IDENTITY
                }
            }
            BoneRotationMode::Euler(order) => order.to_quat(self.rotation_euler),
            BoneRotationMode::AxisAngle => {
                let (axis, angle) = self.rotation_axis_angle;
                if axis.length_squared() > f32::EPSILON {
                    Quat::from_axis_angle(axis.normalize(), angle)
                } else {
                    Quat::IDENTITY
                }
            }
        }
    }
}

impl Default for PoseBone {
    fn default() -> Self {
        Self::new(String::new())
    }
}
