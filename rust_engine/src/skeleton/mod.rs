//! 骨架与姿态骨骼

mod pose_bone;
mod armature;

pub use pose_bone::{BoneRotationMode, PoseBone};
pub use armature::Armature;

use glam::{EulerRot, Quat, Vec3};

/// 欧拉角旋转顺序（宿主约定：按名称顺序依次绕固定轴旋转）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EulerOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl EulerOrder {
    /// 欧拉角 → 四元数
    ///
    /// 宿主的 "XYZ" 先绕 X 再绕 Y 最后绕 Z（外旋），
    /// 等价于 glam 内旋顺序的逆序。
    pub fn to_quat(&self, euler: Vec3) -> Quat {
        let Vec3 { x, y, z } = euler;
        match self {
            EulerOrder::XYZ => Quat::from_euler(EulerRot::ZYX, z, y, x),
            EulerOrder::XZY => Quat::from_euler(EulerRot::YZX, y, z, x),
            EulerOrder::YXZ => Quat::from_euler(EulerRot::ZXY, z, x, y),
            EulerOrder::YZX => Quat::from_euler(EulerRot::XZY, x, z, y),
            EulerOrder::ZXY => Quat::from_euler(EulerRot::YXZ, y, x, z),
            EulerOrder::ZYX => Quat::from_euler(EulerRot::XYZ, x, y, z),
        }
    }

    /// 四元数 → 欧拉角
    pub fn from_quat(&self, q: Quat) -> Vec3 {
        match self {
            EulerOrder::XYZ => {
                let (z, y, x) = q.to_euler(EulerRot::ZYX);
                Vec3::new(x, y, z)
            }
            EulerOrder::XZY => {
                let (y, z, x) = q.to_euler(EulerRot::YZX);
                Vec3::new(x, y, z)
            }
            EulerOrder::YXZ => {
                let (z, x, y) = q.to_euler(EulerRot::ZXY);
                Vec3::new(x, y, z)
            }
            EulerOrder::YZX => {
                let (x, z, y) = q.to_euler(EulerRot::XZY);
                Vec3::new(x, y, z)
            }
            EulerOrder::ZXY => {
                let (y, x, z) = q.to_euler(EulerRot::YXZ);
                Vec3::new(x, y, z)
            }
            EulerOrder::ZYX => {
                let (x, y, z) = q.to_euler(EulerRot::XYZ);
                Vec3::new(x, y, z)
            }
        }
    }
}
