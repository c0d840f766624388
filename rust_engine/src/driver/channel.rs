//! 驱动通道生成
//!
//! 把驱动器记录烘焙为宿主的驱动通道：变量列表、脚本表达式和关键帧曲线。
//! 同样的输入总是生成完全相同的通道。

use glam::{Quat, Vec3};

use crate::cone::{activation, direction_of};
use crate::curve::FCurve;
use crate::scene::ObjectId;
use crate::shape_key::KeyId;
use super::ConeDriver;

/// 形态键值的数据路径
pub fn data_path_for(shape_name: &str) -> String {
    format!("key_blocks[\"{}\"].value", shape_name)
}

/// 从数据路径中取回形态键名称
pub fn shape_name_from_data_path(data_path: &str) -> Option<&str> {
    data_path
        .strip_prefix("key_blocks[\"")?
        .strip_suffix("\"].value")
}

/// 由中心方向生成脚本表达式
///
/// 表达式把骨骼本地四元数 (w,x,y,z) 换算为方向，与中心方向点积后做反正弦重映射。
pub fn build_expression(center: Quat) -> String {
    let Vec3 { x, y, z } = direction_of(center);
    format!(
        "(asin(2.0*(x*y-w*z)*{:?}+(1.0-2.0*(x*x+z*z))*{:?}+2.0*(y*z+w*x)*{:?})--(pi/2.0))/pi",
        x, y, z
    )
}

/// 旋转分量
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformType {
    RotW,
    RotX,
    RotY,
    RotZ,
}

impl TransformType {
    pub const QUATERNION: [TransformType; 4] = [
        TransformType::RotW,
        TransformType::RotX,
        TransformType::RotY,
        TransformType::RotZ,
    ];

    /// 宿主侧的枚举标识
    pub fn identifier(&self) -> &'static str {
        match self {
            TransformType::RotW => "ROT_W",
            TransformType::RotX => "ROT_X",
            TransformType::RotY => "ROT_Y",
            TransformType::RotZ => "ROT_Z",
        }
    }

    /// 表达式中的变量名
    pub fn variable_name(&self) -> &'static str {
        match self {
            TransformType::RotW => "w",
            TransformType::RotX => "x",
            TransformType::RotY => "y",
            TransformType::RotZ => "z",
        }
    }
}

/// 驱动变量
#[derive(Clone, Debug, PartialEq)]
pub enum DriverVariable {
    /// 读取单个属性
    SingleProp {
        name: String,
        id_type: &'static str,
        id: KeyId,
        data_path: String,
    },
    /// 读取物体或骨骼的变换分量
    Transforms {
        name: String,
        object: Option<ObjectId>,
        /// 为 `None` 时读取物体自身的变换
        bone_target: Option<String>,
        transform_type: TransformType,
        transform_space: &'static str,
        rotation_mode: &'static str,
    },
}

impl DriverVariable {
    pub fn name(&self) -> &str {
        match self {
            DriverVariable::SingleProp { name, .. } => name,
            DriverVariable::Transforms { name, .. } => name,
        }
    }
}

/// 生成的驱动通道
#[derive(Clone, Debug, PartialEq)]
pub struct DriverChannel {
    pub data_path: String,
    pub variables: Vec<DriverVariable>,
    pub expression: String,
    pub fcurve: FCurve,
    pub mute: bool,
    center_direction: Vec3,
    /// 锥的下边界 `1 - radius`
    cone_start: f32,
}

impl DriverChannel {
    /// 由驱动器记录生成通道
    pub fn build(driver: &ConeDriver, extrapolate: bool) -> Self {
        let radius = driver.radius();
        let cone_start = 1.0 - radius;
        let fcurve = driver
            .falloff()
            .to_bezier((cone_start, 1.0), (0.0, driver.goal()), extrapolate);

        Self {
            data_path: data_path_for(driver.name()),
            variables: Self::build_variables(driver),
            expression: build_expression(driver.center()),
            fcurve,
            mute: driver.is_muted(),
            center_direction: direction_of(driver.center()),
            cone_start,
        }
    }

    fn build_variables(driver: &ConeDriver) -> Vec<DriverVariable> {
        let target = driver.target();
        let bone_target = if target.bone.is_empty() {
            None
        } else {
            Some(target.bone.clone())
        };

        let mut variables = Vec::with_capacity(5);
        // 第一个变量以标识符命名，用于改名后重新关联形态键
        variables.push(DriverVariable::SingleProp {
            name: driver.identifier().to_string(),
            id_type: "KEY",
            id: driver.key(),
            data_path: "reference_key.value".to_string(),
        });
        for transform_type in TransformType::QUATERNION {
            variables.push(DriverVariable::Transforms {
                name: transform_type.variable_name().to_string(),
                object: target.object,
                bone_target: bone_target.clone(),
                transform_type,
                transform_space: "LOCAL_SPACE",
                rotation_mode: "QUATERNION",
            });
        }
        variables
    }

    /// 标识符变量名
    pub fn identifier(&self) -> Option<&str> {
        self.variables.first().map(DriverVariable::name)
    }

    /// 通道读取的骨骼名
    pub fn bone_target(&self) -> Option<&str> {
        self.variables.iter().find_map(|v| match v {
            DriverVariable::Transforms { bone_target, .. } => bone_target.as_deref(),
            _ => None,
        })
    }

    /// 锥形原始激活值
    pub fn raw_activation(&self, current: Quat) -> f32 {
        activation(direction_of(current), self.center_direction)
    }

    /// 直接求值：当前旋转 → 形态键值
    ///
    /// 静音时返回 `None`；原始激活值落在锥外时为 0。
    pub fn evaluate(&self, current: Quat) -> Option<f32> {
        if self.mute {
            return None;
        }
        let raw = self.raw_activation(current);
        if raw < self.cone_start {
            return Some(0.0);
        }
        Some(self.fcurve.evaluate(raw))
    }
}
