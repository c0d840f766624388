//! 锥形驱动器
//!
//! 驱动器记录、生成的驱动通道以及按形态键名称索引的驱动器集合。

mod channel;
mod record;
mod set;

pub use channel::{
    build_expression, data_path_for, shape_name_from_data_path, DriverChannel, DriverVariable,
    TransformType,
};
pub use record::{CenterRotationMode, ConeDriver};
pub use set::DriverSet;

use std::fmt;

use uuid::Uuid;

use crate::scene::ObjectId;
use crate::{ConeDriverError, Result};

/// 驱动器标识符
///
/// 文本形式为 `conedriver_<uuid>`，创建时分配，形态键改名后保持不变。
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverId(String);

impl DriverId {
    pub const PREFIX: &'static str = "conedriver_";

    /// 生成新的随机标识符
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4()))
    }

    /// 从文本解析
    pub fn parse(text: &str) -> Result<Self> {
        let uuid = text
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| ConeDriverError::InvalidIdentifier(text.to_string()))?;
        Uuid::parse_str(uuid).map_err(|_| ConeDriverError::InvalidIdentifier(text.to_string()))?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 驱动器生命周期状态
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// 未设置目标物体
    Unbound,
    /// 目标已设置，驱动通道已生成且同步
    Bound,
    /// 已移除（终态）
    Removed,
}

/// 驱动目标（骨架物体 + 骨骼名）
///
/// 骨骼名可以为空，此时读取物体自身的变换。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverTarget {
    pub object: Option<ObjectId>,
    pub bone: String,
}

impl DriverTarget {
    pub fn new(object: Option<ObjectId>, bone: impl Into<String>) -> Self {
        Self {
            object,
            bone: bone.into(),
        }
    }

    /// 是否与另一目标指向同一物体和骨骼
    pub fn same_as(&self, other: &DriverTarget) -> bool {
        self.object == other.object && self.bone == other.bone
    }
}
