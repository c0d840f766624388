//! Cone Driver Engine - 基于锥形的形态键驱动器
//!
//! 根据骨骼当前本地旋转与参考（中心）旋转的接近程度驱动形态键：
//! - 四元数到方向向量的映射
//! - 反正弦重映射得到 0..1 的激活值
//! - 依据共享骨骼的邻居自动求解激活半径
//! - 衰减曲线烘焙与驱动表达式生成
//! - 驱动器生命周期、集合管理与形态键改名跟踪

pub mod config;
pub mod cone;
pub mod curve;
pub mod document;
pub mod driver;
pub mod ops;
pub mod scene;
pub mod shape_key;
pub mod skeleton;

pub use cone::{activation, direction_of, solve_radius, Neighbor, RadiusMode};
pub use curve::{FalloffCurve, FCurve};
pub use document::{Document, ShapeKeyEvent, ShapeKeyListener};
pub use driver::{ConeDriver, DriverChannel, DriverId, DriverSet, DriverState};
pub use ops::{AddDriver, Operator, OperatorContext, RecalculateRadius, Recenter, RemoveDriver};
pub use scene::{ObjectId, PoseSource, Scene};
pub use shape_key::{KeyId, ShapeKey, ShapeKeyContainer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConeDriverError {
    #[error("Operator unavailable: {0}")]
    Unavailable(&'static str),

    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    #[error("Duplicate driver: {0}")]
    DuplicateDriver(String),

    #[error("Duplicate shape key: {0}")]
    DuplicateShapeKey(String),

    #[error("Shape key not found: {0}")]
    ShapeKeyNotFound(String),

    #[error("Missing target: {0}")]
    MissingTarget(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unknown shape key container: {0}")]
    UnknownContainer(KeyId),
}

pub type Result<T> = std::result::Result<T, ConeDriverError>;
