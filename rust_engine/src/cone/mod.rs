//! 锥形激活数值核心
//!
//! - 四元数 → 方向向量
//! - 方向相似度 → 0~1 激活值（反正弦重映射）
//! - 根据同骨骼邻居姿态自动求解激活半径

mod direction;
mod activation;
mod radius;

pub use direction::direction_of;
pub use activation::{activation, angular_closeness};
pub use radius::{apply_radius, solve_radius, Neighbor, RadiusMode};
