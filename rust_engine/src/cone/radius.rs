//! 激活半径求解
//!
//! 贪心的逐驱动器最近邻启发式：只调整当前驱动器的半径，
//! 不会联动修改邻居的半径。

use glam::Quat;

use super::{angular_closeness, direction_of};

/// 半径求解模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RadiusMode {
    /// 最近邻：锥的边界可以触及邻居的中心点
    #[default]
    Touching,
    /// 最近邻（不相交）：扣除邻居自身半径，不侵入邻居的锥
    Disjoint,
}

impl RadiusMode {
    /// 宿主侧的枚举标识
    pub fn identifier(&self) -> &'static str {
        match self {
            RadiusMode::Touching => "CENT",
            RadiusMode::Disjoint => "EDGE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RadiusMode::Touching => "Nearest Neighbor",
            RadiusMode::Disjoint => "Nearest Neighbor (No Intersection)",
        }
    }
}

/// 共享同一骨骼目标的邻居驱动器
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    pub center: Quat,
    pub radius: f32,
}

impl Neighbor {
    pub fn new(center: Quat, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// 计算候选半径
///
/// 返回所有邻居候选值中的最小值；邻居为空时返回 `None`。
pub fn solve_radius<I>(center: Quat, neighbors: I, mode: RadiusMode) -> Option<f32>
where
    I: IntoIterator<Item = Neighbor>,
{
    let own = direction_of(center);

    neighbors
        .into_iter()
        .map(|neighbor| {
            let closeness = angular_closeness(own, direction_of(neighbor.center));
            let candidate = match mode {
                RadiusMode::Touching => closeness,
                RadiusMode::Disjoint => closeness - neighbor.radius,
            };
            candidate.max(0.0)
        })
        .reduce(f32::min)
}

/// 应用候选半径
///
/// 候选值不超过 `epsilon` 时保持原半径不变。
pub fn apply_radius(current: f32, candidate: Option<f32>, epsilon: f32) -> f32 {
    match candidate {
        Some(radius) if radius > epsilon => radius,
        _ => current,
    }
}
