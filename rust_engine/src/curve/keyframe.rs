//! 贝塞尔关键帧

use glam::Vec2;

/// 控制点手柄类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HandleType {
    /// 自动平滑
    #[default]
    Auto,
    /// 自动平滑，但端点与极值处保持水平
    AutoClamped,
    /// 指向相邻控制点
    Vector,
    /// 左右手柄共线，长度独立
    Aligned,
    /// 完全自由
    Free,
}

impl HandleType {
    /// 宿主侧的枚举标识
    pub fn identifier(&self) -> &'static str {
        match self {
            HandleType::Auto => "AUTO",
            HandleType::AutoClamped => "AUTO_CLAMPED",
            HandleType::Vector => "VECTOR",
            HandleType::Aligned => "ALIGNED",
            HandleType::Free => "FREE",
        }
    }
}

/// 关键帧（宿主关键帧曲线中的一个点）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierKeyframe {
    pub co: Vec2,
    pub handle_left: Vec2,
    pub handle_right: Vec2,
    pub handle_left_type: HandleType,
    pub handle_right_type: HandleType,
}

impl BezierKeyframe {
    pub fn new(co: Vec2, handle_left: Vec2, handle_right: Vec2) -> Self {
        Self {
            co,
            handle_left,
            handle_right,
            handle_left_type: HandleType::Free,
            handle_right_type: HandleType::Free,
        }
    }
}
