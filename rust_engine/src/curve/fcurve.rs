//! 关键帧曲线
//!
//! 宿主驱动器使用的分段贝塞尔曲线，存储按 x 排序的关键帧。

use glam::Vec2;

use super::{BezierKeyframe, CubicSegment};

/// 定义域之外的外推方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Extrapolation {
    /// 保持边界值
    #[default]
    Constant,
    /// 沿端点手柄方向线性延伸
    Linear,
}

/// 分段贝塞尔关键帧曲线
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FCurve {
    keyframes: Vec<BezierKeyframe>,
    extrapolation: Extrapolation,
}

impl FCurve {
    pub fn new(mut keyframes: Vec<BezierKeyframe>, extrapolation: Extrapolation) -> Self {
        keyframes.sort_by(|a, b| a.co.x.total_cmp(&b.co.x));
        Self {
            keyframes,
            extrapolation,
        }
    }

    pub fn keyframes(&self) -> &[BezierKeyframe] {
        &self.keyframes
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// 定义域 (首帧 x, 末帧 x)
    pub fn domain(&self) -> Option<(f32, f32)> {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => Some((first.co.x, last.co.x)),
            _ => None,
        }
    }

    /// 在 x 处求值
    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if x <= first.co.x {
            return match self.extrapolation {
                Extrapolation::Constant => first.co.y,
                Extrapolation::Linear => {
                    first.co.y + (x - first.co.x) * self.edge_slope(first.handle_left, first.co, true)
                }
            };
        }
        if x >= last.co.x {
            return match self.extrapolation {
                Extrapolation::Constant => last.co.y,
                Extrapolation::Linear => {
                    last.co.y + (x - last.co.x) * self.edge_slope(last.co, last.handle_right, false)
                }
            };
        }

        // 查找 x 所在的段
        let next = self.keyframes.partition_point(|kf| kf.co.x <= x);
        let (a, b) = (&self.keyframes[next - 1], &self.keyframes[next]);
        CubicSegment::new(a.co, a.handle_right, b.handle_left, b.co).evaluate(x)
    }

    /// 端点手柄斜率，手柄退化时退回相邻关键帧连线
    fn edge_slope(&self, from: Vec2, to: Vec2, at_start: bool) -> f32 {
        let dx = to.x - from.x;
        if dx.abs() > f32::EPSILON {
            return (to.y - from.y) / dx;
        }

        let count = self.keyframes.len();
        if count < 2 {
            return 0.0;
        }
        let (a, b) = if at_start {
            (self.keyframes[0].co, self.keyframes[1].co)
        } else {
            (self.keyframes[count - 2].co, self.keyframes[count - 1].co)
        };
        let dx = b.x - a.x;
        if dx.abs() > f32::EPSILON {
            (b.y - a.y) / dx
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(extrapolation: Extrapolation) -> FCurve {
        FCurve::new(
            vec![
                BezierKeyframe::new(Vec2::new(0.5, 0.0), Vec2::new(0.4, -0.2), Vec2::new(0.6, 0.2)),
                BezierKeyframe::new(Vec2::new(1.0, 1.0), Vec2::new(0.9, 0.8), Vec2::new(1.1, 1.2)),
            ],
            extrapolation,
        )
    }

    #[test]
    fn test_constant_extrapolation_holds_boundary() {
        let curve = ramp(Extrapolation::Constant);
        assert_eq!(curve.evaluate(0.1), 0.0);
        assert_eq!(curve.evaluate(-3.0), 0.0);
        assert_eq!(curve.evaluate(1.5), 1.0);
    }

    #[test]
    fn test_linear_extrapolation_follows_handles() {
        let curve = ramp(Extrapolation::Linear);
        assert!((curve.evaluate(0.0) + 1.0).abs() < 1e-5);
        assert!((curve.evaluate(1.5) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_interior_is_interpolated() {
        let curve = ramp(Extrapolation::Constant);
        assert!((curve.evaluate(0.75) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_curve_is_zero() {
        let curve = FCurve::default();
        assert_eq!(curve.evaluate(0.5), 0.0);
        assert_eq!(curve.domain(), None);
    }

    #[test]
    fn test_keyframes_are_sorted() {
        let curve = FCurve::new(
            vec![
                BezierKeyframe::new(Vec2::new(1.0, 1.0), Vec2::ONE, Vec2::ONE),
                BezierKeyframe::new(Vec2::new(0.2, 0.0), Vec2::ZERO, Vec2::ZERO),
            ],
            Extrapolation::Constant,
        );
        assert_eq!(curve.domain(), Some((0.2, 1.0)));
    }
}
