//! 贝塞尔曲线插值

use glam::Vec2;

/// 归一化三次贝塞尔曲线
///
/// 端点固定为 (0,0) 与 (1,1)，只存储两个控制点。
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BezierCurve {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BezierCurve {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }
    
    /// 线性插值
    pub fn linear() -> Self {
        Self::new(0.25, 0.25, 0.75, 0.75)
    }
}

/// 任意端点的三次贝塞尔段（关键帧之间的插值段）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicSegment {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// 求 x 处的 y 值，x 超出段范围时返回端点值
    pub fn evaluate(&self, x: f32) -> f32 {
        let dx = self.p3.x - self.p0.x;
        if x <= self.p0.x {
            return self.p0.y;
        }
        if x >= self.p3.x || dx <= f32::EPSILON {
            return self.p3.y;
        }

        // 控制点的 x 限制在段内，保证 x(s) 单调
        let x1 = ((self.p1.x - self.p0.x) / dx).clamp(0.0, 1.0);
        let x2 = ((self.p2.x - self.p0.x) / dx).clamp(0.0, 1.0);
        let s = solve_parameter(x1, x2, (x - self.p0.x) / dx);

        cubic(self.p0.y, self.p1.y, self.p2.y, self.p3.y, s)
    }
}

/// 求解 x(s) = t 的参数 s（端点 x 为 0 和 1）
fn solve_parameter(x1: f32, x2: f32, t: f32) -> f32 {
    // 使用牛顿法求解 x(s) = t 的 s 值
    let mut s = t;
    for _ in 0..15 {
        let x = cubic(0.0, x1, x2, 1.0, s);
        let dx = cubic_derivative(0.0, x1, x2, 1.0, s);
        
        if dx.abs() < 1e-6 {
            break;
        }
        
        let new_s = s - (x - t) / dx;
        if (new_s - s).abs() < 1e-6 {
            s = new_s;
            break;
        }
        s = new_s;
    }

    if (0.0..=1.0).contains(&s) && (cubic(0.0, x1, x2, 1.0, s) - t).abs() < 1e-4 {
        return s;
    }

    // 牛顿法不收敛时退回二分法
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..40 {
        let mid = 0.5 * (lo + hi);
        if cubic(0.0, x1, x2, 1.0, mid) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

fn cubic(a: f32, b: f32, c: f32, d: f32, s: f32) -> f32 {
    let t = 1.0 - s;
    t * t * t * a + 3.0 * t * t * s * b + 3.0 * t * s * s * c + s * s * s * d
}

fn cubic_derivative(a: f32, b: f32, c: f32, d: f32, s: f32) -> f32 {
    let t = 1.0 - s;
    3.0 * t * t * (b - a) + 6.0 * t * s * (c - b) + 3.0 * s * s * (d - c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_segment_is_identity() {
        let curve = BezierCurve::linear();
        let segment = CubicSegment::new(
            Vec2::ZERO,
            Vec2::new(curve.x1, curve.y1),
            Vec2::new(curve.x2, curve.y2),
            Vec2::ONE,
        );
        for i in 0..=10 {
            let x = i as f32 / 10.0;
            assert!((segment.evaluate(x) - x).abs() < 1e-4);
        }
    }

    #[test]
    fn test_segment_flat_span() {
        let segment = CubicSegment::new(
            Vec2::new(0.8, 0.0),
            Vec2::new(0.85, 0.0),
            Vec2::new(0.95, 0.0),
            Vec2::new(1.0, 0.0),
        );
        assert_eq!(segment.evaluate(0.9), 0.0);
    }

    #[test]
    fn test_segment_outside_range_holds_endpoints() {
        let segment = CubicSegment::new(
            Vec2::new(0.5, 0.0),
            Vec2::new(0.6, 0.0),
            Vec2::new(0.9, 2.0),
            Vec2::new(1.0, 2.0),
        );
        assert_eq!(segment.evaluate(0.1), 0.0);
        assert_eq!(segment.evaluate(1.5), 2.0);
    }

    #[test]
    fn test_segment_scaled_ease() {
        // (0.5,0) → (1,2) 的对称缓动，中点为 1.0
        let segment = CubicSegment::new(
            Vec2::new(0.5, 0.0),
            Vec2::new(0.725, 0.0),
            Vec2::new(0.775, 2.0),
            Vec2::new(1.0, 2.0),
        );
        assert!((segment.evaluate(0.75) - 1.0).abs() < 1e-3);
    }
}
