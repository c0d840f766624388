//! 衰减曲线
//!
//! 用户可编辑的曲线，把归一化的角度接近度映射为输出强度。
//! 控制点位于 [0,1]²，按 x 排序。

use glam::Vec2;

use crate::{ConeDriverError, Result};
use super::{BezierCurve, BezierKeyframe, CubicSegment, Extrapolation, FCurve, HandleType};

/// 预设插值类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    Linear,
    Sine,
    #[default]
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
}

/// 预设缓动类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Interpolation {
    /// 预设对应的归一化贝塞尔控制点
    pub fn bezier(&self, easing: Easing) -> BezierCurve {
        use Easing::*;
        use Interpolation::*;

        let (x1, y1, x2, y2) = match (self, easing) {
            (Linear, _) => return BezierCurve::linear(),
            (Sine, EaseIn) => (0.12, 0.0, 0.39, 0.0),
            (Sine, EaseOut) => (0.61, 1.0, 0.88, 1.0),
            (Sine, EaseInOut) => (0.37, 0.0, 0.63, 1.0),
            (Quad, EaseIn) => (0.11, 0.0, 0.5, 0.0),
            (Quad, EaseOut) => (0.5, 1.0, 0.89, 1.0),
            (Quad, EaseInOut) => (0.45, 0.0, 0.55, 1.0),
            (Cubic, EaseIn) => (0.32, 0.0, 0.67, 0.0),
            (Cubic, EaseOut) => (0.33, 1.0, 0.68, 1.0),
            (Cubic, EaseInOut) => (0.65, 0.0, 0.35, 1.0),
            (Quart, EaseIn) => (0.5, 0.0, 0.75, 0.0),
            (Quart, EaseOut) => (0.25, 1.0, 0.5, 1.0),
            (Quart, EaseInOut) => (0.76, 0.0, 0.24, 1.0),
            (Quint, EaseIn) => (0.64, 0.0, 0.78, 0.0),
            (Quint, EaseOut) => (0.22, 1.0, 0.36, 1.0),
            (Quint, EaseInOut) => (0.83, 0.0, 0.17, 1.0),
            (Expo, EaseIn) => (0.7, 0.0, 0.84, 0.0),
            (Expo, EaseOut) => (0.16, 1.0, 0.3, 1.0),
            (Expo, EaseInOut) => (0.87, 0.0, 0.13, 1.0),
            (Circ, EaseIn) => (0.55, 0.0, 1.0, 0.45),
            (Circ, EaseOut) => (0.0, 0.55, 0.45, 1.0),
            (Circ, EaseInOut) => (0.85, 0.0, 0.15, 1.0),
        };
        BezierCurve::new(x1, y1, x2, y2)
    }
}

/// 衰减曲线控制点
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    pub location: Vec2,
    pub handle_left: Vec2,
    pub handle_right: Vec2,
    pub handle_type: HandleType,
}

impl CurvePoint {
    pub fn new(location: Vec2, handle_type: HandleType) -> Self {
        Self {
            location,
            handle_left: location,
            handle_right: location,
            handle_type,
        }
    }
}

/// 衰减曲线
#[derive(Clone, Debug, PartialEq)]
pub struct FalloffCurve {
    points: Vec<CurvePoint>,
}

impl FalloffCurve {
    /// 从预设创建（两个端点 + 自由手柄）
    pub fn preset(interpolation: Interpolation, easing: Easing) -> Self {
        let bezier = interpolation.bezier(easing);

        let mut start = CurvePoint::new(Vec2::ZERO, HandleType::Free);
        start.handle_right = Vec2::new(bezier.x1, bezier.y1);
        start.handle_left = -start.handle_right;

        let mut end = CurvePoint::new(Vec2::ONE, HandleType::Free);
        end.handle_left = Vec2::new(bezier.x2, bezier.y2);
        end.handle_right = Vec2::ONE * 2.0 - end.handle_left;

        Self { points: vec![start, end] }
    }

    /// 由控制点创建，至少需要两个点
    pub fn from_points(points: Vec<CurvePoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ConeDriverError::InvalidCurve(format!(
                "falloff curve needs at least 2 points, got {}",
                points.len()
            )));
        }
        let mut curve = Self { points };
        for point in &mut curve.points {
            point.location = point.location.clamp(Vec2::ZERO, Vec2::ONE);
        }
        curve.sort_points();
        curve.recalculate_handles();
        Ok(curve)
    }

    /// 重置为预设
    pub fn reset(&mut self, interpolation: Interpolation, easing: Easing) {
        *self = Self::preset(interpolation, easing);
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 插入控制点，返回插入后的索引
    pub fn insert_point(&mut self, location: Vec2, handle_type: HandleType) -> usize {
        let location = location.clamp(Vec2::ZERO, Vec2::ONE);
        let index = self.points.partition_point(|p| p.location.x <= location.x);
        self.points.insert(index, CurvePoint::new(location, handle_type));
        self.recalculate_handles();
        index
    }

    /// 移除控制点，曲线至少保留两个点
    pub fn remove_point(&mut self, index: usize) -> Result<CurvePoint> {
        if self.points.len() <= 2 {
            return Err(ConeDriverError::InvalidCurve(
                "falloff curve must keep at least 2 points".to_string(),
            ));
        }
        if index >= self.points.len() {
            return Err(ConeDriverError::InvalidCurve(format!(
                "point index {} out of range",
                index
            )));
        }
        let point = self.points.remove(index);
        self.recalculate_handles();
        Ok(point)
    }

    /// 移动控制点，返回排序后的新索引
    pub fn move_point(&mut self, index: usize, location: Vec2) -> Result<usize> {
        let point = self.points.get_mut(index).ok_or_else(|| {
            ConeDriverError::InvalidCurve(format!("point index {} out of range", index))
        })?;
        let target = location.clamp(Vec2::ZERO, Vec2::ONE);
        let offset = target - point.location;
        point.location = target;
        point.handle_left += offset;
        point.handle_right += offset;

        let moved = *point;
        self.sort_points();
        self.recalculate_handles();
        Ok(self
            .points
            .iter()
            .position(|p| p.location == moved.location)
            .unwrap_or(index))
    }

    /// 设置控制点手柄类型
    pub fn set_handle_type(&mut self, index: usize, handle_type: HandleType) -> Result<()> {
        let point = self.points.get_mut(index).ok_or_else(|| {
            ConeDriverError::InvalidCurve(format!("point index {} out of range", index))
        })?;
        point.handle_type = handle_type;
        self.recalculate_handles();
        Ok(())
    }

    /// 在 x 处求值，超出首尾点时保持端点值
    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if x <= first.location.x {
            return first.location.y;
        }
        if x >= last.location.x {
            return last.location.y;
        }

        let next = self.points.partition_point(|p| p.location.x <= x);
        let (a, b) = (&self.points[next - 1], &self.points[next]);
        CubicSegment::new(a.location, a.handle_right, b.handle_left, b.location).evaluate(x)
    }

    /// 烘焙为关键帧曲线
    ///
    /// 控制点与手柄仿射映射到 `x_range` × `y_range`。不外推时首尾外侧手柄压平，
    /// 曲线在定义域之外保持边界值。
    pub fn to_bezier(&self, x_range: (f32, f32), y_range: (f32, f32), extrapolate: bool) -> FCurve {
        let map = |v: Vec2| {
            Vec2::new(
                x_range.0 + v.x * (x_range.1 - x_range.0),
                y_range.0 + v.y * (y_range.1 - y_range.0),
            )
        };

        let mut keyframes: Vec<BezierKeyframe> = self
            .points
            .iter()
            .map(|p| {
                let mut keyframe =
                    BezierKeyframe::new(map(p.location), map(p.handle_left), map(p.handle_right));
                keyframe.handle_left_type = p.handle_type;
                keyframe.handle_right_type = p.handle_type;
                keyframe
            })
            .collect();

        let extrapolation = if extrapolate {
            Extrapolation::Linear
        } else {
            if let Some(first) = keyframes.first_mut() {
                first.handle_left.y = first.co.y;
            }
            if let Some(last) = keyframes.last_mut() {
                last.handle_right.y = last.co.y;
            }
            Extrapolation::Constant
        };

        FCurve::new(keyframes, extrapolation)
    }

    fn sort_points(&mut self) {
        self.points
            .sort_by(|a, b| a.location.x.total_cmp(&b.location.x));
    }

    /// 按手柄类型重新计算手柄
    fn recalculate_handles(&mut self) {
        let count = self.points.len();
        for i in 0..count {
            let prev = if i > 0 { Some(self.points[i - 1].location) } else { None };
            let next = self.points.get(i + 1).map(|p| p.location);
            let point = &mut self.points[i];
            let co = point.location;

            match point.handle_type {
                HandleType::Auto | HandleType::AutoClamped => {
                    let clamped = point.handle_type == HandleType::AutoClamped;
                    let slope = match (prev, next) {
                        (Some(p), Some(n)) => {
                            let is_extreme = (co.y >= p.y && co.y >= n.y) || (co.y <= p.y && co.y <= n.y);
                            if clamped && is_extreme {
                                0.0
                            } else {
                                slope_between(p, n)
                            }
                        }
                        _ if clamped => 0.0,
                        (Some(p), None) => slope_between(p, co),
                        (None, Some(n)) => slope_between(co, n),
                        (None, None) => 0.0,
                    };

                    let left_len = prev.map(|p| (co.x - p.x) / 3.0);
                    let right_len = next.map(|n| (n.x - co.x) / 3.0);
                    let left_len = left_len.or(right_len).unwrap_or(0.0);
                    let right_len = right_len.unwrap_or(left_len);

                    point.handle_left = co - Vec2::new(left_len, left_len * slope);
                    point.handle_right = co + Vec2::new(right_len, right_len * slope);
                }
                HandleType::Vector => {
                    let left = prev.map(|p| (p - co) / 3.0);
                    let right = next.map(|n| (n - co) / 3.0);
                    let left = left.or(right.map(|r| -r)).unwrap_or(Vec2::ZERO);
                    let right = right.unwrap_or(-left);

                    point.handle_left = co + left;
                    point.handle_right = co + right;
                }
                HandleType::Aligned => {
                    let right = point.handle_right - co;
                    let left_len = (point.handle_left - co).length();
                    if right.length_squared() > f32::EPSILON {
                        point.handle_left = co - right.normalize() * left_len;
                    }
                }
                HandleType::Free => {}
            }
        }
    }
}

impl Default for FalloffCurve {
    fn default() -> Self {
        Self::preset(Interpolation::default(), Easing::default())
    }
}

fn slope_between(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x;
    if dx.abs() <= f32::EPSILON {
        0.0
    } else {
        (b.y - a.y) / dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_INTERPOLATIONS: [Interpolation; 8] = [
        Interpolation::Linear,
        Interpolation::Sine,
        Interpolation::Quad,
        Interpolation::Cubic,
        Interpolation::Quart,
        Interpolation::Quint,
        Interpolation::Expo,
        Interpolation::Circ,
    ];

    #[test]
    fn test_presets_span_unit_range() {
        for interpolation in ALL_INTERPOLATIONS {
            for easing in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
                let curve = FalloffCurve::preset(interpolation, easing);
                assert_eq!(curve.evaluate(0.0), 0.0);
                assert_eq!(curve.evaluate(1.0), 1.0);
            }
        }
    }

    #[test]
    fn test_default_is_quad_ease_in_out() {
        let curve = FalloffCurve::default();
        assert_eq!(curve, FalloffCurve::preset(Interpolation::Quad, Easing::EaseInOut));
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-3);
        assert!(curve.evaluate(0.25) < 0.25);
        assert!(curve.evaluate(0.75) > 0.75);
    }

    #[test]
    fn test_ease_in_stays_below_diagonal() {
        let curve = FalloffCurve::preset(Interpolation::Cubic, Easing::EaseIn);
        assert!(curve.evaluate(0.5) < 0.5);
    }

    #[test]
    fn test_insert_keeps_points_sorted() {
        let mut curve = FalloffCurve::default();
        let index = curve.insert_point(Vec2::new(0.3, 0.8), HandleType::Auto);
        assert_eq!(index, 1);
        let xs: Vec<f32> = curve.points().iter().map(|p| p.location.x).collect();
        assert_eq!(xs, vec![0.0, 0.3, 1.0]);
        assert!((curve.evaluate(0.3) - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_remove_keeps_two_points() {
        let mut curve = FalloffCurve::default();
        assert!(curve.remove_point(0).is_err());

        curve.insert_point(Vec2::new(0.5, 0.2), HandleType::Vector);
        assert!(curve.remove_point(1).is_ok());
        assert_eq!(curve.len(), 2);
    }

    #[test]
    fn test_from_points_requires_two() {
        let single = vec![CurvePoint::new(Vec2::ZERO, HandleType::Auto)];
        assert!(FalloffCurve::from_points(single).is_err());
    }

    #[test]
    fn test_vector_handles_are_linear() {
        let curve = FalloffCurve::from_points(vec![
            CurvePoint::new(Vec2::new(0.0, 0.0), HandleType::Vector),
            CurvePoint::new(Vec2::new(1.0, 1.0), HandleType::Vector),
        ])
        .unwrap();
        assert!((curve.evaluate(0.4) - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_move_point_resorts() {
        let mut curve = FalloffCurve::default();
        curve.insert_point(Vec2::new(0.2, 0.1), HandleType::Auto);
        let index = curve.move_point(1, Vec2::new(0.9, 0.5)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(curve.points()[1].location, Vec2::new(0.9, 0.5));
    }

    #[test]
    fn test_to_bezier_maps_ranges() {
        let curve = FalloffCurve::default();
        let fcurve = curve.to_bezier((0.8, 1.0), (0.0, 2.0), false);
        let keyframes = fcurve.keyframes();
        assert_eq!(keyframes.len(), 2);
        assert!((keyframes[0].co - Vec2::new(0.8, 0.0)).length() < 1e-6);
        assert!((keyframes[1].co - Vec2::new(1.0, 2.0)).length() < 1e-6);
        assert_eq!(keyframes[0].handle_left.y, 0.0);
        assert_eq!(keyframes[1].handle_right.y, 2.0);
        assert!((fcurve.evaluate(0.9) - 1.0).abs() < 1e-3);
    }
}
