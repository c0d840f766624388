//! 角度相似度 → 激活值

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

/// 两个方向之间的归一化角度接近度
///
/// `(asin(dot(a, b)) + π/2) / π`：方向重合为 1，完全相反为 0，正交为 0.5。
/// 点积先限制在 [-1, 1]，避免单位向量的浮点误差让 `asin` 返回 NaN。
pub fn angular_closeness(a: Vec3, b: Vec3) -> f32 {
    let dot = a.dot(b).clamp(-1.0, 1.0);
    (dot.asin() + FRAC_PI_2) / PI
}

/// 当前方向相对中心方向的原始激活值（衰减曲线的 x 输入）
pub fn activation(current: Vec3, center: Vec3) -> f32 {
    angular_closeness(current, center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_is_one() {
        let v = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(activation(v, v), 1.0);
    }

    #[test]
    fn test_opposed_is_zero() {
        let v = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(activation(-v, v), 0.0);
    }

    #[test]
    fn test_orthogonal_is_half() {
        assert_eq!(activation(Vec3::X, Vec3::Y), 0.5);
    }

    #[test]
    fn test_drift_above_one_is_clamped() {
        let v = Vec3::new(0.0, 1.000_001, 0.0);
        let value = activation(v, v);
        assert!(!value.is_nan());
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_monotonic_in_dot() {
        let center = Vec3::Y;
        let near = Vec3::new(0.1, 0.995, 0.0).normalize();
        let far = Vec3::new(0.7, 0.7, 0.0).normalize();
        assert!(activation(near, center) > activation(far, center));
    }
}
