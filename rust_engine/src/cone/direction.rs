//! 方向映射

use glam::{Quat, Vec3};

/// 将四元数映射为方向向量
///
/// 结果为旋转矩阵的第二列（本地 Y 轴在旋转后的指向）。
/// 不做归一化，调用方需传入单位四元数。
/// 注意 `direction_of(q)` 与 `direction_of(-q)` 并不保证相等。
pub fn direction_of(q: Quat) -> Vec3 {
    let (w, x, y, z) = (q.w, q.x, q.y, q.z);
    Vec3::new(
        2.0 * (x * y - w * z),
        1.0 - 2.0 * (x * x + z * z),
        2.0 * (y * z + w * x),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity_points_up_y() {
        assert_eq!(direction_of(Quat::IDENTITY), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_quarter_turn_about_x() {
        let q = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        assert_vec3_eq(direction_of(q), Vec3::Z);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let q = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert_vec3_eq(direction_of(q), Vec3::NEG_X);
    }

    #[test]
    fn test_matches_rotation_matrix_y_column() {
        let q = Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 0.7);
        assert_vec3_eq(direction_of(q), Mat3::from_quat(q).y_axis);
    }

    #[test]
    fn test_hand_computed_values() {
        // w=0.5, x=0.5, y=0.5, z=0.5
        let q = Quat::from_xyzw(0.5, 0.5, 0.5, 0.5);
        assert_vec3_eq(direction_of(q), Vec3::new(0.0, 0.0, 1.0));
    }
}
