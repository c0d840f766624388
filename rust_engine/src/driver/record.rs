//! 驱动器记录
//!
//! 只存储原始字段（目标、中心旋转、半径、目标值、衰减曲线），
//! 每次修改后显式调用 `regenerate` 重新生成驱动通道。

use glam::{Quat, Vec3};

use crate::config::get_config;
use crate::curve::FalloffCurve;
use crate::scene::ObjectId;
use crate::shape_key::{KeyId, ShapeKey};
use crate::skeleton::EulerOrder;
use super::{DriverChannel, DriverId, DriverState, DriverTarget};

/// 中心旋转的界面显示模式（不影响驱动结果）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CenterRotationMode {
    Euler,
    #[default]
    Quaternion,
    AxisAngle,
}

/// 锥形驱动器
#[derive(Clone, Debug)]
pub struct ConeDriver {
    identifier: DriverId,
    key: KeyId,
    name: String,
    target: DriverTarget,
    center: Quat,
    radius: f32,
    goal: f32,
    falloff: FalloffCurve,
    mute: bool,
    rotation_mode: CenterRotationMode,
    channel: Option<DriverChannel>,
    removed: bool,
}

impl ConeDriver {
    /// 为形态键创建驱动器并生成通道
    ///
    /// 目标值默认取形态键当前值（过小时取 1.0），衰减曲线取配置中的预设。
    pub fn new(identifier: DriverId, key: KeyId, shape: &ShapeKey) -> Self {
        let config = get_config();
        let goal = if shape.value > config.goal_value_threshold {
            shape.value
        } else {
            1.0
        };

        let mut driver = Self {
            identifier,
            key,
            name: shape.name.clone(),
            target: DriverTarget::default(),
            center: Quat::IDENTITY,
            radius: config.default_radius.clamp(0.0, 1.0),
            goal,
            falloff: FalloffCurve::preset(config.default_interpolation, config.default_easing),
            mute: false,
            rotation_mode: CenterRotationMode::default(),
            channel: None,
            removed: false,
        };
        driver.regenerate();
        driver
    }

    pub fn identifier(&self) -> &DriverId {
        &self.identifier
    }

    /// 所属形态键容器
    pub fn key(&self) -> KeyId {
        self.key
    }

    /// 被驱动的形态键名称
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &DriverTarget {
        &self.target
    }

    pub fn center(&self) -> Quat {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn goal(&self) -> f32 {
        self.goal
    }

    pub fn falloff(&self) -> &FalloffCurve {
        &self.falloff
    }

    pub fn is_muted(&self) -> bool {
        self.mute
    }

    pub fn rotation_mode(&self) -> CenterRotationMode {
        self.rotation_mode
    }

    /// 当前生成的驱动通道
    pub fn channel(&self) -> Option<&DriverChannel> {
        self.channel.as_ref()
    }

    pub fn state(&self) -> DriverState {
        if self.removed {
            DriverState::Removed
        } else if self.target.object.is_some() && self.channel.is_some() {
            DriverState::Bound
        } else {
            DriverState::Unbound
        }
    }

    // ========== 修改（每次修改后重新生成通道）==========

    pub fn set_target(&mut self, object: Option<ObjectId>, bone: impl Into<String>) {
        self.target = DriverTarget::new(object, bone);
        self.regenerate();
    }

    pub fn set_object(&mut self, object: Option<ObjectId>) {
        self.target.object = object;
        self.regenerate();
    }

    pub fn set_bone(&mut self, bone: impl Into<String>) {
        self.target.bone = bone.into();
        self.regenerate();
    }

    pub fn set_center(&mut self, center: Quat) {
        self.center = center;
        self.regenerate();
    }

    /// 半径限制在 [0, 1]
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.clamp(0.0, 1.0);
        self.regenerate();
    }

    pub fn set_goal(&mut self, goal: f32) {
        self.goal = goal;
        self.regenerate();
    }

    pub fn set_mute(&mut self, mute: bool) {
        self.mute = mute;
        self.regenerate();
    }

    pub fn set_falloff(&mut self, falloff: FalloffCurve) {
        self.falloff = falloff;
        self.regenerate();
    }

    /// 编辑衰减曲线，结束后重新生成通道
    pub fn edit_falloff<R>(&mut self, edit: impl FnOnce(&mut FalloffCurve) -> R) -> R {
        let result = edit(&mut self.falloff);
        self.regenerate();
        result
    }

    pub fn set_rotation_mode(&mut self, mode: CenterRotationMode) {
        self.rotation_mode = mode;
    }

    // ========== 中心旋转的其他表示 ==========

    /// 中心旋转的轴角表示
    ///
    /// 旋转轴退化（接近单位旋转）时取 +Y 轴，与宿主一致。
    pub fn center_axis_angle(&self) -> (Vec3, f32) {
        let (axis, angle) = self.center.to_axis_angle();
        if self.center.xyz().length() < 1e-6 {
            return (Vec3::Y, angle);
        }
        (axis, angle)
    }

    pub fn set_center_axis_angle(&mut self, axis: Vec3, angle: f32) {
        let axis = if axis.length_squared() > f32::EPSILON {
            axis.normalize()
        } else {
            Vec3::Y
        };
        self.set_center(Quat::from_axis_angle(axis, angle));
    }

    /// 只修改角度，保持旋转轴
    pub fn set_center_angle(&mut self, angle: f32) {
        let (axis, _) = self.center_axis_angle();
        self.set_center_axis_angle(axis, angle);
    }

    /// 只修改旋转轴，保持角度
    pub fn set_center_axis(&mut self, axis: Vec3) {
        let (_, angle) = self.center_axis_angle();
        self.set_center_axis_angle(axis, angle);
    }

    /// 中心旋转的欧拉角表示（XYZ 顺序）
    pub fn center_euler(&self) -> Vec3 {
        EulerOrder::XYZ.from_quat(self.center)
    }

    pub fn set_center_euler(&mut self, euler: Vec3) {
        self.set_center(EulerOrder::XYZ.to_quat(euler));
    }

    // ========== 生命周期 ==========

    /// 重新生成驱动通道
    pub fn regenerate(&mut self) {
        if self.removed {
            log::warn!("驱动器 {} 已移除，跳过重新生成", self.identifier);
            return;
        }
        let extrapolate = get_config().extrapolate;
        self.channel = Some(DriverChannel::build(self, extrapolate));
        log::debug!(
            "重新生成驱动通道: {} (radius={}, goal={}, bone={:?})",
            self.name,
            self.radius,
            self.goal,
            self.target.bone
        );
    }

    /// 形态键改名后同步名称（标识符不变）
    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.regenerate();
    }

    /// 拆除驱动通道并进入终态
    pub(crate) fn teardown(&mut self) -> Option<DriverChannel> {
        self.removed = true;
        self.channel.take()
    }

    /// 以当前旋转求值
    pub fn evaluate(&self, current: Quat) -> Option<f32> {
        self.channel.as_ref()?.evaluate(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_for(value: f32) -> ConeDriver {
        ConeDriver::new(
            DriverId::generate(),
            KeyId(1),
            &ShapeKey::new("elbow").with_value(value),
        )
    }

    #[test]
    fn test_defaults() {
        let driver = driver_for(0.0);
        assert_eq!(driver.goal(), 1.0);
        assert!((driver.radius() - 0.2).abs() < 1e-6);
        assert_eq!(driver.center(), Quat::IDENTITY);
        assert_eq!(driver.falloff(), &FalloffCurve::default());
        assert_eq!(driver.state(), DriverState::Unbound);
        assert!(driver.channel().is_some());
    }

    #[test]
    fn test_goal_defaults_to_current_value() {
        assert!((driver_for(0.6).goal() - 0.6).abs() < 1e-6);
        assert_eq!(driver_for(0.005).goal(), 1.0);
    }

    #[test]
    fn test_binding_target_enters_bound() {
        let mut driver = driver_for(0.0);
        driver.set_target(Some(ObjectId(7)), "forearm");
        assert_eq!(driver.state(), DriverState::Bound);
        assert_eq!(driver.channel().unwrap().bone_target(), Some("forearm"));
    }

    #[test]
    fn test_empty_bone_targets_object_transform() {
        let mut driver = driver_for(0.0);
        driver.set_target(Some(ObjectId(7)), "");
        let channel = driver.channel().unwrap();
        assert_eq!(channel.bone_target(), None);
        assert_eq!(channel.variables.len(), 5);
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let mut driver = driver_for(0.5);
        driver.set_target(Some(ObjectId(3)), "neck");
        driver.set_center(Quat::from_rotation_x(0.4));
        let first = driver.channel().cloned();
        driver.regenerate();
        assert_eq!(driver.channel().cloned(), first);
    }

    #[test]
    fn test_radius_is_clamped() {
        let mut driver = driver_for(0.0);
        driver.set_radius(1.7);
        assert_eq!(driver.radius(), 1.0);
        driver.set_radius(-0.2);
        assert_eq!(driver.radius(), 0.0);
    }

    #[test]
    fn test_center_axis_angle_setters() {
        let mut driver = driver_for(0.0);
        driver.set_center_axis_angle(Vec3::X, 0.8);
        driver.set_center_angle(0.3);
        let (axis, angle) = driver.center_axis_angle();
        assert!((axis - Vec3::X).length() < 1e-5);
        assert!((angle - 0.3).abs() < 1e-5);

        driver.set_center_axis(Vec3::Z);
        let (axis, angle) = driver.center_axis_angle();
        assert!((axis - Vec3::Z).length() < 1e-5);
        assert!((angle - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_identity_center_angle_turns_about_y() {
        let mut driver = driver_for(0.0);
        let (axis, angle) = driver.center_axis_angle();
        assert_eq!(axis, Vec3::Y);
        assert_eq!(angle, 0.0);

        driver.set_center_angle(std::f32::consts::FRAC_PI_2);
        let (axis, _) = driver.center_axis_angle();
        assert!((axis - Vec3::Y).length() < 1e-5);
        assert!((crate::cone::direction_of(driver.center()) - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_center_euler_round_trip() {
        let mut driver = driver_for(0.0);
        let euler = Vec3::new(0.1, 0.2, 0.3);
        driver.set_center_euler(euler);
        assert!((driver.center_euler() - euler).length() < 1e-5);
    }

    #[test]
    fn test_evaluate_inside_and_outside_cone() {
        let mut driver = driver_for(0.0);
        driver.set_target(Some(ObjectId(1)), "arm");
        driver.set_goal(2.0);

        // 完全对齐：激活值为 1，取曲线末端（目标值）
        assert!((driver.evaluate(Quat::IDENTITY).unwrap() - 2.0).abs() < 1e-5);
        // 正交：0.5 < 1 - 0.2，落在锥外
        let orthogonal = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        assert_eq!(driver.evaluate(orthogonal), Some(0.0));
    }

    #[test]
    fn test_muted_driver_does_not_evaluate() {
        let mut driver = driver_for(0.0);
        driver.set_mute(true);
        assert!(driver.channel().unwrap().mute);
        assert_eq!(driver.evaluate(Quat::IDENTITY), None);
    }

    #[test]
    fn test_teardown_is_terminal() {
        let mut driver = driver_for(0.0);
        assert!(driver.teardown().is_some());
        assert_eq!(driver.state(), DriverState::Removed);
        driver.set_radius(0.5);
        assert!(driver.channel().is_none());
    }
}
