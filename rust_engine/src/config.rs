//! 锥形驱动器配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。

use once_cell::sync::Lazy;
use std::sync::RwLock;

use crate::curve::{Easing, Interpolation};
use crate::ops::RenderEngine;
use crate::scene::ObjectKind;

/// 驱动器配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct DriverConfig {
    // ========== 半径 ==========
    /// 新建驱动器的默认半径，默认 0.2
    pub default_radius: f32,
    /// 半径求解结果的最小有效值，默认 0.001
    /// 低于此值的结果不会被应用
    pub radius_epsilon: f32,

    // ========== 目标值 ==========
    /// 形态键当前值高于此阈值时作为默认目标值，否则使用 1.0
    pub goal_value_threshold: f32,

    // ========== 衰减曲线 ==========
    /// 默认插值类型
    pub default_interpolation: Interpolation,
    /// 默认缓动类型
    pub default_easing: Easing,
    /// 烘焙曲线时是否外推，默认 false（超出定义域保持边界值）
    pub extrapolate: bool,

    // ========== 可用性 ==========
    /// 兼容的渲染引擎
    pub compat_engines: Vec<RenderEngine>,
    /// 兼容的物体类型（持有形态键的物体）
    pub compat_objects: Vec<ObjectKind>,

    // ========== 调试 ==========
    /// 是否输出调试日志，默认 false
    pub debug_log: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            // ====== 半径 ======
            // 半径位于 [0,1]，1.0 表示任何姿态都会激活
            default_radius: 0.2,
            // 防止重合姿态或浮点噪声把半径压成退化的锥
            radius_epsilon: 0.001,

            // ====== 目标值 ======
            goal_value_threshold: 0.01,

            // ====== 衰减曲线 ======
            default_interpolation: Interpolation::Quad,
            default_easing: Easing::EaseInOut,
            extrapolate: false,

            // ====== 可用性 ======
            compat_engines: vec![
                RenderEngine::BlenderRender,
                RenderEngine::Eevee,
                RenderEngine::Workbench,
            ],
            compat_objects: vec![
                ObjectKind::Mesh,
                ObjectKind::Lattice,
                ObjectKind::Curve,
                ObjectKind::Surface,
            ],

            // ====== 调试 ======
            debug_log: false,
        }
    }
}

/// 全局配置实例
static DRIVER_CONFIG: Lazy<RwLock<DriverConfig>> = Lazy::new(|| {
    RwLock::new(DriverConfig::default())
});

/// 获取当前配置（只读）
pub fn get_config() -> DriverConfig {
    DRIVER_CONFIG.read().unwrap().clone()
}

/// 手动设置配置（用于运行时调试）
pub fn set_config(config: DriverConfig) {
    *DRIVER_CONFIG.write().unwrap() = config;
}

/// 重置为默认配置
pub fn reset_config() {
    *DRIVER_CONFIG.write().unwrap() = DriverConfig::default();
}
