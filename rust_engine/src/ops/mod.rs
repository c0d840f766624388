//! 编辑操作
//!
//! 宿主界面触发的四个操作：添加、移除、重新取中心、重新计算半径。
//! 每个操作先经可用性检查（poll），不可用时拒绝执行且不修改任何状态。

mod add;
mod remove;
mod recenter;
mod radius;

pub use add::AddDriver;
pub use remove::RemoveDriver;
pub use recenter::Recenter;
pub use radius::RecalculateRadius;

use crate::config::get_config;
use crate::document::Document;
use crate::driver::ConeDriver;
use crate::scene::{ObjectId, ObjectKind, PoseSource};
use crate::shape_key::{ShapeKey, ShapeKeyContainer};
use crate::{ConeDriverError, Result};

/// 渲染引擎
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEngine {
    BlenderRender,
    Eevee,
    Workbench,
    Cycles,
    Other(String),
}

impl RenderEngine {
    /// 从宿主标识解析
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "BLENDER_RENDER" => RenderEngine::BlenderRender,
            "BLENDER_EEVEE" => RenderEngine::Eevee,
            "BLENDER_WORKBENCH" => RenderEngine::Workbench,
            "CYCLES" => RenderEngine::Cycles,
            other => RenderEngine::Other(other.to_string()),
        }
    }
}

/// 操作上下文：当前渲染引擎、活动物体及其形态键
pub struct OperatorContext<'a> {
    pub engine: RenderEngine,
    pub object_kind: Option<ObjectKind>,
    pub shape_keys: Option<&'a ShapeKeyContainer>,
    pub poses: &'a dyn PoseSource,
}

impl<'a> OperatorContext<'a> {
    /// 活动形态键（容器存在且有活动项时）
    pub fn active_shape(&self) -> Option<&'a ShapeKey> {
        self.shape_keys?.active_key()
    }

    /// 活动形态键对应的驱动器
    pub fn active_driver<'d>(&self, document: &'d Document) -> Option<&'d ConeDriver> {
        let container = self.shape_keys?;
        let shape = container.active_key()?;
        document.driver_set(container.id)?.get(&shape.name)
    }

    /// 所有操作共用的可用性条件
    ///
    /// 渲染引擎与活动物体类型需在兼容列表中；形态键容器为相对模式，
    /// 且活动形态键不是基准形态键。
    pub fn is_compatible(&self) -> bool {
        let config = get_config();
        if !config.compat_engines.contains(&self.engine) {
            return false;
        }
        match self.object_kind {
            Some(kind) if config.compat_objects.contains(&kind) => {}
            _ => return false,
        }
        let Some(container) = self.shape_keys else {
            return false;
        };
        if !container.use_relative {
            return false;
        }
        match container.active_key() {
            Some(shape) => !container.is_reference(&shape.name),
            None => false,
        }
    }

    /// 活动容器与形态键，缺失时返回错误
    pub(crate) fn require_shape(&self) -> Result<(&'a ShapeKeyContainer, &'a ShapeKey)> {
        let container = self
            .shape_keys
            .ok_or_else(|| ConeDriverError::ShapeKeyNotFound("no shape key container".to_string()))?;
        let shape = container
            .active_key()
            .ok_or_else(|| ConeDriverError::ShapeKeyNotFound("no active shape key".to_string()))?;
        Ok((container, shape))
    }
}

/// 编辑操作
pub trait Operator {
    /// 宿主侧的操作标识
    fn id(&self) -> &'static str;

    /// 当前上下文中是否可用
    fn poll(&self, ctx: &OperatorContext<'_>, document: &Document) -> bool;

    /// 执行（不做可用性检查）
    fn execute(&self, ctx: &OperatorContext<'_>, document: &mut Document) -> Result<()>;

    /// 检查可用性后执行
    fn invoke(&self, ctx: &OperatorContext<'_>, document: &mut Document) -> Result<()> {
        if !self.poll(ctx, document) {
            log::debug!("操作不可用: {}", self.id());
            return Err(ConeDriverError::Unavailable(self.id()));
        }
        if get_config().debug_log {
            log::info!("[锥形驱动] 执行 {}", self.id());
        }
        self.execute(ctx, document)
    }
}

/// 驱动目标是骨架物体时返回物体句柄与骨骼名
fn armature_target<'d>(
    ctx: &OperatorContext<'_>,
    driver: &'d ConeDriver,
) -> Option<(ObjectId, &'d str)> {
    let object = driver.target().object?;
    if ctx.poses.object_kind(object) != Some(ObjectKind::Armature) {
        return None;
    }
    Some((object, driver.target().bone.as_str()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Quat;

    use crate::scene::{ObjectId, ObjectKind, Scene};
    use crate::shape_key::ShapeKey;
    use crate::skeleton::PoseBone;

    /// 一个网格（含 Basis 与 smile 两个形态键，smile 为活动项）和一个骨架
    pub fn scene() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let body = scene.add_object("Body", ObjectKind::Mesh);
        let rig = scene.add_object("Rig", ObjectKind::Armature);
        scene
            .armature_mut(rig)
            .unwrap()
            .add_bone(PoseBone::new("jaw").with_quaternion(Quat::from_rotation_x(0.3)));

        let keys = scene.ensure_shape_keys(body).unwrap();
        keys.add_key(ShapeKey::new("Basis")).unwrap();
        keys.add_key(ShapeKey::new("smile")).unwrap();
        keys.set_active("smile").unwrap();
        (scene, body, rig)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::scene;
    use super::*;
    use crate::scene::Scene;

    fn context(scene: &Scene, body: ObjectId) -> OperatorContext<'_> {
        OperatorContext {
            engine: RenderEngine::Eevee,
            object_kind: scene.object(body).map(|o| o.kind),
            shape_keys: scene.shape_keys(body),
            poses: scene,
        }
    }

    #[test]
    fn test_compatible_context() {
        let (scene, body, _) = scene();
        let ctx = context(&scene, body);
        assert!(ctx.is_compatible());
        assert_eq!(ctx.active_shape().unwrap().name, "smile");
    }

    #[test]
    fn test_incompatible_engine() {
        let (scene, body, _) = scene();
        let mut ctx = context(&scene, body);
        ctx.engine = RenderEngine::Cycles;
        assert!(!ctx.is_compatible());
        ctx.engine = RenderEngine::from_identifier("BLENDER_WORKBENCH");
        assert!(ctx.is_compatible());
    }

    #[test]
    fn test_reference_key_is_not_compatible() {
        let (mut scene, body, _) = scene();
        scene.shape_keys_mut(body).unwrap().set_active("Basis").unwrap();
        assert!(!context(&scene, body).is_compatible());
    }

    #[test]
    fn test_absolute_keys_are_not_compatible() {
        let (mut scene, body, _) = scene();
        scene.shape_keys_mut(body).unwrap().use_relative = false;
        assert!(!context(&scene, body).is_compatible());
    }

    #[test]
    fn test_armature_object_is_not_compatible() {
        let (scene, _, rig) = scene();
        let ctx = context(&scene, rig);
        assert_eq!(ctx.object_kind, Some(ObjectKind::Armature));
        assert!(!ctx.is_compatible());
    }
}
