//! 添加驱动器

use crate::document::Document;
use crate::scene::{ObjectId, ObjectKind};
use crate::{ConeDriverError, Result};
use super::{Operator, OperatorContext};

/// 为活动形态键添加锥形驱动器
///
/// 可选地同时绑定目标；目标可解析时以其当前旋转作为中心。
#[derive(Clone, Debug, Default)]
pub struct AddDriver {
    pub object: Option<ObjectId>,
    pub bone: String,
}

impl AddDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(object: ObjectId, bone: impl Into<String>) -> Self {
        Self {
            object: Some(object),
            bone: bone.into(),
        }
    }
}

impl Operator for AddDriver {
    fn id(&self) -> &'static str {
        "cone_based_shape_key_driver.add"
    }

    fn poll(&self, ctx: &OperatorContext<'_>, document: &Document) -> bool {
        ctx.is_compatible() && ctx.active_driver(document).is_none()
    }

    fn execute(&self, ctx: &OperatorContext<'_>, document: &mut Document) -> Result<()> {
        let (container, shape) = ctx.require_shape()?;

        // 先校验目标，失败时不创建驱动器
        if let Some(object) = self.object {
            match ctx.poses.object_kind(object) {
                Some(ObjectKind::Armature) => {}
                _ => {
                    return Err(ConeDriverError::InvalidTarget(format!(
                        "{} is not an armature",
                        object
                    )))
                }
            }
        }

        let set = document.ensure_driver_set(container.id);
        set.add(shape)?;
        if self.object.is_some() {
            set.set_target(&shape.name, self.object, &self.bone, ctx.poses)?;
        }

        let center = self
            .object
            .and_then(|object| ctx.poses.target_rotation(object, &self.bone));
        if let (Some(center), Some(driver)) = (center, set.get_mut(&shape.name)) {
            driver.set_center(center);
        }
        Ok(())
    }
}
