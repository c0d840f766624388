//! 重新取中心

use crate::document::Document;
use crate::Result;
use super::{armature_target, Operator, OperatorContext};

/// 以目标骨骼当前的本地旋转作为驱动器中心
#[derive(Clone, Copy, Debug, Default)]
pub struct Recenter;

impl Operator for Recenter {
    fn id(&self) -> &'static str {
        "cone_based_shape_key_driver.recenter"
    }

    fn poll(&self, ctx: &OperatorContext<'_>, document: &Document) -> bool {
        if !ctx.is_compatible() {
            return false;
        }
        let Some(driver) = ctx.active_driver(document) else {
            return false;
        };
        match armature_target(ctx, driver) {
            Some((object, bone)) => ctx.poses.has_bone(object, bone),
            None => false,
        }
    }

    fn execute(&self, ctx: &OperatorContext<'_>, document: &mut Document) -> Result<()> {
        let (container, shape) = ctx.require_shape()?;
        document
            .driver_set_mut(container.id)?
            .recenter(&shape.name, ctx.poses)?;
        Ok(())
    }
}
