//! 重新计算半径

use crate::cone::RadiusMode;
use crate::document::Document;
use crate::Result;
use super::{armature_target, Operator, OperatorContext};

/// 根据共享同一骨骼的最近邻驱动器计算半径
#[derive(Clone, Copy, Debug, Default)]
pub struct RecalculateRadius {
    pub mode: RadiusMode,
}

impl RecalculateRadius {
    pub fn new(mode: RadiusMode) -> Self {
        Self { mode }
    }
}

impl Operator for RecalculateRadius {
    fn id(&self) -> &'static str {
        "cone_based_shape_key_driver.radius_calculate"
    }

    fn poll(&self, ctx: &OperatorContext<'_>, document: &Document) -> bool {
        if !ctx.is_compatible() {
            return false;
        }
        ctx.active_driver(document)
            .and_then(|driver| armature_target(ctx, driver))
            .is_some_and(|(_, bone)| !bone.is_empty())
    }

    fn execute(&self, ctx: &OperatorContext<'_>, document: &mut Document) -> Result<()> {
        let (container, shape) = ctx.require_shape()?;
        document
            .driver_set_mut(container.id)?
            .recalculate_radius(&shape.name, self.mode)?;
        Ok(())
    }
}
