//! 移除驱动器

use crate::document::Document;
use crate::Result;
use super::{Operator, OperatorContext};

/// 移除活动形态键的锥形驱动器
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveDriver;

impl Operator for RemoveDriver {
    fn id(&self) -> &'static str {
        "cone_based_shape_key_driver.remove"
    }

    fn poll(&self, ctx: &OperatorContext<'_>, document: &Document) -> bool {
        ctx.is_compatible() && ctx.active_driver(document).is_some()
    }

    fn execute(&self, ctx: &OperatorContext<'_>, document: &mut Document) -> Result<()> {
        let (container, shape) = ctx.require_shape()?;
        document.driver_set_mut(container.id)?.remove(&shape.name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::scene;
    use super::super::{AddDriver, RenderEngine};
    use super::*;
    use crate::scene::ObjectKind;
    use crate::ConeDriverError;

    #[test]
    fn test_remove_after_add() {
        let (scene, body, _) = scene();
        let ctx = OperatorContext {
            engine: RenderEngine::BlenderRender,
            object_kind: Some(ObjectKind::Mesh),
            shape_keys: scene.shape_keys(body),
            poses: &scene,
        };
        let mut document = Document::load();

        assert!(!RemoveDriver.poll(&ctx, &document));
        AddDriver::new().invoke(&ctx, &mut document).unwrap();
        assert!(RemoveDriver.poll(&ctx, &document));

        RemoveDriver.invoke(&ctx, &mut document).unwrap();
        assert!(ctx.active_driver(&document).is_none());
        assert!(matches!(
            RemoveDriver.invoke(&ctx, &mut document),
            Err(ConeDriverError::Unavailable("cone_based_shape_key_driver.remove"))
        ));
    }
}
