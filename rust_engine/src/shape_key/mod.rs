//! 形态键（Shape Key）容器

mod shape_key;
mod container;

pub use shape_key::ShapeKey;
pub use container::{KeyId, ShapeKeyContainer};
