//! 衰减曲线与关键帧曲线
//!
//! 衰减曲线在 [0,1]² 上编辑，烘焙时重映射到驱动器的定义域与值域，
//! 生成宿主使用的分段贝塞尔关键帧。

mod bezier;
mod keyframe;
mod falloff;
mod fcurve;

pub use bezier::{BezierCurve, CubicSegment};
pub use keyframe::{BezierKeyframe, HandleType};
pub use falloff::{CurvePoint, Easing, FalloffCurve, Interpolation};
pub use fcurve::{Extrapolation, FCurve};
