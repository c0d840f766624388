//! 形态键定义

/// 形态键
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeKey {
    pub name: String,
    pub value: f32,
    pub slider_min: f32,
    pub slider_max: f32,
}

impl ShapeKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            slider_min: 0.0,
            slider_max: 1.0,
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.set_value(value);
        self
    }
    
    /// 设置当前值（限制在滑块范围内）
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.slider_min, self.slider_max);
    }
}
