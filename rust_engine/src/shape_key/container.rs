//! 形态键容器

use std::collections::HashMap;
use std::fmt;

use crate::{ConeDriverError, Result};
use super::ShapeKey;

/// 形态键容器句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key#{}", self.0)
    }
}

/// 形态键容器
///
/// 第一个形态键为参考键（Basis）。
#[derive(Clone, Debug)]
pub struct ShapeKeyContainer {
    pub id: KeyId,
    /// 是否为相对形态键
    pub use_relative: bool,
    key_blocks: Vec<ShapeKey>,
    name_to_index: HashMap<String, usize>,
    active_index: Option<usize>,
}

impl ShapeKeyContainer {
    pub fn new(id: KeyId) -> Self {
        Self {
            id,
            use_relative: true,
            key_blocks: Vec::new(),
            name_to_index: HashMap::new(),
            active_index: None,
        }
    }
    
    /// 添加形态键，返回索引
    pub fn add_key(&mut self, key: ShapeKey) -> Result<usize> {
        if self.name_to_index.contains_key(&key.name) {
            return Err(ConeDriverError::DuplicateShapeKey(key.name));
        }
        let index = self.key_blocks.len();
        self.name_to_index.insert(key.name.clone(), index);
        self.key_blocks.push(key);
        Ok(index)
    }

    /// 删除形态键
    pub fn remove_key(&mut self, name: &str) -> Option<ShapeKey> {
        let index = self.name_to_index.remove(name)?;
        let key = self.key_blocks.remove(index);
        self.rebuild_index();
        self.active_index = match self.active_index {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Some(key)
    }

    /// 重命名形态键
    pub fn rename_key(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if old_name == new_name {
            return Ok(());
        }
        if self.name_to_index.contains_key(new_name) {
            return Err(ConeDriverError::DuplicateShapeKey(new_name.to_string()));
        }
        let index = self
            .name_to_index
            .remove(old_name)
            .ok_or_else(|| ConeDriverError::ShapeKeyNotFound(old_name.to_string()))?;
        self.key_blocks[index].name = new_name.to_string();
        self.name_to_index.insert(new_name.to_string(), index);
        Ok(())
    }
    
    /// 通过名称查找形态键
    pub fn find_key_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn key(&self, name: &str) -> Option<&ShapeKey> {
        self.find_key_by_name(name).and_then(|i| self.key_blocks.get(i))
    }

    pub fn key_mut(&mut self, name: &str) -> Option<&mut ShapeKey> {
        let index = self.find_key_by_name(name)?;
        self.key_blocks.get_mut(index)
    }
    
    /// 获取形态键数量
    pub fn key_count(&self) -> usize {
        self.key_blocks.len()
    }

    pub fn key_blocks(&self) -> &[ShapeKey] {
        &self.key_blocks
    }

    /// 参考键
    pub fn reference_key(&self) -> Option<&ShapeKey> {
        self.key_blocks.first()
    }

    pub fn is_reference(&self, name: &str) -> bool {
        self.find_key_by_name(name) == Some(0)
    }

    /// 设置活动形态键
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let index = self
            .find_key_by_name(name)
            .ok_or_else(|| ConeDriverError::ShapeKeyNotFound(name.to_string()))?;
        self.active_index = Some(index);
        Ok(())
    }

    /// 活动形态键
    pub fn active_key(&self) -> Option<&ShapeKey> {
        self.active_index.and_then(|i| self.key_blocks.get(i))
    }

    fn rebuild_index(&mut self) {
        self.name_to_index = self
            .key_blocks
            .iter()
            .enumerate()
            .map(|(i, key)| (key.name.clone(), i))
            .collect();
    }
}
