//! 已加载文档
//!
//! 持有每个形态键容器的驱动器集合，以及形态键事件的监听器注册表。
//! 监听器的生命周期限定在文档内：关闭或释放文档时全部注销。

use std::collections::{BTreeMap, HashMap};

use crate::driver::DriverSet;
use crate::shape_key::KeyId;
use crate::{ConeDriverError, Result};

/// 形态键事件（由宿主发布）
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeKeyEvent {
    /// 形态键改名
    Renamed {
        key: KeyId,
        old_name: String,
        new_name: String,
    },
    /// 形态键被删除
    Removed { key: KeyId, name: String },
    /// 宿主更新了驱动通道的数据路径
    ///
    /// `channels` 为宿主当前的 (首个变量名, 数据路径) 列表。
    ChannelsRemapped {
        key: KeyId,
        channels: Vec<(String, String)>,
    },
}

/// 形态键事件监听器
pub trait ShapeKeyListener {
    fn on_event(&mut self, event: &ShapeKeyEvent, sets: &mut HashMap<KeyId, DriverSet>);
}

/// 跟踪形态键改名与删除，保持驱动器集合的名称映射同步
#[derive(Debug, Default)]
pub struct ShapeKeyTracker;

impl ShapeKeyListener for ShapeKeyTracker {
    fn on_event(&mut self, event: &ShapeKeyEvent, sets: &mut HashMap<KeyId, DriverSet>) {
        match event {
            ShapeKeyEvent::Renamed { key, old_name, new_name } => {
                let Some(set) = sets.get_mut(key) else {
                    return;
                };
                if let Err(e) = set.rename_shape(old_name, new_name) {
                    log::warn!("形态键改名同步失败: {}", e);
                }
            }
            ShapeKeyEvent::ChannelsRemapped { key, channels } => {
                let Some(set) = sets.get_mut(key) else {
                    return;
                };
                let synced = set.sync_names(
                    channels
                        .iter()
                        .map(|(variable, data_path)| (variable.as_str(), data_path.as_str())),
                );
                if synced > 0 {
                    log::debug!("按驱动通道重新同步 {} 个驱动器", synced);
                }
            }
            ShapeKeyEvent::Removed { key, name } => {
                if let Some(set) = sets.get_mut(key) {
                    if set.shape_key_removed(name).is_some() {
                        log::debug!("形态键 {} 已删除，同步移除驱动器", name);
                    }
                }
            }
        }
    }
}

/// 监听器句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// 已加载文档
pub struct Document {
    sets: HashMap<KeyId, DriverSet>,
    listeners: BTreeMap<ListenerId, Box<dyn ShapeKeyListener>>,
    next_listener: u64,
}

impl Document {
    /// 创建空文档（不注册任何监听器）
    pub fn new() -> Self {
        Self {
            sets: HashMap::new(),
            listeners: BTreeMap::new(),
            next_listener: 0,
        }
    }

    /// 加载文档并注册形态键跟踪器
    pub fn load() -> Self {
        let mut document = Self::new();
        document.subscribe(Box::new(ShapeKeyTracker));
        document
    }

    /// 注册监听器
    pub fn subscribe(&mut self, listener: Box<dyn ShapeKeyListener>) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, listener);
        log::debug!("注册形态键监听器 {:?}", id);
        id
    }

    /// 注销监听器
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// 按注册顺序分发事件
    pub fn publish(&mut self, event: ShapeKeyEvent) {
        for listener in self.listeners.values_mut() {
            listener.on_event(&event, &mut self.sets);
        }
    }

    /// 关闭文档：注销全部监听器
    pub fn close(&mut self) {
        if !self.listeners.is_empty() {
            log::debug!("关闭文档，注销 {} 个监听器", self.listeners.len());
        }
        self.listeners.clear();
    }

    pub fn driver_set(&self, key: KeyId) -> Option<&DriverSet> {
        self.sets.get(&key)
    }

    pub fn driver_set_mut(&mut self, key: KeyId) -> Result<&mut DriverSet> {
        self.sets
            .get_mut(&key)
            .ok_or(ConeDriverError::UnknownContainer(key))
    }

    /// 获取或创建容器的驱动器集合
    pub fn ensure_driver_set(&mut self, key: KeyId) -> &mut DriverSet {
        self.sets.entry(key).or_insert_with(|| DriverSet::new(key))
    }

    /// 容器是否已有驱动器集合，且包含指定形态键的驱动器
    pub fn has_driver(&self, key: KeyId, name: &str) -> bool {
        self.sets.get(&key).is_some_and(|set| set.contains(name))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        self.close();
    }
}
