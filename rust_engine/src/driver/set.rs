//! 驱动器集合
//!
//! 一个形态键容器内的全部锥形驱动器，按形态键名称索引。
//! 每个形态键最多一个驱动器；标识符一经分配不再复用。

use std::collections::{HashMap, HashSet};

use glam::Quat;

use crate::cone::{apply_radius, solve_radius, Neighbor, RadiusMode};
use crate::config::get_config;
use crate::scene::{ObjectId, ObjectKind, PoseSource};
use crate::shape_key::{KeyId, ShapeKey, ShapeKeyContainer};
use crate::{ConeDriverError, Result};
use super::{shape_name_from_data_path, ConeDriver, DriverId};

/// 驱动器集合
#[derive(Debug, Clone)]
pub struct DriverSet {
    key: KeyId,
    drivers: Vec<ConeDriver>,
    name_to_index: HashMap<String, usize>,
    issued: HashSet<DriverId>,
}

impl DriverSet {
    pub fn new(key: KeyId) -> Self {
        Self {
            key,
            drivers: Vec::new(),
            name_to_index: HashMap::new(),
            issued: HashSet::new(),
        }
    }

    /// 所属形态键容器
    pub fn key(&self) -> KeyId {
        self.key
    }

    /// 为形态键添加驱动器
    pub fn add(&mut self, shape: &ShapeKey) -> Result<&mut ConeDriver> {
        if self.name_to_index.contains_key(&shape.name) {
            return Err(ConeDriverError::DuplicateDriver(shape.name.clone()));
        }

        let identifier = self.issue_identifier();
        let driver = ConeDriver::new(identifier, self.key, shape);
        log::info!("添加锥形驱动器: {} -> {}", shape.name, driver.identifier());

        let index = self.drivers.len();
        self.name_to_index.insert(shape.name.clone(), index);
        self.drivers.push(driver);
        Ok(&mut self.drivers[index])
    }

    /// 移除驱动器，拆除其驱动通道
    pub fn remove(&mut self, name: &str) -> Result<ConeDriver> {
        let index = self
            .name_to_index
            .remove(name)
            .ok_or_else(|| ConeDriverError::DriverNotFound(name.to_string()))?;

        let mut driver = self.drivers.remove(index);
        driver.teardown();
        self.rebuild_index();
        log::info!("移除锥形驱动器: {} ({})", name, driver.identifier());
        Ok(driver)
    }

    /// 宿主删除了形态键，同步删除其驱动器
    pub fn shape_key_removed(&mut self, name: &str) -> Option<ConeDriver> {
        if !self.contains(name) {
            return None;
        }
        self.remove(name).ok()
    }

    /// 形态键改名，返回是否有驱动器被更新
    pub fn rename_shape(&mut self, old_name: &str, new_name: &str) -> Result<bool> {
        if old_name == new_name {
            return Ok(false);
        }
        if self.name_to_index.contains_key(new_name) {
            return Err(ConeDriverError::DuplicateDriver(new_name.to_string()));
        }
        let Some(index) = self.name_to_index.remove(old_name) else {
            return Ok(false);
        };

        self.drivers[index].rename(new_name);
        self.name_to_index.insert(new_name.to_string(), index);
        log::debug!("驱动器跟随形态键改名: {} -> {}", old_name, new_name);
        Ok(true)
    }

    /// 按通道重新同步名称
    ///
    /// `channels` 为 (首个变量名, 数据路径)。首个变量名是驱动器标识符，
    /// 数据路径由宿主在形态键改名时自动更新。返回同步的驱动器数量。
    pub fn sync_names<'a, I>(&mut self, channels: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut synced = 0;
        for (variable, data_path) in channels {
            if !variable.starts_with(DriverId::PREFIX) {
                continue;
            }
            let Some(name) = shape_name_from_data_path(data_path) else {
                continue;
            };
            let Some(index) = self
                .drivers
                .iter()
                .position(|d| d.identifier().as_str() == variable)
            else {
                continue;
            };

            if self.drivers[index].name() == name {
                continue;
            }
            if self.name_to_index.contains_key(name) {
                log::warn!("名称同步冲突，已存在驱动器: {}", name);
                continue;
            }
            let old = self.drivers[index].name().to_string();
            self.name_to_index.remove(&old);
            self.name_to_index.insert(name.to_string(), index);
            self.drivers[index].rename(name);
            synced += 1;
        }
        synced
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ConeDriver> {
        self.name_to_index.get(name).and_then(|&i| self.drivers.get(i))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ConeDriver> {
        let index = *self.name_to_index.get(name)?;
        self.drivers.get_mut(index)
    }

    /// 按标识符查找
    pub fn find_by_identifier(&self, identifier: &DriverId) -> Option<&ConeDriver> {
        self.drivers.iter().find(|d| d.identifier() == identifier)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConeDriver> {
        self.drivers.iter()
    }

    /// 共享同一目标物体和骨骼的其他驱动器
    pub fn neighbors(&self, name: &str) -> Vec<Neighbor> {
        let Some(driver) = self.get(name) else {
            return Vec::new();
        };
        self.drivers
            .iter()
            .filter(|other| other.name() != name && other.target().same_as(driver.target()))
            .map(|other| Neighbor::new(other.center(), other.radius()))
            .collect()
    }

    /// 设置驱动目标
    ///
    /// 目标物体必须是骨架；校验失败时不做任何修改。
    pub fn set_target(
        &mut self,
        name: &str,
        object: Option<ObjectId>,
        bone: &str,
        poses: &dyn PoseSource,
    ) -> Result<()> {
        if !self.contains(name) {
            return Err(ConeDriverError::DriverNotFound(name.to_string()));
        }
        if let Some(object) = object {
            match poses.object_kind(object) {
                Some(ObjectKind::Armature) => {}
                Some(kind) => {
                    return Err(ConeDriverError::InvalidTarget(format!(
                        "{} is {}, expected ARMATURE",
                        object,
                        kind.identifier()
                    )))
                }
                None => {
                    return Err(ConeDriverError::InvalidTarget(format!("{} not found", object)))
                }
            }
        }

        if let Some(driver) = self.get_mut(name) {
            driver.set_target(object, bone);
        }
        Ok(())
    }

    /// 以目标骨骼的当前旋转作为新的中心
    pub fn recenter(&mut self, name: &str, poses: &dyn PoseSource) -> Result<Quat> {
        let driver = self
            .get(name)
            .ok_or_else(|| ConeDriverError::DriverNotFound(name.to_string()))?;
        let target = driver.target();
        let object = target
            .object
            .ok_or_else(|| ConeDriverError::MissingTarget(format!("{} has no target object", name)))?;
        if poses.object_kind(object) != Some(ObjectKind::Armature) {
            return Err(ConeDriverError::InvalidTarget(format!("{} is not an armature", object)));
        }
        let rotation = poses.bone_rotation(object, &target.bone).ok_or_else(|| {
            ConeDriverError::MissingTarget(format!("bone {:?} not found in pose", target.bone))
        })?;

        if let Some(driver) = self.get_mut(name) {
            driver.set_center(rotation);
        }
        log::debug!("更新驱动器中心: {} -> {:?}", name, rotation);
        Ok(rotation)
    }

    /// 根据最近邻重新计算半径
    ///
    /// 返回新半径；没有邻居或候选值过小时半径保持不变并返回 `None`。
    pub fn recalculate_radius(&mut self, name: &str, mode: RadiusMode) -> Result<Option<f32>> {
        let driver = self
            .get(name)
            .ok_or_else(|| ConeDriverError::DriverNotFound(name.to_string()))?;
        if driver.target().object.is_none() {
            return Err(ConeDriverError::MissingTarget(format!("{} has no target object", name)));
        }
        if driver.target().bone.is_empty() {
            return Err(ConeDriverError::MissingTarget(format!("{} has no target bone", name)));
        }

        let current = driver.radius();
        let epsilon = get_config().radius_epsilon;
        let candidate = solve_radius(driver.center(), self.neighbors(name), mode);
        let radius = apply_radius(current, candidate, epsilon);

        match candidate {
            Some(value) if value > epsilon => {
                if let Some(driver) = self.get_mut(name) {
                    driver.set_radius(radius);
                }
                log::debug!("半径已更新: {} {} -> {} ({})", name, current, radius, mode.identifier());
                Ok(Some(radius))
            }
            Some(value) => {
                log::debug!("候选半径过小，保持原值: {} ({})", name, value);
                Ok(None)
            }
            None => {
                log::debug!("没有共享骨骼的邻居，保持半径: {}", name);
                Ok(None)
            }
        }
    }

    /// 以实时姿态求值所有驱动器
    ///
    /// 未绑定、静音或目标无法解析的驱动器不会出现在结果中。
    pub fn evaluate(&self, poses: &dyn PoseSource) -> Vec<(String, f32)> {
        self.drivers
            .iter()
            .filter_map(|driver| {
                let target = driver.target();
                let rotation = poses.target_rotation(target.object?, &target.bone)?;
                let value = driver.evaluate(rotation)?;
                Some((driver.name().to_string(), value))
            })
            .collect()
    }

    /// 求值并写回形态键
    pub fn apply(&self, container: &mut ShapeKeyContainer, poses: &dyn PoseSource) -> usize {
        let mut applied = 0;
        for (name, value) in self.evaluate(poses) {
            if let Some(shape) = container.key_mut(&name) {
                shape.set_value(value);
                applied += 1;
            }
        }
        applied
    }

    fn issue_identifier(&mut self) -> DriverId {
        loop {
            let identifier = DriverId::generate();
            if self.issued.insert(identifier.clone()) {
                return identifier;
            }
        }
    }

    fn rebuild_index(&mut self) {
        self.name_to_index = self
            .drivers
            .iter()
            .enumerate()
            .map(|(i, driver)| (driver.name().to_string(), i))
            .collect();
    }
}
