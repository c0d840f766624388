//! 骨架（姿态骨骼集合）

use std::collections::HashMap;

use glam::Quat;

use super::PoseBone;

/// 骨架
#[derive(Clone, Debug, Default)]
pub struct Armature {
    bones: Vec<PoseBone>,
    name_to_index: HashMap<String, usize>,
}

impl Armature {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            name_to_index: HashMap::new(),
        }
    }
    
    /// 添加骨骼，同名骨骼会被替换
    pub fn add_bone(&mut self, bone: PoseBone) -> usize {
        if let Some(&index) = self.name_to_index.get(&bone.name) {
            self.bones[index] = bone;
            return index;
        }
        let index = self.bones.len();
        self.name_to_index.insert(bone.name.clone(), index);
        self.bones.push(bone);
        index
    }
    
    /// 通过名称查找骨骼
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// 骨骼的本地空间旋转
    pub fn local_rotation(&self, name: &str) -> Option<Quat> {
        self.find_bone_by_name(name)
            .and_then(|index| self.bones.get(index))
            .map(PoseBone::local_rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_replaces_bone() {
        let mut armature = Armature::new();
        let first = armature.add_bone(PoseBone::new("neck"));
        let rotation = Quat::from_rotation_z(0.25);
        let second = armature.add_bone(PoseBone::new("neck").with_quaternion(rotation));

        assert_eq!(first, second);
        assert!(armature.local_rotation("neck").unwrap().abs_diff_eq(rotation, 1e-6));
        assert_eq!(armature.local_rotation("head"), None);
    }
}
