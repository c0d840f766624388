//! 宿主场景
//!
//! 物体、骨架与形态键容器的内存模型，为驱动器提供实时姿态查询。

use std::collections::HashMap;
use std::fmt;

use glam::Quat;

use crate::shape_key::{KeyId, ShapeKeyContainer};
use crate::skeleton::Armature;

/// 物体句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object#{}", self.0)
    }
}

/// 物体类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Mesh,
    Lattice,
    Curve,
    Surface,
    Armature,
    Empty,
}

impl ObjectKind {
    /// 宿主侧的枚举标识
    pub fn identifier(&self) -> &'static str {
        match self {
            ObjectKind::Mesh => "MESH",
            ObjectKind::Lattice => "LATTICE",
            ObjectKind::Curve => "CURVE",
            ObjectKind::Surface => "SURFACE",
            ObjectKind::Armature => "ARMATURE",
            ObjectKind::Empty => "EMPTY",
        }
    }
}

/// 场景物体
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    /// 物体自身的本地旋转
    pub rotation: Quat,
    /// 骨架数据（仅骨架物体）
    pub armature: Option<Armature>,
    /// 形态键容器（仅可变形物体）
    pub shape_keys: Option<ShapeKeyContainer>,
}

/// 实时姿态来源
///
/// 驱动器在求值时通过它读取目标物体或骨骼的本地旋转。
pub trait PoseSource {
    /// 物体类型，物体不存在时返回 `None`
    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind>;

    /// 物体自身的本地旋转
    fn object_rotation(&self, object: ObjectId) -> Option<Quat>;

    /// 骨骼的本地空间旋转
    fn bone_rotation(&self, object: ObjectId, bone: &str) -> Option<Quat>;

    /// 骨骼是否存在于物体的姿态中
    fn has_bone(&self, object: ObjectId, bone: &str) -> bool {
        self.bone_rotation(object, bone).is_some()
    }

    /// 目标旋转：骨骼名为空时读取物体自身的变换
    fn target_rotation(&self, object: ObjectId, bone: &str) -> Option<Quat> {
        if bone.is_empty() {
            self.object_rotation(object)
        } else {
            self.bone_rotation(object, bone)
        }
    }
}

/// 场景
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    id_to_index: HashMap<ObjectId, usize>,
    next_id: u64,
    next_key_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加物体并返回句柄
    pub fn add_object(&mut self, name: impl Into<String>, kind: ObjectKind) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        let armature = (kind == ObjectKind::Armature).then(Armature::new);

        self.id_to_index.insert(id, self.objects.len());
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            kind,
            rotation: Quat::IDENTITY,
            armature,
            shape_keys: None,
        });
        id
    }

    /// 为物体创建形态键容器（已存在时直接返回）
    pub fn ensure_shape_keys(&mut self, object: ObjectId) -> Option<&mut ShapeKeyContainer> {
        let index = *self.id_to_index.get(&object)?;
        if self.objects[index].shape_keys.is_none() {
            self.next_key_id += 1;
            let key_id = KeyId(self.next_key_id);
            self.objects[index].shape_keys = Some(ShapeKeyContainer::new(key_id));
        }
        self.objects[index].shape_keys.as_mut()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.id_to_index.get(&id).and_then(|&i| self.objects.get(i))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let index = *self.id_to_index.get(&id)?;
        self.objects.get_mut(index)
    }

    pub fn armature_mut(&mut self, id: ObjectId) -> Option<&mut Armature> {
        self.object_mut(id)?.armature.as_mut()
    }

    pub fn shape_keys(&self, id: ObjectId) -> Option<&ShapeKeyContainer> {
        self.object(id)?.shape_keys.as_ref()
    }

    pub fn shape_keys_mut(&mut self, id: ObjectId) -> Option<&mut ShapeKeyContainer> {
        self.object_mut(id)?.shape_keys.as_mut()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }
}

impl PoseSource for Scene {
    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind> {
        self.object(object).map(|o| o.kind)
    }

    fn object_rotation(&self, object: ObjectId) -> Option<Quat> {
        self.object(object).map(|o| o.rotation)
    }

    fn bone_rotation(&self, object: ObjectId, bone: &str) -> Option<Quat> {
        self.object(object)?.armature.as_ref()?.local_rotation(bone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::PoseBone;

    #[test]
    fn test_bone_rotation_lookup() {
        let mut scene = Scene::new();
        let rig = scene.add_object("Rig", ObjectKind::Armature);
        let rotation = Quat::from_rotation_y(0.3);
        scene
            .armature_mut(rig)
            .unwrap()
            .add_bone(PoseBone::new("forearm").with_quaternion(rotation));

        assert!(scene.bone_rotation(rig, "forearm").unwrap().abs_diff_eq(rotation, 1e-6));
        assert!(scene.bone_rotation(rig, "missing").is_none());
        assert!(scene.has_bone(rig, "forearm"));
    }

    #[test]
    fn test_empty_bone_reads_object_rotation() {
        let mut scene = Scene::new();
        let rig = scene.add_object("Rig", ObjectKind::Armature);
        scene.object_mut(rig).unwrap().rotation = Quat::from_rotation_z(0.5);
        let rotation = scene.target_rotation(rig, "").unwrap();
        assert!(rotation.abs_diff_eq(Quat::from_rotation_z(0.5), 1e-6));
    }

    #[test]
    fn test_mesh_has_no_armature() {
        let mut scene = Scene::new();
        let body = scene.add_object("Body", ObjectKind::Mesh);
        assert!(scene.armature_mut(body).is_none());
        assert!(scene.ensure_shape_keys(body).is_some());
        assert_eq!(scene.shape_keys(body).unwrap().id, KeyId(1));
    }
}
