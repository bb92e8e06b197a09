//! メッシュライブラリ
//!
//! インポート済みメッシュをMeshIdで保持する。GPUバッファ側はこのIDで引く。

use std::collections::HashMap;

use planner_core::MeshId;

use crate::mesh::Mesh;

#[derive(Debug, Default)]
pub struct MeshLibrary {
    meshes: HashMap<MeshId, Mesh>,
    next_id: u32,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// メッシュを登録してIDを返す（IDは再利用しない）
    pub fn insert(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.meshes.insert(id, mesh);
        id
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    pub fn remove(&mut self, id: MeshId) -> Option<Mesh> {
        self.meshes.remove(&id)
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(&id)
    }

    /// 指定ID以外を全て削除し、削除数を返す
    pub fn retain_only(&mut self, keep: &[MeshId]) -> usize {
        let before = self.meshes.len();
        self.meshes.retain(|id, _| keep.contains(id));
        before - self.meshes.len()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
