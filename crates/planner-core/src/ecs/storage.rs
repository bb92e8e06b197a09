use super::component::Component;
use super::entity::EntityId;

/// SparseSetベースのコンポーネントストレージ
/// - dense: コンポーネント本体（連続メモリ）
/// - owners: denseと同じ並びのEntityId
/// - sparse: EntityId.index -> denseのインデックス
pub struct ComponentStorage<T: Component> {
    dense: Vec<T>,
    owners: Vec<EntityId>,
    sparse: Vec<Option<usize>>,
}

impl<T: Component> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: Vec::new(),
        }
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)?;
        // 同じindexでも世代が違えば別Entity
        (self.owners[slot] == entity).then_some(slot)
    }

    /// コンポーネントを挿入（既存の場合は上書きして旧値を返す）
    pub fn insert(&mut self, entity: EntityId, component: T) -> Option<T> {
        if let Some(slot) = self.slot(entity) {
            return Some(std::mem::replace(&mut self.dense[slot], component));
        }

        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        // 古い世代が残っていれば先に捨てる
        if let Some(stale) = self.sparse[index] {
            let stale_owner = self.owners[stale];
            self.remove(stale_owner);
        }

        self.sparse[index] = Some(self.dense.len());
        self.dense.push(component);
        self.owners.push(entity);
        None
    }

    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.slot(entity).map(|slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.slot(entity).map(move |slot| &mut self.dense[slot])
    }

    /// コンポーネントを削除（swap_removeでO(1)）
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot(entity)?;
        self.sparse[entity.index() as usize] = None;

        let last = self.dense.len() - 1;
        if slot != last {
            let moved = self.owners[last];
            self.sparse[moved.index() as usize] = Some(slot);
        }
        self.owners.swap_remove(slot);
        Some(self.dense.swap_remove(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }

    /// このコンポーネントを持つEntity一覧
    pub fn entities(&self) -> &[EntityId] {
        &self.owners
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    pub fn clear(&mut self) {
        self.dense.clear();
        self.owners.clear();
        self.sparse.clear();
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
