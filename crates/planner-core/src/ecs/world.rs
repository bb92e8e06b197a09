use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::component::Component;
use super::entity::EntityId;
use super::storage::ComponentStorage;

/// Entity生存情報
struct EntityMeta {
    /// 現在の世代番号
    generation: u32,
    alive: bool,
}

/// 型消去されたストレージのトレイト
trait AnyStorage: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove_entity(&mut self, entity: EntityId);
    fn contains_entity(&self, entity: EntityId) -> bool;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn remove_entity(&mut self, entity: EntityId) {
        self.remove(entity);
    }
    fn contains_entity(&self, entity: EntityId) -> bool {
        self.contains(entity)
    }
}

/// シーン全体のコンテナ
/// 地面・配置アイテムなど全てのEntity/Componentを管理する
pub struct World {
    entities: Vec<EntityMeta>,
    /// 再利用可能なインデックス
    free_list: Vec<u32>,
    /// 型ごとのコンポーネントストレージ
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            free_list: Vec::new(),
            storages: HashMap::new(),
        }
    }

    /// 新規Entityを生成
    pub fn spawn(&mut self) -> EntityId {
        if let Some(index) = self.free_list.pop() {
            // 再利用: 世代番号をインクリメント（パックIDの12bitに収める）
            let meta = &mut self.entities[index as usize];
            meta.generation = meta.generation % 0xFFF + 1;
            meta.alive = true;
            EntityId::new(index, meta.generation)
        } else {
            let index = self.entities.len() as u32;
            self.entities.push(EntityMeta {
                generation: 1,
                alive: true,
            });
            EntityId::new(index, 1)
        }
    }

    /// Entityを削除
    /// 成功時true、既に削除済みまたは無効なEntityの場合false
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.entities[entity.index() as usize].alive = false;
        self.free_list.push(entity.index());

        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }

        true
    }

    /// 条件に合うEntityをまとめて削除し、削除数を返す
    pub fn despawn_where(&mut self, mut predicate: impl FnMut(&World, EntityId) -> bool) -> usize {
        let doomed: Vec<EntityId> = self
            .iter_entities()
            .filter(|&entity| predicate(self, entity))
            .collect();

        doomed.into_iter().filter(|&entity| self.despawn(entity)).count()
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities
            .get(entity.index() as usize)
            .is_some_and(|meta| meta.alive && meta.generation == entity.generation())
    }

    /// コンポーネントを追加（死んだEntityへの追加は無視）
    pub fn insert<T: Component>(&mut self, entity: EntityId, component: T) {
        if !self.is_alive(entity) {
            return;
        }

        self.storage_or_insert::<T>().insert(entity, component);
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }

        self.storage::<T>()?.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }

        self.storage_mut::<T>()?.get_mut(entity)
    }

    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }

        self.storage_mut::<T>()?.remove(entity)
    }

    /// 指定コンポーネントを持つか
    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.is_alive(entity)
            && self
                .storages
                .get(&TypeId::of::<T>())
                .is_some_and(|storage| storage.contains_entity(entity))
    }

    /// 全生存Entityをイテレート
    pub fn iter_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, meta)| meta.alive)
            .map(|(index, meta)| EntityId::new(index as u32, meta.generation))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.iter().filter(|meta| meta.alive).count()
    }

    /// 指定コンポーネントを持つEntityとコンポーネントをイテレート
    pub fn iter_with<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter())
    }

    /// 指定コンポーネントを持つ最初のEntity（地面のような単一Entity用）
    pub fn find_with<T: Component>(&self) -> Option<EntityId> {
        self.iter_with::<T>().map(|(entity, _)| entity).next()
    }

    fn storage_or_insert<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .expect("type mismatch in storage")
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
