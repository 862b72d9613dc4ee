use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tickscene_common::EntityId;

/// Shape of a component store, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Maps each entity to a payload value.
    Payload,
    /// Records membership only.
    Tag,
}

/// Capabilities shared by every component store, whatever its shape.
///
/// The query engine only ever goes through this trait; payload access
/// requires downcasting to the concrete `ComponentStore<T>`, which `World`
/// does by name. Removal is not part of it: see `StoreSlot`.
pub trait Store: Any + fmt::Debug {
    fn kind(&self) -> StoreKind;

    /// Human-readable description used in `InvalidStoreKind` errors.
    fn describe(&self) -> String;

    fn contains(&self, entity: EntityId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current keys. Calling again re-reads the store.
    fn entities(&self) -> Box<dyn Iterator<Item = EntityId> + '_>;

    fn as_any(&self) -> &dyn Any;
}

/// Removal side of a store, only reachable inside the crate so that every
/// removal goes through `World` and is logged.
pub(crate) trait StoreSlot: Store {
    /// Drop any entry for `entity`. Returns whether one was present.
    fn purge(&mut self, entity: EntityId) -> bool;

    fn as_store(&self) -> &dyn Store;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Payload-bearing store: one `T` per entity.
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    entries: BTreeMap<EntityId, T>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> ComponentStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Liveness is checked by `World::insert`, which is
    /// the only public path here.
    pub(crate) fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        self.entries.insert(entity, value)
    }

    /// Payload for `entity`, if present.
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.entries.get(&entity)
    }

    /// Mutable payload for `entity`, if present.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.entries.get_mut(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.contains_key(&entity)
    }

    pub(crate) fn take(&mut self, entity: EntityId) -> Option<T> {
        self.entries.remove(&entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.keys().copied()
    }

    /// Entries in entity order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.entries.iter().map(|(id, v)| (*id, v))
    }

    /// Entries in entity order, payloads editable in place.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.entries.iter_mut().map(|(id, v)| (*id, v))
    }
}

impl<T: fmt::Debug + 'static> Store for ComponentStore<T> {
    fn kind(&self) -> StoreKind {
        StoreKind::Payload
    }

    fn describe(&self) -> String {
        payload_description::<T>()
    }

    fn contains(&self, entity: EntityId) -> bool {
        self.entries.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entities(&self) -> Box<dyn Iterator<Item = EntityId> + '_> {
        Box::new(self.entries.keys().copied())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: fmt::Debug + 'static> StoreSlot for ComponentStore<T> {
    fn purge(&mut self, entity: EntityId) -> bool {
        self.take(entity).is_some()
    }

    fn as_store(&self) -> &dyn Store {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Tag-only store: membership without payload.
#[derive(Debug, Clone, Default)]
pub struct TagStore {
    members: BTreeSet<EntityId>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, entity: EntityId) -> bool {
        self.members.insert(entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }
}

impl Store for TagStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Tag
    }

    fn describe(&self) -> String {
        "tag store".to_string()
    }

    fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    fn entities(&self) -> Box<dyn Iterator<Item = EntityId> + '_> {
        Box::new(self.members.iter().copied())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl StoreSlot for TagStore {
    fn purge(&mut self, entity: EntityId) -> bool {
        self.members.remove(&entity)
    }

    fn as_store(&self) -> &dyn Store {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn payload_description<T>() -> String {
    format!("payload store of {}", std::any::type_name::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_insert_overwrites() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        assert_eq!(store.insert(id, 1u32), None);
        assert_eq!(store.insert(id, 2u32), Some(1));
        assert_eq!(store.get(id), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn payload_remove_is_idempotent() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.insert(id, "mesh");
        assert!(store.purge(id));
        assert!(!store.purge(id));
        assert!(store.get(id).is_none());
    }

    #[test]
    fn tag_membership() {
        let mut tags = TagStore::new();
        let id = EntityId::new();
        assert!(tags.add(id));
        assert!(!tags.add(id));
        assert!(tags.contains(id));
        assert!(tags.purge(id));
        assert!(!tags.contains(id));
        assert!(tags.is_empty());
    }

    #[test]
    fn entities_rereads_current_state() {
        let mut store = ComponentStore::new();
        let a = EntityId::new();
        let b = EntityId::new();
        store.insert(a, 0u8);
        assert_eq!(store.entities().count(), 1);
        store.insert(b, 0u8);
        assert_eq!(store.entities().count(), 2);
        store.take(a);
        let keys: Vec<_> = store.entities().collect();
        assert_eq!(keys, vec![b]);
    }

    #[test]
    fn store_kinds_are_fixed() {
        let payload: Box<dyn Store> = Box::new(ComponentStore::<f32>::new());
        let tag: Box<dyn Store> = Box::new(TagStore::new());
        assert_eq!(payload.kind(), StoreKind::Payload);
        assert_eq!(tag.kind(), StoreKind::Tag);
        assert!(payload.describe().contains("f32"));
        assert_eq!(tag.describe(), "tag store");
    }
}
