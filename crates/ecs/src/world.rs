use crate::error::EcsError;
use crate::query;
use crate::registry::EntityRegistry;
use crate::store::{ComponentStore, Store, StoreSlot, TagStore, payload_description};
use std::collections::BTreeMap;
use std::fmt;
use tickscene_common::EntityId;

/// An event record produced by every structural mutation of the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    Spawned {
        id: EntityId,
    },
    /// Entity was destroyed. `components` lists the stores it was purged from.
    Despawned {
        id: EntityId,
        components: Vec<&'static str>,
    },
    ComponentInserted {
        id: EntityId,
        component: &'static str,
        replaced: bool,
    },
    ComponentRemoved {
        id: EntityId,
        component: &'static str,
    },
}

/// The ECS context: live entity set plus one named store per component kind.
///
/// Constructed once at startup and passed by reference to systems. Stores
/// are registered by name with a fixed shape; typed access checks the shape
/// and fails with `InvalidStoreKind` on a mismatch.
#[derive(Default)]
pub struct World {
    registry: EntityRegistry,
    stores: BTreeMap<&'static str, Box<dyn StoreSlot>>,
    event_log: Vec<WorldEvent>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.registry.len())
            .field("stores", &self.store_sizes())
            .field("pending_events", &self.event_log.len())
            .finish()
    }
}

impl World {
    /// Empty world with no registered stores.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registration ---

    /// Register a payload-bearing store for component `name`.
    pub fn register_component<T: fmt::Debug + 'static>(
        &mut self,
        name: &'static str,
    ) -> Result<(), EcsError> {
        self.register_store(name, Box::new(ComponentStore::<T>::new()))
    }

    /// Register a tag-only store for component `name`.
    pub fn register_tag(&mut self, name: &'static str) -> Result<(), EcsError> {
        self.register_store(name, Box::new(TagStore::new()))
    }

    fn register_store(
        &mut self,
        name: &'static str,
        store: Box<dyn StoreSlot>,
    ) -> Result<(), EcsError> {
        if self.stores.contains_key(name) {
            return Err(EcsError::DuplicateComponent(name.to_string()));
        }
        tracing::debug!(component = name, kind = ?store.kind(), "registered component store");
        self.stores.insert(name, store);
        Ok(())
    }

    /// Registered component names in canonical order.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stores.keys().copied()
    }

    // --- Entities ---

    /// Create a new live entity with no components.
    pub fn spawn(&mut self) -> EntityId {
        let id = self.registry.create();
        tracing::debug!(entity = %id.short(), "spawned entity");
        self.event_log.push(WorldEvent::Spawned { id });
        id
    }

    /// Destroy an entity and purge it from every store.
    ///
    /// Returns `false` (and does nothing) if the entity is not live.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.registry.destroy(id) {
            return false;
        }
        let components: Vec<&'static str> = self
            .stores
            .iter_mut()
            .filter_map(|(name, store)| store.purge(id).then_some(*name))
            .collect();
        tracing::debug!(entity = %id.short(), ?components, "despawned entity");
        self.event_log.push(WorldEvent::Despawned { id, components });
        true
    }

    /// Whether `id` is a live entity.
    pub fn is_live(&self, id: EntityId) -> bool {
        self.registry.is_live(id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Live entities in canonical order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.registry.iter()
    }

    // --- Components ---

    /// Attach (or overwrite) a payload component. Returns the previous value.
    pub fn insert<T: fmt::Debug + 'static>(
        &mut self,
        name: &'static str,
        id: EntityId,
        value: T,
    ) -> Result<Option<T>, EcsError> {
        if !self.registry.is_live(id) {
            return Err(EcsError::InvalidEntity(id));
        }
        let previous = self.components_mut::<T>(name)?.insert(id, value);
        self.event_log.push(WorldEvent::ComponentInserted {
            id,
            component: name,
            replaced: previous.is_some(),
        });
        Ok(previous)
    }

    /// Attach a tag component. Returns `false` if the tag was already present.
    pub fn add_tag(&mut self, name: &'static str, id: EntityId) -> Result<bool, EcsError> {
        if !self.registry.is_live(id) {
            return Err(EcsError::InvalidEntity(id));
        }
        let added = self.tags_mut(name)?.add(id);
        self.event_log.push(WorldEvent::ComponentInserted {
            id,
            component: name,
            replaced: !added,
        });
        Ok(added)
    }

    /// Detach component `name` from `id`. Never fails: unknown components
    /// and absent entries are both a no-op returning `false`.
    pub fn remove(&mut self, name: &str, id: EntityId) -> bool {
        let Some((key, store)) = self.stores.iter_mut().find(|(key, _)| **key == name) else {
            return false;
        };
        let removed = store.purge(id);
        if removed {
            self.event_log.push(WorldEvent::ComponentRemoved {
                id,
                component: *key,
            });
        }
        removed
    }

    /// Whether `id` carries component `name`. Unknown components report `false`.
    pub fn has(&self, name: &str, id: EntityId) -> bool {
        self.stores.get(name).is_some_and(|store| store.contains(id))
    }

    /// Payload of component `name` for `id`, if present.
    pub fn get<T: fmt::Debug + 'static>(
        &self,
        name: &str,
        id: EntityId,
    ) -> Result<Option<&T>, EcsError> {
        Ok(self.components::<T>(name)?.get(id))
    }

    /// Mutable payload of component `name` for `id`, if present.
    pub fn get_mut<T: fmt::Debug + 'static>(
        &mut self,
        name: &str,
        id: EntityId,
    ) -> Result<Option<&mut T>, EcsError> {
        Ok(self.components_mut::<T>(name)?.get_mut(id))
    }

    // --- Store access ---

    /// Shape-agnostic access to a store.
    pub fn store(&self, name: &str) -> Result<&dyn Store, EcsError> {
        self.stores
            .get(name)
            .map(|store| store.as_store())
            .ok_or_else(|| EcsError::UnknownComponent(name.to_string()))
    }

    /// Typed read access to the payload store registered as `name`.
    pub fn components<T: fmt::Debug + 'static>(
        &self,
        name: &str,
    ) -> Result<&ComponentStore<T>, EcsError> {
        let store = self.store(name)?;
        store
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or_else(|| kind_mismatch(name, payload_description::<T>(), store.describe()))
    }

    /// Mutable payload access. Entries can be edited in place but neither
    /// added nor removed here; use `insert` and `remove` so liveness is
    /// checked and the change is logged.
    pub fn components_mut<T: fmt::Debug + 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut ComponentStore<T>, EcsError> {
        let store = self
            .stores
            .get_mut(name)
            .ok_or_else(|| EcsError::UnknownComponent(name.to_string()))?;
        let found = store.describe();
        store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or_else(|| kind_mismatch(name, payload_description::<T>(), found))
    }

    /// Read access to the tag store registered as `name`.
    pub fn tags(&self, name: &str) -> Result<&TagStore, EcsError> {
        let store = self.store(name)?;
        store
            .as_any()
            .downcast_ref::<TagStore>()
            .ok_or_else(|| kind_mismatch(name, "tag store".to_string(), store.describe()))
    }

    fn tags_mut(&mut self, name: &str) -> Result<&mut TagStore, EcsError> {
        let store = self
            .stores
            .get_mut(name)
            .ok_or_else(|| EcsError::UnknownComponent(name.to_string()))?;
        let found = store.describe();
        store
            .as_any_mut()
            .downcast_mut::<TagStore>()
            .ok_or_else(|| kind_mismatch(name, "tag store".to_string(), found))
    }

    // --- Queries ---

    /// Entities carrying every component in `names`, as of now.
    pub fn query(&self, names: &[&str]) -> Result<Vec<EntityId>, EcsError> {
        let stores = names
            .iter()
            .map(|name| self.store(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(query::query(&stores))
    }

    /// Names of the components `id` currently carries.
    pub fn components_of(&self, id: EntityId) -> Vec<&'static str> {
        self.stores
            .iter()
            .filter(|(_, store)| store.contains(id))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Entry count of every store, by component name.
    pub fn store_sizes(&self) -> Vec<(&'static str, usize)> {
        self.stores
            .iter()
            .map(|(name, store)| (*name, store.len()))
            .collect()
    }

    // --- Events ---

    /// Drain and return all pending mutation events.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }
}

fn kind_mismatch(name: &str, expected: String, found: String) -> EcsError {
    EcsError::InvalidStoreKind {
        component: name.to_string(),
        expected,
        found,
    }
}
