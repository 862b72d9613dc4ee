use std::collections::BTreeSet;
use tickscene_common::EntityId;

/// Owns the set of live entity identifiers.
///
/// Identifiers are random v4 UUIDs. `create` re-rolls on the (astronomically
/// unlikely) event of a collision with a live id, so no two live entities
/// ever share an identifier.
///
/// The live set is a `BTreeSet`, so `create` and `destroy` are O(log n)
/// rather than O(1); in exchange `iter` and every store built on it walk
/// entities in a stable order.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    live: BTreeSet<EntityId>,
}

impl EntityRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh identifier and mark it live.
    pub fn create(&mut self) -> EntityId {
        loop {
            let id = EntityId::new();
            if self.live.insert(id) {
                return id;
            }
        }
    }

    /// Remove an identifier from the live set. Returns `false` if it was not live.
    pub fn destroy(&mut self, entity: EntityId) -> bool {
        self.live.remove(&entity)
    }

    /// Whether `entity` was created and not yet destroyed.
    pub fn is_live(&self, entity: EntityId) -> bool {
        self.live.contains(&entity)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live identifiers in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter().copied()
    }
}
