use serde::Serialize;
use tickscene_common::EntityId;
use tickscene_ecs::World;

/// World inspector for developer tooling.
///
/// Read-only queries against the ECS world for debugging and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            entity_count: world.entity_count(),
            stores: world
                .store_sizes()
                .into_iter()
                .map(|(name, len)| StoreSize { name, len })
                .collect(),
            pending_events: world.events().len(),
        }
    }

    /// Components carried by a live entity.
    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        if !world.is_live(id) {
            return None;
        }
        let components = world
            .components_of(id)
            .into_iter()
            .map(|name| ComponentInfo {
                name,
                store: world
                    .store(name)
                    .map(|store| store.describe())
                    .unwrap_or_default(),
            })
            .collect();
        Some(EntityInfo { id, components })
    }

    /// List all live entity IDs in the world.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSize {
    pub name: &'static str,
    pub len: usize,
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSummary {
    pub entity_count: usize,
    pub stores: Vec<StoreSize>,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: entities={} pending_events={}",
            self.entity_count, self.pending_events
        )?;
        for store in &self.stores {
            write!(f, " {}={}", store.name, store.len)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentInfo {
    pub name: &'static str,
    /// Store description, e.g. the payload type.
    pub store: String,
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub components: Vec<ComponentInfo>,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.components.iter().map(|c| c.name).collect();
        write!(f, "Entity [{}] components=[{}]", self.id.short(), names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut world = World::new();
        world.register_component::<u32>("Score").unwrap();
        world.register_tag("Player").unwrap();
        world
    }

    #[test]
    fn summary_reports_counts() {
        let mut w = world();
        let a = w.spawn();
        w.spawn();
        w.insert("Score", a, 5u32).unwrap();
        w.add_tag("Player", a).unwrap();

        let s = WorldInspector::summary(&w);
        assert_eq!(s.entity_count, 2);
        assert_eq!(
            s.stores,
            vec![
                StoreSize { name: "Player", len: 1 },
                StoreSize { name: "Score", len: 1 },
            ]
        );
        assert_eq!(s.pending_events, w.events().len());
        assert!(s.to_string().contains("entities=2"));
        assert!(s.to_string().contains("Score=1"));
    }

    #[test]
    fn inspect_lists_components() {
        let mut w = world();
        let id = w.spawn();
        w.insert("Score", id, 1u32).unwrap();

        let info = WorldInspector::inspect_entity(&w, id).unwrap();
        assert_eq!(info.id, id);
        assert_eq!(info.components.len(), 1);
        assert_eq!(info.components[0].name, "Score");
        assert!(info.components[0].store.contains("u32"));
        assert!(info.to_string().contains("components=[Score]"));
    }

    #[test]
    fn inspect_dead_entity_is_none() {
        let mut w = world();
        let id = w.spawn();
        w.despawn(id);
        assert!(WorldInspector::inspect_entity(&w, id).is_none());
        assert!(WorldInspector::list_entities(&w).is_empty());
    }
}
