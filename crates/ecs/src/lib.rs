//! Minimal ECS kernel: entity registry, component stores, multi-store queries.
//!
//! Component stores are keyed by `EntityId` in BTreeMaps/BTreeSets, so
//! iteration order is deterministic for a given store state.
//!
//! # Invariants
//! - A store's keys are always a subset of the live entity set.
//! - Destroying an entity removes it from every registered store before
//!   `World::despawn` returns.
//! - Queries never mutate stores and always reflect current state.
//! - Every structural mutation (spawn, despawn, insert, remove) produces an event.

mod error;
mod query;
mod registry;
mod store;
mod world;

pub use error::EcsError;
pub use query::query;
pub use registry::EntityRegistry;
pub use store::{ComponentStore, Store, StoreKind, TagStore};
pub use world::{World, WorldEvent};
pub use tickscene_common::EntityId;
