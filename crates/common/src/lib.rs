//! Shared identifiers used across the tickscene crates.
//!
//! # Invariants
//! - Entity identifiers are random (UUID v4) and never reissued by the registry.
//! - Handles into external services are opaque; only their owner interprets them.

mod types;

pub use types::{BodyHandle, EntityId, MeshHandle};
