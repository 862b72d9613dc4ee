//! Physics Adapter: the contract the scene core uses to talk to a physics engine.
//!
//! # Invariants
//! - The core only holds `BodyHandle`s; body state lives behind the service.
//! - Calls are one-way and synchronous; nothing here blocks or retries.
//!
//! `PointMassWorld` is a deliberately small backend (spheres against static
//! boxes, no rotation, no body/body contacts) for headless runs and tests.
//! Swap in a full engine by implementing `PhysicsService`.

mod point_mass;
mod service;

pub use point_mass::{PhysicsConfig, PointMassWorld};
pub use service::{ColliderDesc, ColliderShape, PhysicsError, PhysicsService, RigidBodyDesc};
