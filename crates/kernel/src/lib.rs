//! Scene Kernel: the per-frame pipeline that drives the ECS world.
//!
//! One frame callback = one call to `Scene::frame` = at most one tick of the
//! `Scheduler`. Systems run strictly in registration order; a paused
//! scheduler runs none of them.
//!
//! # Invariants
//! - All durable state lives in component stores; systems hold none per entity.
//! - External services (physics, rendering) are only reached through handles
//!   stored in components.
//! - A failing system aborts the rest of its tick; earlier writes stand.

pub mod clock;
pub mod components;
pub mod config;
mod error;
pub mod scene;
pub mod scheduler;
pub mod systems;

pub use clock::FrameClock;
pub use config::SceneConfig;
pub use error::{ConfigError, SceneError, SystemError, TickError};
pub use scene::Scene;
pub use scheduler::{FrameState, RunState, Scheduler, Services, System, TickOutcome};
