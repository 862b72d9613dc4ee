//! Rendering Adapter: renderer-agnostic service interface.
//!
//! # Invariants
//! - The renderer never reads or mutates ECS state; it only receives poses.
//! - Calls are synchronous and have no effect beyond drawing.
//!
//! # Workaround
//! `DebugTextRenderer` stands in for a GPU backend. The trait is stable; swap
//! in a real implementation without changing the systems that call it.

mod camera;
mod renderer;

pub use camera::{Camera, Surface, MAX_PIXEL_RATIO};
pub use renderer::{DebugTextRenderer, MeshDesc, RenderService};

pub fn crate_info() -> &'static str {
    "tickscene-render v0.1.0"
}
