//! Developer Tooling: debug overlay, frame timing, world inspector.
//!
//! # Invariants
//! - Tools observe; the only thing they may change is the pause flag, and
//!   only through the scheduler's public switch.

pub mod inspector;
pub mod overlay;

pub use inspector::{ComponentInfo, EntityInfo, StoreSize, WorldInspector, WorldSummary};
pub use overlay::{DebugOverlay, FrameStats};

pub fn crate_info() -> &'static str {
    "tickscene-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
