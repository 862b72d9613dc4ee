//! Scene configuration with the defaults of the reference scene.
//!
//! Every section is `#[serde(default)]`, so a YAML file only needs the keys
//! it wants to change.

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tickscene_input::KeyBindings;
use tickscene_physics::PhysicsConfig;
use tickscene_render::Camera;

/// Static ground slab the player rolls on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub half_extents: Vec3,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(125.0, 0.1, 125.0),
            friction: 0.8,
            restitution: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Vec3,
    pub radius: f32,
    pub linear_damping: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 6.0, 0.0),
            radius: 0.5,
            linear_damping: 0.5,
            friction: 0.6,
            restitution: 0.2,
        }
    }
}

/// Impulse magnitudes. Each directional flag contributes one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub jump_impulse: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { jump_impulse: 7.0 }
    }
}

/// Bounded-world rule: bodies below `floor_threshold` go back to `respawn_point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub floor_threshold: f32,
    pub respawn_point: Vec3,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            floor_threshold: -10.0,
            respawn_point: Vec3::new(0.0, 10.0, 0.0),
        }
    }
}

/// Follow camera. `offset.x`/`offset.z` are relative to the player; the
/// camera height is `offset.y` in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub offset: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(6.0, 6.0, 6.0),
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera {
            eye: self.offset,
            target: Vec3::ZERO,
            fov_degrees: self.fov_degrees,
            near: self.near,
            far: self.far,
            ..Camera::default()
        }
    }

    /// Where the camera sits when following a body at `target`.
    pub fn follow(&self, target: Vec3) -> Vec3 {
        Vec3::new(target.x + self.offset.x, self.offset.y, target.z + self.offset.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on a frame delta, in seconds.
    pub max_delta: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_delta: 0.1 }
    }
}

/// Everything needed to build a `Scene`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub physics: PhysicsConfig,
    pub ground: GroundConfig,
    pub player: PlayerConfig,
    pub movement: MovementConfig,
    pub recovery: RecoveryConfig,
    pub camera: CameraConfig,
    pub frame: FrameConfig,
    pub bindings: KeyBindings,
}

impl SceneConfig {
    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded scene config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.physics.timestep > 0.0 && self.physics.timestep.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "physics.timestep must be positive and finite, got {}",
                self.physics.timestep
            )));
        }
        if !(self.player.radius > 0.0 && self.player.radius.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "player.radius must be positive and finite, got {}",
                self.player.radius
            )));
        }
        if !(self.frame.max_delta > 0.0 && self.frame.max_delta.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "frame.max_delta must be positive and finite, got {}",
                self.frame.max_delta
            )));
        }
        if !(self.recovery.respawn_point.y > self.recovery.floor_threshold) {
            return Err(ConfigError::Invalid(format!(
                "recovery.respawn_point.y ({}) must be above recovery.floor_threshold ({})",
                self.recovery.respawn_point.y, self.recovery.floor_threshold
            )));
        }
        Ok(())
    }
}
