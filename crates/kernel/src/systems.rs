//! The per-frame pipeline: input → movement → physics → render.

use crate::components::{INPUT, MESH, PHYSICS, PLAYER};
use crate::config::{CameraConfig, RecoveryConfig};
use crate::error::SystemError;
use crate::scheduler::{FrameState, Services, System};
use glam::Vec3;
use tickscene_common::{BodyHandle, MeshHandle};
use tickscene_ecs::World;
use tickscene_input::InputFlags;

/// Sum of unit contributions per active flag: forward is -z, backward +z,
/// left -x, right +x, jump adds `jump_impulse` on +y.
pub fn movement_impulse(flags: &InputFlags, jump_impulse: f32) -> Vec3 {
    let mut impulse = Vec3::ZERO;
    if flags.forward {
        impulse.z -= 1.0;
    }
    if flags.backward {
        impulse.z += 1.0;
    }
    if flags.left {
        impulse.x -= 1.0;
    }
    if flags.right {
        impulse.x += 1.0;
    }
    if flags.jump {
        impulse.y += jump_impulse;
    }
    impulse
}

/// Copies this frame's raw input into every `Input` component.
///
/// Consumes the pending one-shot jump, so a jump press lands on exactly one tick.
#[derive(Debug, Default)]
pub struct InputSystem;

impl System for InputSystem {
    fn name(&self) -> &str {
        "input"
    }

    fn run(
        &mut self,
        world: &mut World,
        services: &mut Services<'_>,
        _frame: &FrameState,
    ) -> Result<(), SystemError> {
        let flags = services.input.take_flags();
        for (_, input) in world.components_mut::<InputFlags>(INPUT)?.iter_mut() {
            *input = flags;
        }
        Ok(())
    }
}

/// Turns `Input` flags into impulses on the entity's physics body.
#[derive(Debug)]
pub struct MovementSystem {
    pub jump_impulse: f32,
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn run(
        &mut self,
        world: &mut World,
        services: &mut Services<'_>,
        _frame: &FrameState,
    ) -> Result<(), SystemError> {
        for entity in world.query(&[INPUT, PHYSICS])? {
            let (Some(flags), Some(body)) = (
                world.get::<InputFlags>(INPUT, entity)?,
                world.get::<BodyHandle>(PHYSICS, entity)?,
            ) else {
                continue;
            };
            let impulse = movement_impulse(flags, self.jump_impulse);
            // No input, no call into the physics service.
            if impulse != Vec3::ZERO {
                services.physics.apply_impulse(*body, impulse, true)?;
            }
        }
        Ok(())
    }
}

/// Advances the physics service by one fixed step.
#[derive(Debug, Default)]
pub struct PhysicsSystem;

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "physics"
    }

    fn run(
        &mut self,
        _world: &mut World,
        services: &mut Services<'_>,
        _frame: &FrameState,
    ) -> Result<(), SystemError> {
        services.physics.step();
        Ok(())
    }
}

/// Syncs meshes to physics bodies, follows the player, recovers fallen
/// bodies, then draws the frame.
#[derive(Debug)]
pub struct RenderSystem {
    pub camera: CameraConfig,
    pub recovery: RecoveryConfig,
}

impl System for RenderSystem {
    fn name(&self) -> &str {
        "render"
    }

    fn run(
        &mut self,
        world: &mut World,
        services: &mut Services<'_>,
        _frame: &FrameState,
    ) -> Result<(), SystemError> {
        for entity in world.query(&[MESH, PHYSICS])? {
            let (Some(mesh), Some(body)) = (
                world.get::<MeshHandle>(MESH, entity)?.copied(),
                world.get::<BodyHandle>(PHYSICS, entity)?.copied(),
            ) else {
                continue;
            };
            let position = services.physics.translation(body)?;
            services.renderer.set_object_pose(mesh, position);

            if world.has(PLAYER, entity) {
                services
                    .renderer
                    .set_camera_pose(self.camera.follow(position), position);
            }

            if position.y < self.recovery.floor_threshold {
                tracing::warn!(
                    entity = %entity.short(),
                    y = position.y,
                    respawn = ?self.recovery.respawn_point,
                    "body fell below floor, respawning"
                );
                services
                    .physics
                    .set_translation(body, self.recovery.respawn_point, true)?;
            }
        }
        services.renderer.render();
        Ok(())
    }
}
