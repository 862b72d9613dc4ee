use crate::service::{ColliderDesc, ColliderShape, PhysicsError, PhysicsService, RigidBodyDesc};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tickscene_common::BodyHandle;

/// Vertical speeds below this are zeroed on contact instead of bouncing.
const BOUNCE_THRESHOLD: f32 = 0.5;
/// Rolling resistance as a fraction of the combined friction.
const ROLLING_RESISTANCE: f32 = 0.02;
const SLEEP_SPEED: f32 = 0.05;
const SLEEP_STEPS: u32 = 60;

/// World-level physics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Seconds advanced per `step`.
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81 * 2.0, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    position: Vec3,
    velocity: Vec3,
    inv_mass: f32,
    linear_damping: f32,
    /// Radius of the attached ball collider; `None` means the body has no
    /// collider and passes through everything.
    radius: Option<f32>,
    friction: f32,
    restitution: f32,
    sleeping: bool,
    rest_steps: u32,
}

#[derive(Debug, Clone)]
struct StaticBox {
    center: Vec3,
    half_extents: Vec3,
    friction: f32,
    restitution: f32,
}

impl StaticBox {
    fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    fn covers(&self, p: Vec3) -> bool {
        (p.x - self.center.x).abs() <= self.half_extents.x
            && (p.z - self.center.z).abs() <= self.half_extents.z
    }
}

/// Point-mass reference backend.
///
/// Dynamic spheres integrated with semi-implicit Euler against static
/// cuboids (contact on the top face only). Bodies fall asleep after resting
/// for `SLEEP_STEPS` steps and wake on impulses or teleports with `wake`.
#[derive(Debug, Clone, Default)]
pub struct PointMassWorld {
    config: PhysicsConfig,
    bodies: BTreeMap<BodyHandle, Body>,
    statics: Vec<StaticBox>,
    next_handle: u64,
    steps: u64,
}

impl PointMassWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Number of `step` calls so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn velocity(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        self.body(handle).map(|b| b.velocity)
    }

    pub fn is_sleeping(&self, handle: BodyHandle) -> Result<bool, PhysicsError> {
        self.body(handle).map(|b| b.sleeping)
    }

    fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.bodies
            .get(&handle)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        self.bodies
            .get_mut(&handle)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn integrate(body: &mut Body, config: &PhysicsConfig, statics: &[StaticBox]) {
        let dt = config.timestep;
        body.velocity += config.gravity * dt;
        body.velocity *= 1.0 / (1.0 + dt * body.linear_damping);
        body.position += body.velocity * dt;

        let Some(radius) = body.radius else {
            return;
        };

        let mut grounded = false;
        for ground in statics {
            if !ground.covers(body.position) {
                continue;
            }
            let bottom = body.position.y - radius;
            if bottom >= ground.top() || body.position.y < ground.bottom() {
                continue;
            }
            grounded = true;
            body.position.y = ground.top() + radius;

            if body.velocity.y < 0.0 {
                let restitution = (body.restitution + ground.restitution) * 0.5;
                let bounce = -body.velocity.y * restitution;
                body.velocity.y = if bounce < BOUNCE_THRESHOLD { 0.0 } else { bounce };
            }

            let friction = (body.friction + ground.friction) * 0.5;
            let decel = friction * ROLLING_RESISTANCE * config.gravity.length() * dt;
            let horizontal = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
            let speed = horizontal.length();
            if speed > 0.0 {
                let scaled = horizontal * ((speed - decel).max(0.0) / speed);
                body.velocity.x = scaled.x;
                body.velocity.z = scaled.z;
            }
        }

        if grounded && body.velocity.length() < SLEEP_SPEED {
            body.rest_steps += 1;
            if body.rest_steps >= SLEEP_STEPS {
                body.sleeping = true;
                body.velocity = Vec3::ZERO;
            }
        } else {
            body.rest_steps = 0;
        }
    }
}

fn wake_up(body: &mut Body) {
    body.sleeping = false;
    body.rest_steps = 0;
}

impl PhysicsService for PointMassWorld {
    fn step(&mut self) {
        self.steps += 1;
        for body in self.bodies.values_mut().filter(|b| !b.sleeping) {
            Self::integrate(body, &self.config, &self.statics);
        }
        tracing::trace!(step = self.steps, bodies = self.bodies.len(), "physics step");
    }

    fn apply_impulse(
        &mut self,
        handle: BodyHandle,
        impulse: Vec3,
        wake: bool,
    ) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        if wake {
            wake_up(body);
        }
        body.velocity += impulse * body.inv_mass;
        Ok(())
    }

    fn translation(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        self.body(handle).map(|b| b.position)
    }

    fn set_translation(
        &mut self,
        handle: BodyHandle,
        position: Vec3,
        wake: bool,
    ) -> Result<(), PhysicsError> {
        let body = self.body_mut(handle)?;
        if wake {
            wake_up(body);
        }
        body.position = position;
        Ok(())
    }

    fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        let inv_mass = if desc.mass > 0.0 { 1.0 / desc.mass } else { 0.0 };
        self.bodies.insert(
            handle,
            Body {
                position: desc.translation,
                velocity: Vec3::ZERO,
                inv_mass,
                linear_damping: desc.linear_damping,
                radius: None,
                friction: 0.5,
                restitution: 0.0,
                sleeping: false,
                rest_steps: 0,
            },
        );
        tracing::debug!(?handle, position = ?desc.translation, "created rigid body");
        handle
    }

    fn create_collider(
        &mut self,
        desc: ColliderDesc,
        parent: Option<BodyHandle>,
    ) -> Result<(), PhysicsError> {
        match (parent, desc.shape) {
            (Some(handle), ColliderShape::Ball { radius }) => {
                let body = self.body_mut(handle)?;
                body.radius = Some(radius);
                body.friction = desc.friction;
                body.restitution = desc.restitution;
            }
            (Some(handle), ColliderShape::Cuboid { half_extents }) => {
                // Dynamic cuboids are treated as their bounding sphere.
                let body = self.body_mut(handle)?;
                body.radius = Some(half_extents.length());
                body.friction = desc.friction;
                body.restitution = desc.restitution;
            }
            (None, ColliderShape::Cuboid { half_extents }) => {
                self.statics.push(StaticBox {
                    center: desc.translation,
                    half_extents,
                    friction: desc.friction,
                    restitution: desc.restitution,
                });
            }
            (None, ColliderShape::Ball { radius }) => {
                // Static balls are approximated by their bounding box.
                self.statics.push(StaticBox {
                    center: desc.translation,
                    half_extents: Vec3::splat(radius),
                    friction: desc.friction,
                    restitution: desc.restitution,
                });
            }
        }
        Ok(())
    }
}
