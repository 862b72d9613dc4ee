use glam::Vec3;
use tickscene_common::BodyHandle;

/// Errors from physics service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhysicsError {
    #[error("rigid body {0:?} does not exist")]
    UnknownBody(BodyHandle),
}

/// Description of a dynamic rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyDesc {
    pub translation: Vec3,
    pub linear_damping: f32,
    pub mass: f32,
}

impl RigidBodyDesc {
    pub fn dynamic() -> Self {
        Self {
            translation: Vec3::ZERO,
            linear_damping: 0.0,
            mass: 1.0,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }
}

/// Collision shape of a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Description of a collider, either free-standing (static) or attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    /// Offset from the parent body, or world position for static colliders.
    pub translation: Vec3,
    pub friction: f32,
    pub restitution: f32,
}

impl ColliderDesc {
    pub fn ball(radius: f32) -> Self {
        Self::new(ColliderShape::Ball { radius })
    }

    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::new(ColliderShape::Cuboid {
            half_extents: Vec3::new(hx, hy, hz),
        })
    }

    fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            translation: Vec3::ZERO,
            friction: 0.5,
            restitution: 0.0,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

/// Physics engine as seen from the scene core.
///
/// `step` advances by the engine's own fixed timestep. Body and collider
/// factories are used at scene setup; the rest are called from systems.
pub trait PhysicsService {
    fn step(&mut self);

    fn apply_impulse(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        wake: bool,
    ) -> Result<(), PhysicsError>;

    fn translation(&self, body: BodyHandle) -> Result<Vec3, PhysicsError>;

    fn set_translation(
        &mut self,
        body: BodyHandle,
        position: Vec3,
        wake: bool,
    ) -> Result<(), PhysicsError>;

    fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> BodyHandle;

    /// Create a collider. With `parent = None` it is static.
    fn create_collider(
        &mut self,
        desc: ColliderDesc,
        parent: Option<BodyHandle>,
    ) -> Result<(), PhysicsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_desc_builder() {
        let d = RigidBodyDesc::dynamic()
            .with_translation(Vec3::new(0.0, 6.0, 0.0))
            .with_linear_damping(0.5);
        assert_eq!(d.translation.y, 6.0);
        assert_eq!(d.linear_damping, 0.5);
        assert_eq!(d.mass, 1.0);
    }

    #[test]
    fn collider_desc_builder() {
        let c = ColliderDesc::cuboid(125.0, 0.1, 125.0)
            .with_friction(0.8)
            .with_restitution(0.2);
        assert_eq!(
            c.shape,
            ColliderShape::Cuboid {
                half_extents: Vec3::new(125.0, 0.1, 125.0)
            }
        );
        assert_eq!(c.friction, 0.8);
        assert_eq!(c.restitution, 0.2);
    }
}
