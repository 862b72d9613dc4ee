use crate::components::{self, INPUT, MESH, PHYSICS, PLAYER};
use crate::config::SceneConfig;
use crate::error::{SceneError, TickError};
use crate::scheduler::{RunState, Scheduler, Services, TickOutcome};
use crate::systems::{InputSystem, MovementSystem, PhysicsSystem, RenderSystem};
use tickscene_common::EntityId;
use tickscene_ecs::{World, WorldEvent};
use tickscene_input::{InputFlags, InputState, KeyOutcome};
use tickscene_physics::{ColliderDesc, PhysicsService, RigidBodyDesc};
use tickscene_render::{MeshDesc, RenderService};

/// The explicit application context: ECS world, scheduler, raw input and
/// the two external services, built once at startup.
///
/// Event handlers (`key_down`, `key_up`, `resize`) may be called between
/// frames; `frame` runs at most one tick. The world's mutation log is drained
/// at the end of every frame and kept only until the next one.
#[derive(Debug)]
pub struct Scene<P, R> {
    config: SceneConfig,
    world: World,
    scheduler: Scheduler,
    input: InputState,
    physics: P,
    renderer: R,
    player: EntityId,
    frame_events: Vec<WorldEvent>,
}

impl<P: PhysicsService, R: RenderService> Scene<P, R> {
    /// Register components, create the ground and the player, and install
    /// the standard input → movement → physics → render pipeline.
    pub fn new(config: SceneConfig, mut physics: P, mut renderer: R) -> Result<Self, SceneError> {
        config.validate()?;
        let mut world = World::new();
        components::register_all(&mut world)?;

        let g = &config.ground;
        physics.create_collider(
            ColliderDesc::cuboid(g.half_extents.x, g.half_extents.y, g.half_extents.z)
                .with_friction(g.friction)
                .with_restitution(g.restitution),
            None,
        )?;

        let player = spawn_player(&mut world, &config, &mut physics, &mut renderer)?;

        let camera = &config.camera;
        renderer.set_camera_pose(camera.follow(config.player.spawn), config.player.spawn);

        let mut scheduler = Scheduler::new();
        scheduler.add_system(InputSystem);
        scheduler.add_system(MovementSystem {
            jump_impulse: config.movement.jump_impulse,
        });
        scheduler.add_system(PhysicsSystem);
        scheduler.add_system(RenderSystem {
            camera: config.camera,
            recovery: config.recovery,
        });

        tracing::info!(
            player = %player.short(),
            systems = ?scheduler.system_names(),
            "scene ready"
        );

        Ok(Self {
            input: InputState::new(config.bindings.clone()),
            config,
            world,
            scheduler,
            physics,
            renderer,
            player,
            frame_events: Vec::new(),
        })
    }

    /// Handle one frame callback: run one tick unless paused.
    pub fn frame(&mut self, delta: f32) -> Result<TickOutcome, TickError> {
        let mut services = Services {
            input: &mut self.input,
            physics: &mut self.physics,
            renderer: &mut self.renderer,
        };
        let outcome = self.scheduler.tick(&mut self.world, &mut services, delta);
        self.frame_events = self.world.drain_events();
        if !self.frame_events.is_empty() {
            tracing::trace!(events = self.frame_events.len(), "drained world events");
        }
        outcome
    }

    /// World mutations recorded since the previous frame, drained by the last `frame` call.
    pub fn frame_events(&self) -> &[WorldEvent] {
        &self.frame_events
    }

    /// Feed a key press. The pause binding flips the scheduler here, outside any tick.
    pub fn key_down(&mut self, code: &str) -> KeyOutcome {
        let outcome = self.input.key_down(code, self.scheduler.is_paused());
        if outcome == KeyOutcome::TogglePause {
            self.scheduler.toggle_pause();
        }
        outcome
    }

    /// Feed a key release. Honored while paused so keys never stick.
    pub fn key_up(&mut self, code: &str) -> KeyOutcome {
        self.input.key_up(code)
    }

    /// Window resize notification, forwarded to the renderer.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.renderer.resize(width, height, pixel_ratio);
    }

    /// Pause or resume the pipeline. Returns whether the state changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        self.scheduler.set_paused(paused)
    }

    /// Flip the run state. Returns the new state.
    pub fn toggle_pause(&mut self) -> RunState {
        self.scheduler.toggle_pause()
    }

    /// Whether the scheduler is currently paused.
    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// The player entity spawned at startup.
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Config the scene was built from.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable ECS world, for spawning extra entities between frames.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The system pipeline and its frame counters.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Mutable pipeline, e.g. for the debug overlay's pause binding.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// The physics backend.
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Mutable physics backend.
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// The render backend.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable render backend.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

/// Create the player entity: a sphere mesh, a damped dynamic body with a
/// ball collider, an `Input` component and the `Player` tag.
pub fn spawn_player(
    world: &mut World,
    config: &SceneConfig,
    physics: &mut dyn PhysicsService,
    renderer: &mut dyn RenderService,
) -> Result<EntityId, SceneError> {
    let p = &config.player;
    let body = physics.create_rigid_body(
        RigidBodyDesc::dynamic()
            .with_translation(p.spawn)
            .with_linear_damping(p.linear_damping),
    );
    physics.create_collider(
        ColliderDesc::ball(p.radius)
            .with_friction(p.friction)
            .with_restitution(p.restitution),
        Some(body),
    )?;
    let mesh = renderer.create_mesh(MeshDesc::Sphere { radius: p.radius }, p.spawn);

    let player = world.spawn();
    world.add_tag(PLAYER, player)?;
    world.insert(INPUT, player, InputFlags::default())?;
    world.insert(MESH, player, mesh)?;
    world.insert(PHYSICS, player, body)?;
    Ok(player)
}
