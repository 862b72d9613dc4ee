//! End-to-end behavior of the frame pipeline against the reference backends.

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;
use tickscene_common::{BodyHandle, EntityId};
use tickscene_ecs::WorldEvent;
use tickscene_kernel::components::{INPUT, MESH, PHYSICS, PLAYER};
use tickscene_kernel::{Scene, SceneConfig, TickOutcome};
use tickscene_physics::{PhysicsService, PointMassWorld};
use tickscene_render::DebugTextRenderer;

const DT: f32 = 1.0 / 60.0;

fn scene_with(config: SceneConfig) -> Scene<PointMassWorld, DebugTextRenderer> {
    Scene::new(
        config.clone(),
        PointMassWorld::new(config.physics),
        DebugTextRenderer::with_camera(config.camera.to_camera()),
    )
    .unwrap()
}

fn scene() -> Scene<PointMassWorld, DebugTextRenderer> {
    scene_with(SceneConfig::default())
}

fn player_body(scene: &Scene<PointMassWorld, DebugTextRenderer>) -> BodyHandle {
    *scene
        .world()
        .get::<BodyHandle>(PHYSICS, scene.player())
        .unwrap()
        .unwrap()
}

#[test]
fn player_settles_on_ground() {
    let mut s = scene();
    for _ in 0..300 {
        s.frame(DT).unwrap();
    }
    let body = player_body(&s);
    let y = s.physics().translation(body).unwrap().y;
    assert!((y - 0.6).abs() < 1e-3, "player rests at {y}");
    assert!(s.renderer().last_frame().contains("sphere"));
}

#[test]
fn holding_forward_moves_toward_negative_z() {
    let mut s = scene();
    for _ in 0..120 {
        s.frame(DT).unwrap();
    }
    let body = player_body(&s);
    let z0 = s.physics().translation(body).unwrap().z;

    s.key_down("KeyW");
    for _ in 0..30 {
        s.frame(DT).unwrap();
    }
    s.key_up("KeyW");
    let z1 = s.physics().translation(body).unwrap().z;
    assert!(z1 < z0, "expected forward motion, z went {z0} -> {z1}");
}

#[test]
fn jump_fires_once_per_press() {
    let mut s = scene();
    for _ in 0..300 {
        s.frame(DT).unwrap();
    }
    let body = player_body(&s);

    s.key_down("Space");
    s.frame(DT).unwrap();
    let vy = s.physics().velocity(body).unwrap().y;
    assert!(vy > 0.0, "jump should launch upward, vy = {vy}");

    // still held: no second impulse, gravity takes over
    s.frame(DT).unwrap();
    assert!(s.physics().velocity(body).unwrap().y < vy);
}

#[test]
fn pause_twice_runs_pipeline_once_per_unpaused_frame() {
    let mut s = scene();
    s.frame(DT).unwrap();
    s.toggle_pause();
    for _ in 0..5 {
        assert_eq!(s.frame(DT).unwrap(), TickOutcome::Skipped);
    }
    s.toggle_pause();
    s.frame(DT).unwrap();
    s.frame(DT).unwrap();

    assert!(!s.is_paused());
    assert_eq!(s.physics().steps(), 3);
    assert_eq!(s.renderer().frames(), 3);
    assert_eq!(s.scheduler().frame().frame, 8);
    assert_eq!(s.scheduler().frame().tick, 3);
}

#[test]
fn falling_off_the_world_respawns() {
    let mut config = SceneConfig::default();
    config.player.spawn = Vec3::new(500.0, 1.0, 0.0);
    let mut s = scene_with(config);
    let body = player_body(&s);

    let mut recovered_at = None;
    for frame in 0..600 {
        s.frame(DT).unwrap();
        if s.physics().translation(body).unwrap() == Vec3::new(0.0, 10.0, 0.0) {
            recovered_at = Some(frame);
            break;
        }
    }
    assert!(recovered_at.is_some(), "body never recovered");
    // now above the ground slab; it comes to rest instead of falling again
    for _ in 0..300 {
        s.frame(DT).unwrap();
    }
    assert!((s.physics().translation(body).unwrap().y - 0.6).abs() < 1e-3);
}

#[test]
fn destroy_mid_tick_hides_entity_from_later_systems() {
    let mut s = scene();
    let player = s.player();
    let seen: Rc<RefCell<Vec<Vec<EntityId>>>> = Rc::new(RefCell::new(Vec::new()));

    // Rebuild the pipeline: destroyer first, observer second.
    *s.scheduler_mut() = tickscene_kernel::Scheduler::new();
    s.scheduler_mut().add_fn("destroyer", move |world, _, _| {
        world.despawn(player);
        Ok(())
    });
    let observed = Rc::clone(&seen);
    s.scheduler_mut().add_fn("observer", move |world, _, _| {
        observed.borrow_mut().push(world.query(&[MESH, PHYSICS])?);
        Ok(())
    });

    s.frame(DT).unwrap();
    assert_eq!(*seen.borrow(), vec![Vec::<EntityId>::new()]);
    assert!(!s.world().is_live(player));
    for name in [MESH, PHYSICS, INPUT, PLAYER] {
        assert!(!s.world().has(name, player));
    }
}

#[test]
fn extra_entities_without_input_are_synced_but_not_driven() {
    let mut s = scene();
    let body = s.physics_mut().create_rigid_body(
        tickscene_physics::RigidBodyDesc::dynamic().with_translation(Vec3::new(3.0, 5.0, 0.0)),
    );
    let mesh = {
        use tickscene_render::{MeshDesc, RenderService};
        s.renderer_mut()
            .create_mesh(MeshDesc::Sphere { radius: 0.5 }, Vec3::new(3.0, 5.0, 0.0))
    };
    let crate_entity = s.world_mut().spawn();
    s.world_mut().insert(MESH, crate_entity, mesh).unwrap();
    s.world_mut().insert(PHYSICS, crate_entity, body).unwrap();

    s.key_down("KeyD");
    s.frame(DT).unwrap();

    let pose = s.renderer().mesh_position(mesh).unwrap();
    assert_eq!(pose, s.physics().translation(body).unwrap());
    assert_eq!(s.physics().velocity(body).unwrap().x, 0.0);
    // camera still follows the tagged player, not the crate
    let player_pos = s.physics().translation(player_body(&s)).unwrap();
    assert_eq!(s.renderer().camera().target, player_pos);
}

#[test]
fn world_event_log_is_drained_every_frame() {
    let mut s = scene();
    s.frame(DT).unwrap();
    // startup spawn and inserts are handed over with the first frame
    assert!(s.world().events().is_empty());
    assert!(!s.frame_events().is_empty());

    for _ in 0..50 {
        let temp = s.world_mut().spawn();
        s.world_mut().despawn(temp);
        s.frame(DT).unwrap();
        assert!(s.world().events().is_empty());
        assert_eq!(s.frame_events().len(), 2);
        assert!(matches!(s.frame_events()[0], WorldEvent::Spawned { id } if id == temp));
    }

    s.frame(DT).unwrap();
    assert!(s.frame_events().is_empty());
}
