use crate::error::{SystemError, TickError};
use tickscene_ecs::World;
use tickscene_input::InputState;
use tickscene_physics::PhysicsService;
use tickscene_render::RenderService;

/// External collaborators a system may call during a tick.
///
/// Borrowed for the duration of one tick only.
pub struct Services<'a> {
    pub input: &'a mut InputState,
    pub physics: &'a mut dyn PhysicsService,
    pub renderer: &'a mut dyn RenderService,
}

/// Per-frame scalars owned by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Frame callbacks seen, paused ones included.
    pub frame: u64,
    /// Ticks that actually ran the pipeline.
    pub tick: u64,
    /// Seconds since the previous frame callback.
    pub delta: f32,
    /// Seconds of unpaused time accumulated.
    pub elapsed: f64,
}

/// A unit of per-tick logic.
///
/// Systems keep no entity-scoped state: everything durable goes into
/// component stores on `world`.
pub trait System {
    fn name(&self) -> &str;

    fn run(
        &mut self,
        world: &mut World,
        services: &mut Services<'_>,
        frame: &FrameState,
    ) -> Result<(), SystemError>;
}

/// Adapter turning a closure into a `System`.
pub struct FnSystem<F> {
    name: String,
    f: F,
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut World, &mut Services<'_>, &FrameState) -> Result<(), SystemError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(
        &mut self,
        world: &mut World,
        services: &mut Services<'_>,
        frame: &FrameState,
    ) -> Result<(), SystemError> {
        (self.f)(world, services, frame)
    }
}

/// Whether ticks execute the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

/// What a single `tick` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The whole pipeline ran.
    Ran { systems: usize },
    /// Paused: no system ran.
    Skipped,
}

/// Ordered pipeline of systems with a Running/Paused switch.
///
/// The run state only changes from outside (`set_paused`, `toggle_pause`);
/// nothing inside a tick flips it.
#[derive(Default)]
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
    state: RunState,
    frame: FrameState,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.system_names())
            .field("state", &self.state)
            .field("frame", &self.frame)
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system; it runs after every system added before it.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        tracing::debug!(system = system.name(), position = self.systems.len(), "added system");
        self.systems.push(Box::new(system));
    }

    /// Append a closure as a named system.
    pub fn add_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnMut(&mut World, &mut Services<'_>, &FrameState) -> Result<(), SystemError> + 'static,
    {
        self.add_system(FnSystem {
            name: name.into(),
            f,
        });
    }

    /// System names in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whether ticks are currently skipped.
    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Set the run state. Returns whether it changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let next = if paused {
            RunState::Paused
        } else {
            RunState::Running
        };
        if next == self.state {
            return false;
        }
        self.state = next;
        tracing::debug!(state = ?next, frame = self.frame.frame, "run state changed");
        true
    }

    /// Flip between Running and Paused. Returns the new state.
    pub fn toggle_pause(&mut self) -> RunState {
        let paused = self.is_paused();
        self.set_paused(!paused);
        self.state
    }

    /// Counters and timing of the most recent frame callback.
    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Handle one frame callback.
    ///
    /// Paused: records the frame and returns `Skipped` without running any
    /// system. Running: runs every system in order. The first failing
    /// system aborts the remainder of the tick and its error is returned;
    /// writes made by systems that already ran are kept.
    pub fn tick(
        &mut self,
        world: &mut World,
        services: &mut Services<'_>,
        delta: f32,
    ) -> Result<TickOutcome, TickError> {
        self.frame.frame += 1;
        self.frame.delta = delta;
        if self.state == RunState::Paused {
            tracing::trace!(frame = self.frame.frame, "paused, pipeline skipped");
            return Ok(TickOutcome::Skipped);
        }

        self.frame.tick += 1;
        self.frame.elapsed += f64::from(delta);
        let _span = tracing::trace_span!("tick", tick = self.frame.tick).entered();

        let frame = self.frame;
        for system in &mut self.systems {
            tracing::trace!(system = system.name(), "running system");
            if let Err(source) = system.run(world, services, &frame) {
                tracing::error!(
                    system = system.name(),
                    tick = frame.tick,
                    error = %source,
                    "system failed, tick aborted"
                );
                return Err(TickError {
                    system: system.name().to_string(),
                    tick: frame.tick,
                    source,
                });
            }
        }
        Ok(TickOutcome::Ran {
            systems: self.systems.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tickscene_ecs::EcsError;
    use tickscene_physics::PointMassWorld;
    use tickscene_render::DebugTextRenderer;

    struct Harness {
        world: World,
        input: InputState,
        physics: PointMassWorld,
        renderer: DebugTextRenderer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                world: World::new(),
                input: InputState::default(),
                physics: PointMassWorld::default(),
                renderer: DebugTextRenderer::new(),
            }
        }

        fn tick(&mut self, scheduler: &mut Scheduler) -> Result<TickOutcome, TickError> {
            let mut services = Services {
                input: &mut self.input,
                physics: &mut self.physics,
                renderer: &mut self.renderer,
            };
            scheduler.tick(&mut self.world, &mut services, 1.0 / 60.0)
        }
    }

    fn recording(scheduler: &mut Scheduler, log: &Rc<RefCell<Vec<String>>>, name: &str) {
        let log = Rc::clone(log);
        let label = name.to_string();
        scheduler.add_fn(name, move |_, _, _| {
            log.borrow_mut().push(label.clone());
            Ok(())
        });
    }

    #[test]
    fn systems_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        for name in ["input", "movement", "physics", "render"] {
            recording(&mut scheduler, &log, name);
        }
        let mut h = Harness::new();
        assert_eq!(h.tick(&mut scheduler), Ok(TickOutcome::Ran { systems: 4 }));
        assert_eq!(*log.borrow(), vec!["input", "movement", "physics", "render"]);
        assert_eq!(scheduler.system_names(), vec!["input", "movement", "physics", "render"]);
    }

    #[test]
    fn paused_tick_runs_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        recording(&mut scheduler, &log, "only");
        scheduler.set_paused(true);

        let mut h = Harness::new();
        assert_eq!(h.tick(&mut scheduler), Ok(TickOutcome::Skipped));
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.frame().frame, 1);
        assert_eq!(scheduler.frame().tick, 0);
    }

    #[test]
    fn toggling_twice_restores_state_and_counts_ticks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        recording(&mut scheduler, &log, "s");
        let mut h = Harness::new();

        h.tick(&mut scheduler).unwrap();
        assert_eq!(scheduler.toggle_pause(), RunState::Paused);
        h.tick(&mut scheduler).unwrap();
        h.tick(&mut scheduler).unwrap();
        assert_eq!(scheduler.toggle_pause(), RunState::Running);
        h.tick(&mut scheduler).unwrap();

        assert_eq!(scheduler.state(), RunState::Running);
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(scheduler.frame().tick, 2);
        assert_eq!(scheduler.frame().frame, 4);
    }

    #[test]
    fn set_paused_reports_change() {
        let mut scheduler = Scheduler::new();
        assert!(!scheduler.set_paused(false));
        assert!(scheduler.set_paused(true));
        assert!(!scheduler.set_paused(true));
        assert!(scheduler.is_paused());
    }

    #[test]
    fn failing_system_aborts_rest_of_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        recording(&mut scheduler, &log, "before");
        scheduler.add_fn("broken", |world, _, _| {
            world.query(&["Missing"])?;
            Ok(())
        });
        recording(&mut scheduler, &log, "after");

        let mut h = Harness::new();
        let err = h.tick(&mut scheduler).unwrap_err();
        assert_eq!(err.system, "broken");
        assert_eq!(err.tick, 1);
        assert_eq!(
            err.source,
            SystemError::Ecs(EcsError::UnknownComponent("Missing".into()))
        );
        assert_eq!(*log.borrow(), vec!["before"]);

        // the next tick runs again from the start
        let _ = h.tick(&mut scheduler);
        assert_eq!(*log.borrow(), vec!["before", "before"]);
    }

    #[test]
    fn earlier_writes_survive_a_failed_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.add_fn("spawner", |world, _, _| {
            world.spawn();
            Ok(())
        });
        scheduler.add_fn("broken", |world, _, _| {
            let ghost = tickscene_common::EntityId::new();
            world.add_tag("Player", ghost)?;
            Ok(())
        });
        let mut h = Harness::new();
        h.world.register_tag("Player").unwrap();

        let err = h.tick(&mut scheduler).unwrap_err();
        assert!(matches!(err.source, SystemError::Ecs(EcsError::InvalidEntity(_))));
        assert_eq!(h.world.entity_count(), 1);
    }

    #[test]
    fn elapsed_accumulates_only_while_running() {
        let mut scheduler = Scheduler::new();
        let mut h = Harness::new();
        h.tick(&mut scheduler).unwrap();
        scheduler.set_paused(true);
        h.tick(&mut scheduler).unwrap();
        let elapsed = scheduler.frame().elapsed;
        assert!((elapsed - f64::from(1.0f32 / 60.0)).abs() < 1e-9);
        assert!((scheduler.frame().delta - 1.0 / 60.0).abs() < 1e-9);
    }
}
