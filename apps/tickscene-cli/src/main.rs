mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tickscene_common::BodyHandle;
use tickscene_kernel::components::PHYSICS;
use tickscene_kernel::{FrameClock, Scene, SceneConfig, TickOutcome};
use tickscene_physics::{PhysicsService, PointMassWorld};
use tickscene_render::DebugTextRenderer;
use tickscene_tools::{DebugOverlay, EntityInfo, WorldInspector, WorldSummary};
use tracing_subscriber::EnvFilter;

use crate::script::{Script, ScriptAction};

#[derive(Parser)]
#[command(name = "tickscene-cli", about = "Headless driver for the tickscene frame pipeline")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the default pipeline
    Info,
    /// Drive the scene for a number of frames with scripted key input
    Run {
        /// Number of frame callbacks to deliver
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Simulated display refresh rate
        #[arg(long, default_value = "60")]
        fps: f64,
        /// YAML scene config; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Input script, e.g. "10:down:KeyW,40:up:KeyW,60:down:Escape"
        #[arg(short, long, default_value = "")]
        script: String,
        /// Print the text renderer's output for every rendered frame
        #[arg(long)]
        print_frames: bool,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default config as YAML, or validate a config file
    Config {
        /// File to validate
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct RunSummary {
    frames: u64,
    ticks: u64,
    paused: bool,
    player_position: [f32; 3],
    physics_steps: u64,
    world: WorldSummary,
    player: Option<EntityInfo>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            let config = SceneConfig::default();
            let scene = build_scene(config.clone())?;
            println!("tickscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", tickscene_render::crate_info());
            println!("tools: {}", tickscene_tools::crate_info());
            println!("pipeline: {}", scene.scheduler().system_names().join(" -> "));
            for (key, action) in config.bindings.iter() {
                println!("  {key:<8} {action:?}");
            }
        }
        Commands::Run {
            ticks,
            fps,
            config,
            script,
            print_frames,
            json,
        } => {
            if !(fps > 0.0 && fps.is_finite()) {
                anyhow::bail!("--fps must be positive, got {fps}");
            }
            let config = match config {
                Some(path) => SceneConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SceneConfig::default(),
            };
            let script = Script::parse(&script)?;
            let summary = run(config, &script, ticks, fps, print_frames)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let [x, y, z] = summary.player_position;
                println!(
                    "frames={} ticks={} paused={} player=({x:.3}, {y:.3}, {z:.3})",
                    summary.frames, summary.ticks, summary.paused
                );
                println!("{}", summary.world);
                if let Some(player) = &summary.player {
                    println!("{player}");
                }
            }
        }
        Commands::Config { path } => match path {
            Some(path) => {
                SceneConfig::load(&path).with_context(|| format!("loading {}", path.display()))?;
                println!("{}: valid", path.display());
            }
            None => print!("{}", SceneConfig::default().to_yaml_string()?),
        },
    }

    Ok(())
}

fn build_scene(config: SceneConfig) -> anyhow::Result<Scene<PointMassWorld, DebugTextRenderer>> {
    let physics = PointMassWorld::new(config.physics);
    let renderer = DebugTextRenderer::with_camera(config.camera.to_camera());
    Ok(Scene::new(config, physics, renderer)?)
}

/// Headless frame loop. Frame timestamps are simulated at `fps` so runs are
/// reproducible; the overlay still measures wall time spent per frame.
fn run(
    config: SceneConfig,
    script: &Script,
    frames: u64,
    fps: f64,
    print_frames: bool,
) -> anyhow::Result<RunSummary> {
    let mut clock = FrameClock::new(config.frame.max_delta);
    let mut scene = build_scene(config)?;
    let mut overlay = DebugOverlay::new();

    let _span = tracing::info_span!("run", frames, fps).entered();
    let start = Instant::now();
    clock.delta(start);

    for frame in 1..=frames {
        for action in script.at(frame) {
            tracing::debug!(frame, ?action, "script step");
            match action {
                ScriptAction::KeyDown(code) => {
                    scene.key_down(code);
                }
                ScriptAction::KeyUp(code) => {
                    scene.key_up(code);
                }
                ScriptAction::OverlayPause => {
                    let paused = overlay.paused();
                    overlay.set_paused(!paused);
                }
                ScriptAction::Resize { width, height } => scene.resize(*width, *height, 1.0),
            }
        }
        overlay.sync(scene.scheduler_mut());

        let delta = clock.delta(start + Duration::from_secs_f64(frame as f64 / fps));
        overlay.begin(Instant::now());
        let outcome = scene.frame(delta)?;
        overlay.end(Instant::now());

        if print_frames && outcome != TickOutcome::Skipped {
            println!("{}", scene.renderer().last_frame());
        }
    }
    overlay.sync(scene.scheduler_mut());
    tracing::info!("{}", overlay.panel());

    let player = scene.player();
    let body = scene
        .world()
        .get::<BodyHandle>(PHYSICS, player)?
        .copied()
        .context("player has no physics body")?;
    let position = scene.physics().translation(body)?;

    Ok(RunSummary {
        frames: scene.scheduler().frame().frame,
        ticks: scene.scheduler().frame().tick,
        paused: scene.is_paused(),
        player_position: position.to_array(),
        physics_steps: scene.physics().steps(),
        world: WorldInspector::summary(scene.world()),
        player: WorldInspector::inspect_entity(scene.world(), player),
    })
}
