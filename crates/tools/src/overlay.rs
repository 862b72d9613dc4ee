use std::time::{Duration, Instant};
use tickscene_kernel::Scheduler;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Frame timing in the manner of a stats.js panel: FPS over a one-second
/// window plus the duration of the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u64,
    frame_start: Option<Instant>,
    last_frame: Duration,
    window_start: Option<Instant>,
    window_frames: u32,
    fps: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, now: Instant) {
        self.frame_start = Some(now);
        self.window_start.get_or_insert(now);
    }

    pub fn end(&mut self, now: Instant) {
        let Some(start) = self.frame_start.take() else {
            tracing::trace!("FrameStats::end without begin");
            return;
        };
        self.frames += 1;
        self.last_frame = now.saturating_duration_since(start);
        self.window_frames += 1;

        let window_start = *self.window_start.get_or_insert(start);
        let window = now.saturating_duration_since(window_start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_frames = 0;
            self.window_start = Some(now);
        }
    }

    /// Completed `begin`/`end` pairs.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame_ms(&self) -> f32 {
        self.last_frame.as_secs_f32() * 1000.0
    }

    /// Frames per second over the most recent full window; 0 until one completes.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Debug panel state: a two-way pause binding and frame stats.
///
/// Edits from the panel are queued and pushed to the scheduler on `sync`;
/// `sync` then mirrors the scheduler back, so a pause toggled from the
/// keyboard shows up in the panel too.
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    paused: bool,
    requested: Option<bool>,
    stats: FrameStats,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Panel-side edit of the pause checkbox.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.requested = Some(paused);
    }

    /// Apply pending panel edits to the scheduler, then mirror its state.
    pub fn sync(&mut self, scheduler: &mut Scheduler) {
        if let Some(paused) = self.requested.take() {
            if scheduler.set_paused(paused) {
                tracing::debug!(paused, "pause changed from debug overlay");
            }
        }
        self.paused = scheduler.is_paused();
    }

    pub fn begin(&mut self, now: Instant) {
        self.stats.begin(now);
    }

    pub fn end(&mut self, now: Instant) {
        self.stats.end(now);
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// One-line text rendition of the panel.
    pub fn panel(&self) -> String {
        format!(
            "[debug] paused={} fps={:.1} ms={:.2} frames={}",
            self.paused,
            self.stats.fps(),
            self.stats.last_frame_ms(),
            self.stats.frames()
        )
    }
}
