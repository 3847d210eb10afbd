//! Per-frame render orchestration
//!
//! A render session bundles everything one sweep needs: beat clock, trace
//! buffer, amplitudes, RNG. `render_frame` is the whole per-frame sequence
//! and is synchronous, so the loop body is atomic with respect to every
//! other task on the cooperative runtime. `RenderLoop::start` wraps it in a
//! self-rescheduling tokio task with an explicit cancellation handle; the
//! owner must cancel before reconfiguring, so at most one live loop ever
//! writes to a monitor's surface.

use crate::beat_clock::BeatClock;
use crate::morphology::{artifact_jitter, cycle_offset, Amplitudes};
use crate::surface::{Rgb, Surface};
use crate::trace_buffer::{TraceBuffer, WaveformPoint};
use crate::vitals::Rhythm;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Reference-grid spacing in pixels (25 mm at 1 px/mm).
pub const GRID_SPACING: f32 = 25.0;

/// Everything that defines one sweep: changing any field means tearing the
/// session down and starting a fresh one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    pub heart_rate: u32,
    pub rhythm: Rhythm,
    pub color: Rgb,
    pub fps: f64,
}

/// Owned state of one render session. Constructed fresh on every (re)start,
/// dropped on cancel; nothing survives a reconfiguration.
pub struct RenderSession {
    config: SweepConfig,
    clock: BeatClock,
    buffer: TraceBuffer,
    amplitudes: Amplitudes,
    rng: StdRng,
}

impl RenderSession {
    pub fn new(config: SweepConfig, width: f32, height: f32, seed: u64) -> Self {
        let clock = BeatClock::new(config.heart_rate, config.fps, config.rhythm.is_irregular());
        Self {
            config,
            clock,
            buffer: TraceBuffer::new(width),
            amplitudes: Amplitudes::for_height(height),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    pub fn clock(&self) -> &BeatClock {
        &self.clock
    }

    /// One full frame: clear, grid, advance phase, synthesize the next
    /// point, stroke the visible trace.
    pub fn render_frame<S: Surface>(&mut self, surface: &mut S) {
        let (width, height) = surface.size();
        surface.clear();
        draw_grid(surface, width, height);

        let t = self.clock.advance(&mut self.rng);
        let offset = cycle_offset(t, self.config.rhythm, &self.amplitudes, &mut self.rng)
            + artifact_jitter(&mut self.rng);
        let mid_y = self.amplitudes.height() / 2.0;
        self.buffer.push(mid_y + offset);

        let segments: Vec<(WaveformPoint, WaveformPoint)> = self.buffer.segments().collect();
        surface.stroke_trace(&segments, self.config.color);
    }
}

/// Fixed reference grid, independent of waveform state.
fn draw_grid<S: Surface>(surface: &mut S, width: f32, height: f32) {
    let mut x = 0.0;
    while x < width {
        surface.draw_line(
            WaveformPoint { x, y: 0.0 },
            WaveformPoint { x, y: height },
            Rgb::GRID,
        );
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < height {
        surface.draw_line(
            WaveformPoint { x: 0.0, y },
            WaveformPoint { x: width, y },
            Rgb::GRID,
        );
        y += GRID_SPACING;
    }
}

/// The surface slot a render loop draws into. `None` while the host has no
/// surface ready; frames are skipped (with a warning) until one exists.
pub type SharedSurface<S> = Rc<RefCell<Option<S>>>;

/// Cancellation handle for a running render loop. Dropping it cancels too,
/// so a replaced handle can never leak a second live loop.
pub struct RenderHandle {
    task: JoinHandle<()>,
}

impl RenderHandle {
    /// Stop the callback chain. On the single-threaded runtime the task is
    /// never mid-frame when this runs, so no further buffer or surface
    /// mutation can happen after cancel returns.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The render loop task factory.
pub struct RenderLoop;

impl RenderLoop {
    /// Spawn the per-frame callback chain on the current `LocalSet`.
    /// The caller owns the returned handle and must cancel it before
    /// starting a replacement loop on the same surface.
    pub fn start<S: Surface + 'static>(
        surface: SharedSurface<S>,
        mut session: RenderSession,
    ) -> RenderHandle {
        let period = Duration::from_secs_f64(1.0 / session.config.fps.max(1.0));
        debug!(
            hr = session.config.heart_rate,
            rhythm = %session.config.rhythm,
            "starting render loop"
        );
        let task = tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let mut slot = surface.borrow_mut();
                match slot.as_mut() {
                    Some(s) => session.render_frame(s),
                    None => warn!("drawing surface not ready, skipping frame"),
                }
            }
        });
        RenderHandle { task }
    }
}
