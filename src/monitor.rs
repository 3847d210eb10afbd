//! Monitor engine
//!
//! Owns the jitter model and the render-session lifecycle for one bedside
//! monitor. Authoritative vitals from the case engine replace the jitter
//! baseline and restart the sweep from beat phase zero; between updates the
//! jitter tick may change the displayed heart rate, which reconfigures the
//! sweep (cancel old loop, start fresh) exactly as a new rate from the case
//! engine would.

use crate::jitter::{JitterModel, JITTER_PERIOD};
use crate::render_loop::{RenderHandle, RenderLoop, RenderSession, SharedSurface, SweepConfig};
use crate::surface::{Rgb, Surface};
use crate::vitals::{DisplayedVitals, Vitals};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// Monitor-wide knobs. `fps` is the explicit frames-to-wall-clock mapping
/// (the upstream display was assumed to refresh at ~60 Hz; here it is a
/// config field used for both cycle math and frame scheduling).
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub fps: f64,
    pub jitter_period: Duration,
    pub surface_width: f32,
    pub surface_height: f32,
    pub seed: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            jitter_period: JITTER_PERIOD,
            surface_width: 800.0,
            surface_height: 400.0,
            seed: 0,
        }
    }
}

/// Trace color banding: alarm red outside 55-110 bpm, emerald inside.
pub fn trace_color(heart_rate: u32) -> Rgb {
    if heart_rate > 110 || heart_rate < 55 {
        Rgb::RED
    } else {
        Rgb::EMERALD
    }
}

/// One bedside monitor: jitter model + at most one live render loop.
pub struct MonitorEngine<S: Surface + 'static> {
    config: MonitorConfig,
    jitter: JitterModel,
    surface: SharedSurface<S>,
    render: Option<RenderHandle>,
    session_config: Option<SweepConfig>,
    session_count: u64,
    rng: StdRng,
}

impl<S: Surface + 'static> MonitorEngine<S> {
    /// Build the engine around a surface slot. No loop runs until
    /// [`start`](Self::start) or the first authoritative update.
    pub fn new(config: MonitorConfig, surface: SharedSurface<S>, initial: Vitals) -> Self {
        Self {
            jitter: JitterModel::new(initial),
            surface,
            render: None,
            session_config: None,
            session_count: 0,
            rng: StdRng::seed_from_u64(config.seed ^ 0x9e37_79b9_7f4a_7c15),
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn displayed(&self) -> DisplayedVitals {
        *self.jitter.displayed()
    }

    pub fn baseline(&self) -> Vitals {
        *self.jitter.baseline()
    }

    /// Start the sweep for the current vitals.
    pub fn start(&mut self) {
        self.restart_session();
    }

    /// Authoritative update from the case engine: baseline and displayed
    /// values are overwritten, and the sweep restarts at phase zero.
    pub fn apply_vitals(&mut self, vitals: Vitals) {
        info!(
            hr = vitals.heart_rate,
            rhythm = %vitals.rhythm,
            "authoritative vitals update"
        );
        self.jitter.reset_baseline(vitals);
        self.restart_session();
    }

    /// One jitter tick. If the displayed heart rate moved, the sweep is
    /// reconfigured to follow it.
    pub fn jitter_tick(&mut self) {
        self.jitter.tick(&mut self.rng);
        let desired = self.desired_config();
        if self.session_config != Some(desired) {
            self.restart_session();
        }
    }

    /// New surface geometry from the host. A live sweep is rebuilt so the
    /// buffer capacity and amplitudes match.
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        if (width, height) == (self.config.surface_width, self.config.surface_height) {
            return;
        }
        self.config.surface_width = width;
        self.config.surface_height = height;
        if self.render.is_some() {
            self.restart_session();
        }
    }

    /// Cancel the live loop and drop all sweep state.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.render.take() {
            handle.cancel();
        }
        self.session_config = None;
    }

    /// Sweep configuration the monitor should be running right now: live
    /// (jittered) heart rate, authoritative rhythm, rate-banded color.
    fn desired_config(&self) -> SweepConfig {
        let hr = self.jitter.displayed().heart_rate_bpm();
        SweepConfig {
            heart_rate: hr,
            rhythm: self.jitter.baseline().rhythm,
            color: trace_color(hr),
            fps: self.config.fps,
        }
    }

    /// Cancel-then-start: the old callback chain is stopped before the new
    /// session exists, so two loops never share the surface.
    fn restart_session(&mut self) {
        if let Some(handle) = self.render.take() {
            handle.cancel();
        }
        let desired = self.desired_config();
        self.session_count += 1;
        let seed = self.config.seed.wrapping_add(self.session_count);
        let session = RenderSession::new(
            desired,
            self.config.surface_width,
            self.config.surface_height,
            seed,
        );
        self.render = Some(RenderLoop::start(Rc::clone(&self.surface), session));
        self.session_config = Some(desired);
    }
}

/// Periodic jitter task for an engine on the current `LocalSet`. Runs until
/// aborted; each tick is synchronous, so ticks never interleave with frames.
pub fn spawn_jitter_task<S: Surface + 'static>(
    engine: Rc<RefCell<MonitorEngine<S>>>,
) -> tokio::task::JoinHandle<()> {
    let period = engine.borrow().config.jitter_period;
    tokio::task::spawn_local(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // immediate first tick is a no-op
        loop {
            ticker.tick().await;
            engine.borrow_mut().jitter_tick();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_color_banding() {
        assert_eq!(trace_color(54), Rgb::RED);
        assert_eq!(trace_color(55), Rgb::EMERALD);
        assert_eq!(trace_color(110), Rgb::EMERALD);
        assert_eq!(trace_color(111), Rgb::RED);
    }
}
