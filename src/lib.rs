//! # Systole - Simulated Bedside Telemetry
//!
//! Systole synthesizes a continuously animated cardiac waveform and a set of
//! jittered vital-sign readouts that track an authoritative baseline from an
//! external case engine. The synthesis core is display-agnostic and fully
//! testable headless; a ratatui terminal frontend ships as the reference
//! host.
//!
//! ## Core pieces
//!
//! - [`morphology`] - phase time within one cardiac cycle mapped to a
//!   vertical displacement, per rhythm (P-QRS-T table plus AFib/VT/VF
//!   overrides)
//! - [`beat_clock`] - frames-since-beat state machine; cycle length from
//!   heart rate, irregular R-R for atrial fibrillation
//! - [`trace_buffer`] - bounded FIFO of plotted points with a wrapping
//!   x cursor
//! - [`render_loop`] - per-frame orchestration and the cancellable frame
//!   task; at most one live loop per monitor
//! - [`jitter`] - bounded perturbation of displayed vitals with anti-drift
//!   resnap
//! - [`monitor`] - engine tying the jitter model and render-session
//!   lifecycle together
//!
//! ## Frame flow
//!
//! 1. An authoritative `Vitals` record arrives from the case engine
//! 2. The jitter model resets its baseline and keeps the readouts alive
//! 3. The render loop (re)starts with the live heart rate, rhythm, color
//! 4. Each frame: advance the beat clock, compute the morphology offset,
//!    push a point into the bounded trace, stroke the forward-x polyline
//!
//! ## Quick start
//!
//! ```rust
//! use systole::render_loop::{RenderSession, SweepConfig};
//! use systole::surface::{HeadlessSurface, Rgb};
//! use systole::vitals::Rhythm;
//!
//! let config = SweepConfig {
//!     heart_rate: 80,
//!     rhythm: Rhythm::Sinus,
//!     color: Rgb::EMERALD,
//!     fps: 60.0,
//! };
//! let mut session = RenderSession::new(config, 800.0, 400.0, 42);
//! let mut surface = HeadlessSurface::new(800.0, 400.0);
//! for _ in 0..120 {
//!     session.render_frame(&mut surface);
//! }
//! assert!(!surface.last_trace.is_empty());
//! ```

pub mod beat_clock;
pub mod jitter;
pub mod monitor;
pub mod morphology;
pub mod render_loop;
pub mod scenario;
pub mod surface;
pub mod trace_buffer;
pub mod ui;
pub mod vitals;

pub use monitor::{MonitorConfig, MonitorEngine};
pub use render_loop::{RenderHandle, RenderLoop, RenderSession, SweepConfig};
pub use surface::{HeadlessSurface, Rgb, Surface};
pub use vitals::{DisplayedVitals, Rhythm, Vitals};
