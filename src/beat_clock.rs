//! Beat interval scheduling
//!
//! Tracks frames elapsed since the current cardiac cycle began and decides
//! when the next cycle starts. Regular rhythms get an exact interval from
//! the heart rate; atrial fibrillation redraws an irregular interval at the
//! start of every cycle.

use rand::Rng;

/// Heart rates below this are clamped before interval math so the cycle
/// length can never blow up.
pub const MIN_HEART_RATE: u32 = 20;

/// Per-session beat phase state. Owned by exactly one render session and
/// rebuilt from scratch whenever the session restarts.
#[derive(Debug, Clone)]
pub struct BeatClock {
    frames_since_beat: f64,
    cycle_len: f64,
    nominal_len: f64,
    irregular: bool,
}

/// Frames in one nominal cycle: (60 / hr) seconds at `fps` frames per
/// second, with the heart rate clamped to a plausible floor.
pub fn nominal_cycle_len(heart_rate: u32, fps: f64) -> f64 {
    let hr = heart_rate.max(MIN_HEART_RATE) as f64;
    (60.0 / hr) * fps
}

impl BeatClock {
    pub fn new(heart_rate: u32, fps: f64, irregular: bool) -> Self {
        let nominal = nominal_cycle_len(heart_rate, fps);
        Self {
            frames_since_beat: 0.0,
            cycle_len: nominal,
            nominal_len: nominal,
            irregular,
        }
    }

    /// Advance one frame and return the phase time within the current
    /// cycle. Rolls over to a new cycle once the interval is exceeded,
    /// redrawing the interval for irregular rhythms.
    pub fn advance(&mut self, rng: &mut impl Rng) -> f64 {
        self.frames_since_beat += 1.0;
        if self.frames_since_beat > self.cycle_len {
            self.frames_since_beat = 0.0;
            if self.irregular {
                // Irregular R-R: 80-120% of nominal, drawn once per cycle.
                self.cycle_len = self.nominal_len * (0.8 + rng.gen::<f64>() * 0.4);
            }
        }
        self.frames_since_beat
    }

    /// Phase time without advancing.
    pub fn phase(&self) -> f64 {
        self.frames_since_beat
    }

    /// Interval currently in force, in frames.
    pub fn cycle_len(&self) -> f64 {
        self.cycle_len
    }

    /// Restart the phase at the top of a cycle.
    pub fn reset(&mut self) {
        self.frames_since_beat = 0.0;
    }
}
