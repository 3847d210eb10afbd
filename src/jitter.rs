//! Vitals jitter model
//!
//! Perturbs the displayed numeric vitals around the last authoritative
//! baseline on a fixed tick so the readouts feel alive between case-engine
//! updates. Bounded random walk with an anti-drift resnap: a candidate that
//! strays more than twice the field's factor from baseline is discarded and
//! the value snapped back to baseline plus a hair of noise.
//!
//! The baseline for each field is read directly off the authoritative
//! `Vitals` struct. (The original frontend located it by searching for any
//! vitals field whose value equaled the displayed one, which aliases when
//! two fields coincide, e.g. equal heart and respiratory rates.)

use crate::vitals::{DisplayedVitals, Vitals};
use rand::Rng;
use std::time::Duration;

/// Default tick period.
pub const JITTER_PERIOD: Duration = Duration::from_millis(2000);

/// Per-field noise factors.
pub const HR_FACTOR: f64 = 1.0;
pub const RR_FACTOR: f64 = 1.0;
pub const O2_FACTOR: f64 = 0.5;
pub const TEMP_FACTOR: f64 = 0.02;

/// One jittered field step: bounded noise around the current value with a
/// resnap to baseline when the candidate drifts past `2 * factor`.
fn jitter_field(current: f64, baseline: f64, factor: f64, rng: &mut impl Rng) -> f64 {
    let noise = (rng.gen::<f64>() - 0.5) * factor;
    let candidate = current + noise;
    if (candidate - baseline).abs() > factor * 2.0 {
        baseline + (rng.gen::<f64>() - 0.5)
    } else {
        candidate
    }
}

/// Jitter state for one monitor: the authoritative baseline plus the
/// drifting displayed projection.
#[derive(Debug, Clone)]
pub struct JitterModel {
    baseline: Vitals,
    displayed: DisplayedVitals,
}

impl JitterModel {
    pub fn new(vitals: Vitals) -> Self {
        Self {
            displayed: DisplayedVitals::from(&vitals),
            baseline: vitals,
        }
    }

    /// Replace the baseline with a fresh authoritative snapshot. The
    /// displayed values are overwritten too; no drift carries over.
    pub fn reset_baseline(&mut self, vitals: Vitals) {
        self.displayed = DisplayedVitals::from(&vitals);
        self.baseline = vitals;
    }

    /// One jitter tick over the four drifting fields. Rounding matches the
    /// readout: whole numbers for rates and SpO2, one decimal for
    /// temperature; SpO2 additionally clamped to [0, 100].
    pub fn tick(&mut self, rng: &mut impl Rng) {
        let d = &mut self.displayed;
        d.heart_rate =
            jitter_field(d.heart_rate, self.baseline.heart_rate as f64, HR_FACTOR, rng).round();
        d.resp_rate =
            jitter_field(d.resp_rate, self.baseline.resp_rate as f64, RR_FACTOR, rng).round();
        d.oxygen_sat =
            jitter_field(d.oxygen_sat, self.baseline.oxygen_sat as f64, O2_FACTOR, rng)
                .round()
                .clamp(0.0, 100.0);
        d.temperature =
            (jitter_field(d.temperature, self.baseline.temperature, TEMP_FACTOR, rng) * 10.0)
                .round()
                / 10.0;
    }

    pub fn baseline(&self) -> &Vitals {
        &self.baseline
    }

    pub fn displayed(&self) -> &DisplayedVitals {
        &self.displayed
    }
}
