//! Vital-sign records and cardiac rhythm labels
//!
//! `Vitals` is the authoritative snapshot handed to the monitor by the case
//! engine; `DisplayedVitals` is the mutable projection the jitter model
//! perturbs between authoritative updates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named cardiac rhythm driving the waveform shape.
///
/// The set is closed; anything unrecognized degrades to `Sinus` rather than
/// failing, so a garbled label from the case engine never kills the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rhythm {
    Sinus,
    SinusTachycardia,
    SinusBradycardia,
    PeakedTWaves,
    StElevation,
    AtrialFibrillation,
    VentricularTachycardia,
    VentricularFibrillation,
}

impl Rhythm {
    /// Parse a rhythm label leniently. Unknown labels map to `Sinus`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sinus rhythm" | "sinus" | "normal sinus rhythm" => Rhythm::Sinus,
            "sinus tachycardia" => Rhythm::SinusTachycardia,
            "sinus bradycardia" => Rhythm::SinusBradycardia,
            "peaked t-waves" | "peaked t waves" => Rhythm::PeakedTWaves,
            "st elevation" => Rhythm::StElevation,
            "atrial fibrillation" | "afib" => Rhythm::AtrialFibrillation,
            "ventricular tachycardia" | "vt" => Rhythm::VentricularTachycardia,
            "ventricular fibrillation" | "vf" => Rhythm::VentricularFibrillation,
            _ => Rhythm::Sinus,
        }
    }

    /// Display label, matching what the case engine sends.
    pub fn label(&self) -> &'static str {
        match self {
            Rhythm::Sinus => "Sinus Rhythm",
            Rhythm::SinusTachycardia => "Sinus Tachycardia",
            Rhythm::SinusBradycardia => "Sinus Bradycardia",
            Rhythm::PeakedTWaves => "Peaked T-Waves",
            Rhythm::StElevation => "ST Elevation",
            Rhythm::AtrialFibrillation => "Atrial Fibrillation",
            Rhythm::VentricularTachycardia => "Ventricular Tachycardia",
            Rhythm::VentricularFibrillation => "Ventricular Fibrillation",
        }
    }

    /// Rhythms with an irregular R-R interval.
    pub fn is_irregular(&self) -> bool {
        matches!(self, Rhythm::AtrialFibrillation)
    }
}

impl Default for Rhythm {
    fn default() -> Self {
        Rhythm::Sinus
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Rhythm {
    fn from(s: String) -> Self {
        Rhythm::from_label(&s)
    }
}

impl From<Rhythm> for String {
    fn from(r: Rhythm) -> Self {
        r.label().to_string()
    }
}

/// Authoritative vital-sign snapshot from the case engine.
///
/// Immutable once produced; the monitor only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: u32,
    pub systolic_bp: i32,
    pub diastolic_bp: i32,
    pub resp_rate: u32,
    pub oxygen_sat: u32,
    pub temperature: f64,
    pub rhythm: Rhythm,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            heart_rate: 72,
            systolic_bp: 120,
            diastolic_bp: 80,
            resp_rate: 16,
            oxygen_sat: 98,
            temperature: 36.8,
            rhythm: Rhythm::Sinus,
        }
    }
}

/// What the monitor actually shows: numeric fields drift under jitter,
/// blood pressure and rhythm pass straight through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayedVitals {
    pub heart_rate: f64,
    pub resp_rate: f64,
    pub oxygen_sat: f64,
    pub temperature: f64,
    pub systolic_bp: i32,
    pub diastolic_bp: i32,
    pub rhythm: Rhythm,
}

impl DisplayedVitals {
    /// Heart rate as shown on the readout.
    pub fn heart_rate_bpm(&self) -> u32 {
        self.heart_rate.round().max(0.0) as u32
    }

    pub fn resp_rate_brpm(&self) -> u32 {
        self.resp_rate.round().max(0.0) as u32
    }

    pub fn oxygen_sat_pct(&self) -> u32 {
        self.oxygen_sat.round().clamp(0.0, 100.0) as u32
    }

    /// Temperature rounded to one decimal, as on the readout.
    pub fn temperature_c(&self) -> f64 {
        (self.temperature * 10.0).round() / 10.0
    }

    /// Mean arterial pressure, derived for the NIBP box.
    pub fn mean_arterial_pressure(&self) -> i32 {
        ((self.systolic_bp + 2 * self.diastolic_bp) as f64 / 3.0).round() as i32
    }
}

impl From<&Vitals> for DisplayedVitals {
    fn from(v: &Vitals) -> Self {
        Self {
            heart_rate: v.heart_rate as f64,
            resp_rate: v.resp_rate as f64,
            oxygen_sat: v.oxygen_sat as f64,
            temperature: v.temperature,
            systolic_bp: v.systolic_bp,
            diastolic_bp: v.diastolic_bp,
            rhythm: v.rhythm,
        }
    }
}
