//! Cardiac cycle morphology
//!
//! Maps phase time within one cardiac cycle to a vertical displacement from
//! the trace midline. One shared P-QRS-T table covers the sinus family;
//! pathological rhythms override individual segments or replace the table
//! outright. Offsets are in surface pixels, negative = upward (screen y
//! grows downward).

use crate::vitals::Rhythm;
use rand::Rng;
use std::f32::consts::PI;

/// Amplitude parameters scaled to the surface height.
#[derive(Debug, Clone, Copy)]
pub struct Amplitudes {
    pub qrs: f32,
    pub p: f32,
    pub t: f32,
    height: f32,
}

impl Amplitudes {
    /// Standard scaling for a surface of the given pixel height.
    pub fn for_height(height: f32) -> Self {
        Self {
            qrs: height * 0.35,
            p: height * 0.04,
            t: height * 0.08,
            height,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Displacement from the midline at phase time `t` (frames since cycle
/// start) for the given rhythm. Deterministic for the sinus family; VF and
/// AFib draw from `rng`.
///
/// The universal movement-artifact jitter is NOT included here; the render
/// loop adds [`artifact_jitter`] after this.
pub fn cycle_offset(t: f64, rhythm: Rhythm, amp: &Amplitudes, rng: &mut impl Rng) -> f32 {
    match rhythm {
        // Chaotic: uniformly random deflection every frame, no cycle shape.
        Rhythm::VentricularFibrillation => {
            (rng.gen::<f32>() - 0.5) * (amp.height * 0.5)
        }
        // Wide regular complexes, no P wave, no separate T wave.
        Rhythm::VentricularTachycardia => {
            if t >= 0.0 && t < 15.0 {
                let sine = ((t as f32 / 15.0) * PI).sin();
                -sine * (amp.height * 0.4)
            } else {
                0.0
            }
        }
        _ => {
            let mut offset = pqrst_offset(t, rhythm, amp);
            // Fibrillatory baseline instead of organized atrial activity.
            if rhythm == Rhythm::AtrialFibrillation {
                offset += (rng.gen::<f32>() - 0.5) * 8.0;
            }
            offset
        }
    }
}

/// The shared P-QRS-T phase table with per-rhythm segment overrides.
fn pqrst_offset(t: f64, rhythm: Rhythm, amp: &Amplitudes) -> f32 {
    let peaked_t = rhythm == Rhythm::PeakedTWaves;
    let st_elevation = rhythm == Rhythm::StElevation;
    let afib = rhythm == Rhythm::AtrialFibrillation;

    if t > 0.0 && t < 6.0 {
        // P wave, absent in AFib.
        if afib {
            0.0
        } else {
            -amp.p
        }
    } else if t >= 8.0 && t < 10.0 {
        amp.p * 2.0 // Q
    } else if t >= 10.0 && t < 13.0 {
        -amp.qrs // R
    } else if t >= 13.0 && t < 16.0 {
        if st_elevation {
            -amp.qrs * 0.3
        } else {
            amp.qrs * 0.25 // S
        }
    } else if t >= 16.0 && t < 22.0 {
        if st_elevation {
            -amp.qrs * 0.25
        } else {
            0.0 // isoelectric ST segment
        }
    } else if t >= 22.0 && t < 38.0 {
        let envelope = (((t - 22.0) as f32 / 16.0) * PI).sin();
        if peaked_t {
            -envelope * (amp.height * 0.35)
        } else if st_elevation {
            -amp.t * 1.5
        } else {
            -envelope * amp.t
        }
    } else {
        0.0
    }
}

/// Universal ±1 px movement-artifact noise, applied to every rhythm after
/// the cycle offset.
pub fn artifact_jitter(rng: &mut impl Rng) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const H: f32 = 400.0;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_sinus_r_wave_amplitude() {
        let amp = Amplitudes::for_height(H);
        let y = cycle_offset(11.0, Rhythm::Sinus, &amp, &mut rng());
        assert!((y + amp.qrs).abs() < 1e-4, "R wave should hit -qrs, got {}", y);
    }

    #[test]
    fn test_sinus_p_wave_amplitude() {
        let amp = Amplitudes::for_height(H);
        let y = cycle_offset(2.0, Rhythm::Sinus, &amp, &mut rng());
        assert!((y + amp.p).abs() < 1e-4, "P wave should hit -p, got {}", y);
    }

    #[test]
    fn test_afib_suppresses_p_wave() {
        let amp = Amplitudes::for_height(H);
        // AFib adds +-4 of fibrillatory noise; in the P window the sinus
        // table would sit at -16 for H=400, so the sign distinguishes them.
        let mut r = rng();
        for _ in 0..100 {
            let y = cycle_offset(2.0, Rhythm::AtrialFibrillation, &amp, &mut r);
            assert!(y.abs() <= 4.0 + 1e-4, "AFib P window should be noise only, got {}", y);
        }
    }

    #[test]
    fn test_st_elevation_segments() {
        let amp = Amplitudes::for_height(H);
        let mut r = rng();
        let st = cycle_offset(18.0, Rhythm::StElevation, &amp, &mut r);
        assert!((st + amp.qrs * 0.25).abs() < 1e-4, "ST segment should be elevated");
        let s = cycle_offset(14.0, Rhythm::StElevation, &amp, &mut r);
        assert!((s + amp.qrs * 0.3).abs() < 1e-4, "J point should be elevated");
        let t = cycle_offset(30.0, Rhythm::StElevation, &amp, &mut r);
        assert!((t + amp.t * 1.5).abs() < 1e-4, "T should be flat-elevated");
    }

    #[test]
    fn test_peaked_t_reaches_full_height() {
        let amp = Amplitudes::for_height(H);
        let mut r = rng();
        // Peak of the half-sine lands mid-window at t = 30.
        let y = cycle_offset(30.0, Rhythm::PeakedTWaves, &amp, &mut r);
        assert!((y + H * 0.35).abs() < 1e-3, "peaked T should reach -0.35H, got {}", y);
    }

    #[test]
    fn test_vt_wide_complex_bounds() {
        let amp = Amplitudes::for_height(H);
        let mut r = rng();
        let peak = cycle_offset(7.5, Rhythm::VentricularTachycardia, &amp, &mut r);
        assert!((peak + H * 0.4).abs() < 1e-3, "VT peak should reach -0.4H");
        let quiet = cycle_offset(20.0, Rhythm::VentricularTachycardia, &amp, &mut r);
        assert_eq!(quiet, 0.0, "VT should be flat outside the complex");
    }

    #[test]
    fn test_vf_offsets_bounded() {
        let amp = Amplitudes::for_height(H);
        let mut r = rng();
        for _ in 0..1000 {
            let y = cycle_offset(0.0, Rhythm::VentricularFibrillation, &amp, &mut r);
            assert!(
                y.abs() <= H * 0.25,
                "VF offset {} should stay within +-0.25H",
                y
            );
        }
    }

    #[test]
    fn test_artifact_jitter_bounded() {
        let mut r = rng();
        for _ in 0..1000 {
            let j = artifact_jitter(&mut r);
            assert!(j.abs() <= 1.0, "artifact jitter {} out of +-1", j);
        }
    }
}
