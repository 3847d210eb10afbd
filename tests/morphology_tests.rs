/// Systematic tests: rhythm morphology
///
/// Verifies the per-rhythm offset-vs-phase-time function against the
/// reference waveform scenarios: P and R wave landmarks for the sinus
/// family, chaotic bounded offsets with no periodicity for ventricular
/// fibrillation, and graceful degradation for unknown rhythm labels.
use rand::rngs::StdRng;
use rand::SeedableRng;
use systole::morphology::{artifact_jitter, cycle_offset, Amplitudes};
use systole::vitals::Rhythm;

const HEIGHT: f32 = 400.0;

/// Normalized autocorrelation of `signal` at `lag`.
fn autocorrelation(signal: &[f32], lag: usize) -> f32 {
    let n = signal.len();
    let mean = signal.iter().sum::<f32>() / n as f32;
    let variance: f32 = signal.iter().map(|v| (v - mean).powi(2)).sum::<f32>();
    if variance == 0.0 {
        return 0.0;
    }
    let covariance: f32 = signal[..n - lag]
        .iter()
        .zip(signal[lag..].iter())
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum();
    covariance / variance
}

/// Synthesize `frames` offsets for a rhythm at hr 80, fps 60, jitter
/// included, as the render loop would.
fn synthesize(rhythm: Rhythm, frames: usize, seed: u64) -> Vec<f32> {
    use systole::beat_clock::BeatClock;
    let amp = Amplitudes::for_height(HEIGHT);
    let mut clock = BeatClock::new(80, 60.0, rhythm.is_irregular());
    let mut rng = StdRng::seed_from_u64(seed);
    (0..frames)
        .map(|_| {
            let t = clock.advance(&mut rng);
            cycle_offset(t, rhythm, &amp, &mut rng) + artifact_jitter(&mut rng)
        })
        .collect()
}

#[test]
fn test_sinus_r_wave_landmark() {
    let amp = Amplitudes::for_height(HEIGHT);
    let mut rng = StdRng::seed_from_u64(0);
    let offset = cycle_offset(11.0, Rhythm::Sinus, &amp, &mut rng);
    let tolerance = HEIGHT * 0.01;
    assert!(
        (offset - (-amp.qrs)).abs() < tolerance,
        "R window offset {} should be -qrsAmplitude {}",
        offset,
        -amp.qrs
    );
}

#[test]
fn test_sinus_p_wave_landmark() {
    let amp = Amplitudes::for_height(HEIGHT);
    let mut rng = StdRng::seed_from_u64(0);
    let offset = cycle_offset(2.0, Rhythm::Sinus, &amp, &mut rng);
    assert!(
        (offset - (-amp.p)).abs() < HEIGHT * 0.01,
        "P window offset {} should be -pAmplitude {}",
        offset,
        -amp.p
    );
}

#[test]
fn test_landmarks_hold_with_universal_jitter() {
    // Movement artifact is +-1 px, well inside the 0.01*H tolerance.
    let amp = Amplitudes::for_height(HEIGHT);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let offset = cycle_offset(11.0, Rhythm::Sinus, &amp, &mut rng) + artifact_jitter(&mut rng);
        assert!(
            (offset - (-amp.qrs)).abs() < HEIGHT * 0.01,
            "jittered R offset {} outside tolerance",
            offset
        );
    }
}

#[test]
fn test_vf_bounded_and_aperiodic() {
    let samples = synthesize(Rhythm::VentricularFibrillation, 1000, 2);
    let bound = HEIGHT * 0.25 + 1.0; // +-0.25H plus movement artifact
    for (i, v) in samples.iter().enumerate() {
        assert!(v.abs() <= bound, "VF sample {} = {} out of bounds", i, v);
    }
    // No periodic structure: autocorrelation stays near zero at every lag
    // that would expose a beat interval.
    for lag in 1..120 {
        let r = autocorrelation(&samples, lag);
        assert!(
            r.abs() < 0.3,
            "VF autocorrelation {} at lag {} suggests periodicity",
            r,
            lag
        );
    }
}

#[test]
fn test_sinus_is_periodic_unlike_vf() {
    // hr 80 at 60 fps: 45-frame interval, 46-frame repetition (the reset
    // frame itself occupies one slot).
    let samples = synthesize(Rhythm::Sinus, 2000, 3);
    let r = autocorrelation(&samples, 46);
    assert!(
        r > 0.9,
        "sinus autocorrelation {} at the cycle period should be strong",
        r
    );
}

#[test]
fn test_vt_has_no_p_or_t_waves() {
    let amp = Amplitudes::for_height(HEIGHT);
    let mut rng = StdRng::seed_from_u64(4);
    // Outside the wide complex the trace is flat at the midline.
    for t in [16.0, 20.0, 25.0, 30.0, 37.0] {
        let offset = cycle_offset(t, Rhythm::VentricularTachycardia, &amp, &mut rng);
        assert_eq!(offset, 0.0, "VT should be flat at t={}", t);
    }
}

#[test]
fn test_unknown_rhythm_uses_sinus_table() {
    let amp = Amplitudes::for_height(HEIGHT);
    let mut rng = StdRng::seed_from_u64(5);
    let unknown = Rhythm::from_label("Junctional Escape");
    let sinus = cycle_offset(11.0, Rhythm::Sinus, &amp, &mut rng);
    let degraded = cycle_offset(11.0, unknown, &amp, &mut rng);
    assert_eq!(sinus, degraded, "unknown labels must fall back to the sinus table");
}

#[test]
fn test_afib_noise_band_outside_complexes() {
    let amp = Amplitudes::for_height(HEIGHT);
    let mut rng = StdRng::seed_from_u64(6);
    // ST window is isoelectric for AFib, so only fibrillatory noise shows.
    for _ in 0..500 {
        let offset = cycle_offset(18.0, Rhythm::AtrialFibrillation, &amp, &mut rng);
        assert!(
            offset.abs() <= 4.0,
            "AFib baseline noise {} should stay within +-4",
            offset
        );
    }
}
