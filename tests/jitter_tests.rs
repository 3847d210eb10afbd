/// Systematic tests: vitals jitter model
///
/// The displayed vitals must random-walk only within the resnap band
/// around the authoritative baseline, SpO2 must never leave [0, 100], and
/// a fresh authoritative snapshot must wipe all accumulated drift.
use rand::rngs::StdRng;
use rand::SeedableRng;
use systole::jitter::{JitterModel, HR_FACTOR, O2_FACTOR, RR_FACTOR};
use systole::vitals::{DisplayedVitals, Rhythm, Vitals};

fn baseline(hr: u32, o2: u32) -> Vitals {
    Vitals {
        heart_rate: hr,
        oxygen_sat: o2,
        ..Vitals::default()
    }
}

#[test]
fn test_oxygen_sat_in_range_for_any_baseline() {
    for (seed, o2) in [(1u64, 0u32), (2, 1), (3, 50), (4, 93), (5, 99), (6, 100)] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut model = JitterModel::new(baseline(80, o2));
        for tick in 0..3000 {
            model.tick(&mut rng);
            let shown = model.displayed().oxygen_sat;
            assert!(
                (0.0..=100.0).contains(&shown),
                "seed {} baseline {}: SpO2 {} out of range at tick {}",
                seed,
                o2,
                shown,
                tick
            );
        }
    }
}

#[test]
fn test_walk_bounded_by_resnap_band() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut model = JitterModel::new(baseline(72, 97));
        for _ in 0..2000 {
            model.tick(&mut rng);
            let d = model.displayed();
            // Worst accepted candidate is 2*factor out; display rounding
            // adds at most half a unit.
            assert!((d.heart_rate - 72.0).abs() <= 2.0 * HR_FACTOR + 0.5);
            assert!((d.resp_rate - 16.0).abs() <= 2.0 * RR_FACTOR + 0.5);
            assert!((d.oxygen_sat - 97.0).abs() <= 2.0 * O2_FACTOR + 0.5);
        }
    }
}

#[test]
fn test_authoritative_update_is_exact_reset() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut model = JitterModel::new(baseline(80, 97));
    for _ in 0..100 {
        model.tick(&mut rng);
    }

    let update = Vitals {
        heart_rate: 134,
        systolic_bp: 82,
        diastolic_bp: 54,
        resp_rate: 28,
        oxygen_sat: 88,
        temperature: 38.9,
        rhythm: Rhythm::SinusTachycardia,
    };
    model.reset_baseline(update);

    // No blending with the drifted values: the projection equals the new
    // snapshot field for field.
    assert_eq!(
        *model.displayed(),
        DisplayedVitals::from(&update),
        "displayed vitals must equal the new baseline exactly"
    );
    assert_eq!(*model.baseline(), update);
}

#[test]
fn test_blood_pressure_never_jittered() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut model = JitterModel::new(baseline(80, 97));
    for _ in 0..1000 {
        model.tick(&mut rng);
        assert_eq!(model.displayed().systolic_bp, 120);
        assert_eq!(model.displayed().diastolic_bp, 80);
    }
}
