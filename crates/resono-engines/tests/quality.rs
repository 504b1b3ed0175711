//! Deterministic quality checks for the Hall and Plate engines.
//!
//! Scenario-style tests with fixed inputs and thresholds: decay landing at
//! the configured RT60, stereo decorrelation of the full-wet tail, and the
//! block-granular lock-free parameter handoff.

use resono_engines::{
    HallEngine, PlateEngine, ReverbEngine, ReverbKind, ReverbParameters, SharedReverbParameters,
};

const SAMPLE_RATE: f64 = 48000.0;

/// Render a stereo impulse response of the given length.
fn impulse_response(
    engine: &mut dyn ReverbEngine,
    num_samples: usize,
) -> (Vec<f32>, Vec<f32>) {
    let mut left = vec![0.0f32; num_samples];
    let mut right = vec![0.0f32; num_samples];
    left[0] = 1.0;
    right[0] = 1.0;
    engine.process_block(&mut [&mut left, &mut right]);
    (left, right)
}

fn peak(signal: &[f32]) -> f32 {
    signal.iter().copied().map(f32::abs).fold(0.0f32, f32::max)
}

fn rms(signal: &[f32]) -> f64 {
    (signal.iter().map(|s| f64::from(s * s)).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Normalized cross-correlation of two equal-length signals.
fn correlation(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(x * y)).sum();
    let ea: f64 = a.iter().map(|x| f64::from(x * x)).sum();
    let eb: f64 = b.iter().map(|y| f64::from(y * y)).sum();
    dot / (ea * eb).sqrt().max(1e-12)
}

/// Plate at room 1.0, decay 2.0 s, damping 8 kHz, no modulation, full wet:
/// the tail must sit at least 60 dB below its peak by the 2-second mark.
#[test]
fn plate_decay_reaches_minus_60db_at_rt60() {
    let mut engine = PlateEngine::new();
    engine.prepare(SAMPLE_RATE, 512, 2);
    engine.set_parameters(ReverbParameters {
        room_size: 1.0,
        decay_time: 2.0,
        damping_hz: 8000.0,
        mod_depth: 0.0,
        pre_delay_ms: 0.0,
        mix: 1.0,
        ..ReverbParameters::default()
    });

    let (left, _) = impulse_response(&mut engine, 48000 * 2 + 2048);
    let pk = peak(&left[..48000]);
    assert!(pk > 0.0, "impulse must produce a response");

    // 2048-sample window centered on the 2 s mark, against the peak.
    let window = &left[96000 - 1024..96000 + 1024];
    let floor = f64::from(pk) * 0.001;
    let level = rms(window);
    assert!(
        level <= floor,
        "tail at 2 s is {level:.3e}, expected <= {floor:.3e} (-60 dB re peak {pk})"
    );
}

/// The hall's cross-fed common mode decays slower than the nominal RT60,
/// so its contract is looser: 60 dB down within four decay times.
#[test]
fn hall_decay_reaches_minus_60db_within_four_decay_times() {
    let mut engine = HallEngine::new();
    engine.prepare(SAMPLE_RATE, 512, 2);
    engine.set_parameters(ReverbParameters {
        room_size: 1.0,
        decay_time: 1.0,
        damping_hz: 8000.0,
        mod_depth: 0.0,
        mix: 1.0,
        ..ReverbParameters::default()
    });

    let (left, _) = impulse_response(&mut engine, 48000 * 4 + 2048);
    let pk = peak(&left[..48000]);
    let window = &left[192000 - 1024..192000 + 1024];
    assert!(
        rms(window) <= f64::from(pk) * 0.001,
        "hall tail at 4 s not 60 dB down"
    );
}

/// At mix = 1 the output must carry no unprocessed copy of the input.
/// Both topologies put at least one delay line between input and wet
/// output, so the zero-lag correlation against broadband noise stays near
/// zero; a dry leak would push it toward unity.
#[test]
fn full_wet_output_contains_no_dry_copy() {
    // Deterministic LCG noise, zero-mean.
    let mut state = 0x2545f491u32;
    let input: Vec<f32> = (0..48000)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 8) as f32 / 8388608.0 - 1.0
        })
        .collect();

    for kind in [ReverbKind::Hall, ReverbKind::Plate] {
        let mut engine = kind.create();
        engine.prepare(SAMPLE_RATE, 512, 2);
        engine.set_parameters(ReverbParameters {
            mix: 1.0,
            mod_depth: 0.0,
            ..ReverbParameters::default()
        });

        let mut left = input.clone();
        let mut right = input.clone();
        engine.process_block(&mut [&mut left, &mut right]);

        let corr = correlation(&left, &input).abs();
        assert!(
            corr < 0.25,
            "{} full-wet output correlates with dry input: {corr}",
            kind.name()
        );
    }
}

/// Full-wet tails must decorrelate between channels on both engines.
#[test]
fn full_wet_tail_decorrelates() {
    for kind in [ReverbKind::Hall, ReverbKind::Plate] {
        let mut engine = kind.create();
        engine.prepare(SAMPLE_RATE, 512, 2);
        engine.set_parameters(ReverbParameters {
            decay_time: 3.0,
            mix: 1.0,
            ..ReverbParameters::default()
        });

        let mut left = vec![0.0f32; 96000];
        let mut right = vec![0.0f32; 96000];
        left[0] = 1.0;
        right[0] = 1.0;
        engine.process_block(&mut [&mut left, &mut right]);

        let corr = correlation(&left[48000..], &right[48000..]);
        assert!(
            corr < 0.98,
            "{} tail fully correlated: {corr}",
            kind.name()
        );
    }
}

/// Longer decay settings must leave more energy late in the tail.
#[test]
fn decay_time_orders_tail_energy() {
    let tail_energy = |decay: f32| -> f64 {
        let mut engine = PlateEngine::new();
        engine.prepare(SAMPLE_RATE, 512, 2);
        engine.set_parameters(ReverbParameters {
            decay_time: decay,
            mod_depth: 0.0,
            mix: 1.0,
            ..ReverbParameters::default()
        });
        let (left, _) = impulse_response(&mut engine, 96000);
        rms(&left[48000..])
    };

    let short = tail_energy(0.5);
    let long = tail_energy(8.0);
    assert!(
        long > short * 10.0,
        "8 s tail ({long:.3e}) should dwarf 0.5 s tail ({short:.3e})"
    );
}

/// Parameters published through the shared cell take effect at the next
/// block boundary, never retroactively.
#[test]
fn shared_parameters_apply_per_block() {
    let shared = SharedReverbParameters::new(ReverbParameters {
        mix: 0.0,
        ..ReverbParameters::default()
    });

    let mut engine = HallEngine::new();
    engine.prepare(SAMPLE_RATE, 256, 2);

    // Block 1: dry. The engine snapshots the cell before each block.
    engine.set_parameters(shared.load());
    let input: Vec<f32> = (0..256).map(|i| (i as f32 * 0.07).sin() * 0.5).collect();
    let mut left = input.clone();
    let mut right = input.clone();
    engine.process_block(&mut [&mut left, &mut right]);
    assert_eq!(left, input, "mix 0 block must pass through untouched");

    // Control thread publishes full wet; applies from the next block on.
    shared.store(ReverbParameters {
        mix: 1.0,
        ..ReverbParameters::default()
    });
    engine.set_parameters(shared.load());
    let mut left = input.clone();
    let mut right = input.clone();
    engine.process_block(&mut [&mut left, &mut right]);
    assert_ne!(left, input, "mix 1 block must be processed");
}

/// Out-of-range values stored in the shared cell are clamped before any
/// reader can observe them.
#[test]
fn shared_parameters_never_expose_invalid_values() {
    // A freshly defaulted cell must already hold valid values.
    let shared = SharedReverbParameters::default();
    let fresh = shared.load();
    assert_eq!(fresh, fresh.clamped());
    assert_eq!(fresh, ReverbParameters::default());

    shared.store(ReverbParameters {
        room_size: f32::INFINITY,
        decay_time: -5.0,
        damping_hz: f32::NAN,
        ..ReverbParameters::default()
    });

    let loaded = shared.load();
    assert_eq!(loaded, loaded.clamped());
}
