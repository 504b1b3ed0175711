//! Property-based tests for resono-core DSP primitives.
//!
//! Exercises delay-line integrity, allpass stability and damping-chain
//! boundedness over randomized configurations.

use proptest::prelude::*;
use resono_core::{AllpassDiffuser, DampingChain, DelayLine, OnePoleLowpass, QuadratureLfo};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// pop_fixed returns exactly what was pushed that many samples ago,
    /// for any capacity and any in-range offset.
    #[test]
    fn delay_line_recall(
        capacity in 2usize..4096,
        offset_t in 0.0f32..1.0f32,
    ) {
        let mut line = DelayLine::new(capacity);
        let offset = ((capacity - 1) as f32 * offset_t) as usize;

        // Push a recognizable ramp longer than the buffer.
        let total = capacity * 2 + 7;
        for i in 0..total {
            line.push(i as f32);
        }
        let expected = (total - 1 - offset) as f32;
        prop_assert_eq!(line.pop_fixed(offset), expected);
    }

    /// Fractional reads stay between their two integer neighbours.
    #[test]
    fn fractional_read_bounded_by_neighbours(
        delay in 1.0f32..100.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut line = DelayLine::new(128);
        for &x in &input {
            line.push(x);
        }
        for &x in &input {
            line.push(x);
        }

        let lo = line.pop_fixed(delay as usize);
        let hi = line.pop_fixed(delay as usize + 1);
        let (min, max) = if lo < hi { (lo, hi) } else { (hi, lo) };
        let y = line.read_fractional(delay);
        prop_assert!(y >= min - 1e-6 && y <= max + 1e-6);
    }

    /// Any gain in the clamped range keeps the allpass finite and bounded
    /// over sustained random input.
    #[test]
    fn allpass_stability(
        gain in 0.0f32..1.0f32,
        delay in 2.0f32..500.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut ap = AllpassDiffuser::new(512);
        ap.set_delay(delay);
        ap.set_gain(gain);

        for _ in 0..32 {
            for &x in &input {
                let y = ap.process(x);
                prop_assert!(y.is_finite());
                prop_assert!(y.abs() < 16.0, "allpass output {y} unbounded");
            }
        }
    }

    /// The damping chain never amplifies: output magnitude stays within the
    /// input bound for any cutoff.
    #[test]
    fn damping_chain_bounded(
        damping in 500.0f32..20000.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut chain = DampingChain::new(48000.0, damping);
        chain.enable_highpass(24.0);

        for _ in 0..16 {
            for &x in &input {
                let y = chain.process(x);
                prop_assert!(y.is_finite());
                prop_assert!(y.abs() <= 2.0);
            }
        }
    }

    /// One-pole lowpass output is a convex combination of state and input,
    /// so it can never leave the input range.
    #[test]
    fn one_pole_stays_in_input_range(
        cutoff in 20.0f32..20000.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut lp = OnePoleLowpass::new(48000.0, cutoff);
        for &x in &input {
            let y = lp.process(x);
            prop_assert!((-1.0..=1.0).contains(&y));
        }
    }

    /// LFO outputs stay within ±depth for any rate in the model's range.
    #[test]
    fn lfo_bounded_by_depth(
        rate in 0.05f32..5.0f32,
        depth in 0.0f32..1.0f32,
    ) {
        let mut lfo = QuadratureLfo::new(48000.0, rate);
        lfo.set_depth(depth);
        for _ in 0..4096 {
            let out = lfo.tick();
            prop_assert!(out.normal.abs() <= depth + 1e-5);
            prop_assert!(out.quadrature.abs() <= depth + 1e-5);
        }
    }
}
