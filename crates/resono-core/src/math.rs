//! Mathematical utility functions for the reverb DSP path.
//!
//! Allocation-free, `no_std`-friendly helpers shared by the delay, filter
//! and engine code: denormal flushing for recirculating state, dB/linear
//! conversions, and time conversions.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use resono_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored to -120 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    if linear <= 1e-6 {
        -120.0
    } else {
        logf(linear) * FACTOR
    }
}

/// Convert milliseconds to samples at the given sample rate.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Convert samples to milliseconds at the given sample rate.
#[inline]
pub fn samples_to_ms(samples: f32, sample_rate: f32) -> f32 {
    samples * 1000.0 / sample_rate
}

/// Flush denormal (subnormal) float values to zero.
///
/// Feedback loops decay toward zero and eventually produce subnormal
/// values, which incur a massive CPU penalty on most architectures.
/// Applied to every recirculating state write.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix` but uses one fewer multiply:
/// `dry + (wet - dry) * mix`. At `mix == 0` the result is bit-identical to
/// `dry`, which the engines rely on for exact bypass.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Sum a stereo pair to mono with -6 dB pan law.
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left + right) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!((back - original).abs() < 1e-4);
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert_eq!(linear_to_db(0.0), -120.0);
        assert_eq!(linear_to_db(-1.0), -120.0);
    }

    #[test]
    fn test_ms_samples_roundtrip() {
        let ms = 93.0;
        let samples = ms_to_samples(ms, 48000.0);
        assert!((samples_to_ms(samples, 48000.0) - ms).abs() < 1e-4);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
    }

    #[test]
    fn test_wet_dry_mix_endpoints() {
        let dry = 0.123456;
        let wet = -0.654321;
        assert_eq!(wet_dry_mix(dry, wet, 0.0), dry);
        assert_eq!(wet_dry_mix(dry, wet, 1.0), wet);
    }

    #[test]
    fn test_mono_sum() {
        assert_eq!(mono_sum(1.0, 1.0), 1.0);
        assert_eq!(mono_sum(1.0, -1.0), 0.0);
    }
}
