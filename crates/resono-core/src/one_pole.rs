//! One-pole filters for feedback-path damping.
//!
//! Both filters derive their coefficient the same way:
//!
//! ```text
//! g = exp(-2π · cutoff / sample_rate)
//! ```
//!
//! Lowpass: `y[n] = g·y[n-1] + (1-g)·x[n]` — 6 dB/octave high-frequency
//! rolloff, one multiply-add per sample. Highpass: `y[n] = g·(y[n-1] + x[n]
//! - x[n-1])` — removes DC and sub-bass buildup from recirculating loops.
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio
//! Applications", Section: One-Pole Filter.

use crate::flush_denormal;
use libm::expf;

#[inline]
fn one_pole_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
    expf(-core::f32::consts::TAU * cutoff_hz / sample_rate)
}

/// One-pole (6 dB/oct) lowpass.
///
/// # Invariants
///
/// - `coeff` stays in [0, 1) for any positive cutoff, so the filter is
///   unconditionally stable
/// - state is flushed to zero below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePoleLowpass {
    state: f32,
    coeff: f32,
    cutoff_hz: f32,
    sample_rate: f32,
}

impl OnePoleLowpass {
    /// Create a lowpass with the given sample rate and cutoff (Hz).
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            cutoff_hz,
            sample_rate,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the cutoff frequency and recompute the coefficient.
    /// Filter state is kept, so retuning never clicks.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.recalculate_coeff();
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    /// Update the sample rate and recompute the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.coeff * self.state + (1.0 - self.coeff) * input);
        self.state
    }

    /// Zero the filter state.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate_coeff(&mut self) {
        self.coeff = one_pole_coeff(self.cutoff_hz, self.sample_rate);
    }
}

/// One-pole (6 dB/oct) highpass.
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    state_y: f32,
    state_x: f32,
    coeff: f32,
    cutoff_hz: f32,
    sample_rate: f32,
}

impl OnePoleHighpass {
    /// Create a highpass with the given sample rate and cutoff (Hz).
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            state_y: 0.0,
            state_x: 0.0,
            coeff: 0.0,
            cutoff_hz,
            sample_rate,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the cutoff frequency and recompute the coefficient.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.recalculate_coeff();
    }

    /// Update the sample rate and recompute the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state_y = flush_denormal(self.coeff * (self.state_y + input - self.state_x));
        self.state_x = input;
        self.state_y
    }

    /// Zero the filter state.
    pub fn reset(&mut self) {
        self.state_y = 0.0;
        self.state_x = 0.0;
    }

    fn recalculate_coeff(&mut self) {
        self.coeff = one_pole_coeff(self.cutoff_hz, self.sample_rate);
    }
}
