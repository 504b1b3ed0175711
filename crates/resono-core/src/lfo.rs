//! Quadrature low-frequency oscillator for delay modulation.
//!
//! Reverb tanks read their delay lines at slowly wandering offsets to keep
//! the recirculating network from settling into audibly discrete echoes.
//! The oscillator emits a correlated pair per sample — the primary sine and
//! its 90°-shifted twin — so the two stereo channels (or alternate FDN
//! lines) wander together without being identical.

use core::f32::consts::TAU;
use libm::{cosf, sinf};

/// One (normal, quadrature) output pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureOutput {
    /// `depth · sin θ`
    pub normal: f32,
    /// `depth · sin(θ + π/2)`
    pub quadrature: f32,
}

/// Sine LFO with a quadrature tap.
///
/// The phase accumulator advances by `2π·rate/sample_rate` per tick and
/// wraps at `2π`. Depth scales both outputs; rate and depth are control
/// values, not audio, and may be changed at block rate.
///
/// # Example
///
/// ```rust
/// use resono_core::QuadratureLfo;
///
/// let mut lfo = QuadratureLfo::new(48000.0, 0.5);
/// lfo.set_depth(1.0);
/// let out = lfo.tick();
/// assert!(out.normal.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct QuadratureLfo {
    phase: f32,
    phase_inc: f32,
    rate_hz: f32,
    depth: f32,
    sample_rate: f32,
}

impl QuadratureLfo {
    /// Create an LFO at the given sample rate and frequency (Hz).
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            phase_inc: 0.0,
            rate_hz,
            depth: 1.0,
            sample_rate,
        };
        lfo.recalculate_increment();
        lfo
    }

    /// Set the oscillation rate in Hz.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate_hz = rate_hz;
        self.recalculate_increment();
    }

    /// Current rate in Hz.
    pub fn rate(&self) -> f32 {
        self.rate_hz
    }

    /// Set the output depth (linear scale applied to both taps).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    /// Current depth.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Update the sample rate, preserving the configured rate in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_increment();
    }

    /// Rewind the phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Produce the next output pair and advance the phase by one sample.
    #[inline]
    pub fn tick(&mut self) -> QuadratureOutput {
        let out = QuadratureOutput {
            normal: self.depth * sinf(self.phase),
            quadrature: self.depth * cosf(self.phase),
        };
        self.phase += self.phase_inc;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        out
    }

    fn recalculate_increment(&mut self) {
        self.phase_inc = TAU * self.rate_hz / self.sample_rate;
    }
}
