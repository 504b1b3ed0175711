//! Delay line with fixed and fractional-offset reads.
//!
//! The [`DelayLine`] is the foundation of every topology in this workspace:
//! allpass diffusers, reverb tank lines and the FDN body all own one. It is
//! an append-only ring buffer: `push` writes and advances a wrapping cursor,
//! reads address samples *behind* the cursor, either at an integer offset
//! ([`DelayLine::pop_fixed`]) or linearly interpolated between the two
//! integer neighbours ([`DelayLine::read_fractional`]) for modulated delay
//! targets.
//!
//! # Read conventions
//!
//! Offset 0 is the most recently pushed sample. Bounds validation is the
//! caller's responsibility: engines clamp delay targets to
//! [`DelayLine::max_delay`] before they reach the hot path, and the reads
//! only `debug_assert` the precondition.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Circular-buffer delay line (heap-allocated once, never reallocates).
///
/// # Example
///
/// ```rust
/// use resono_core::DelayLine;
///
/// // sized for 93 ms at 48 kHz
/// let mut line = DelayLine::new((0.093 * 48000.0) as usize);
/// line.push(1.0);
/// assert_eq!(line.pop_fixed(0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line able to serve reads up to `max_delay_samples`.
    ///
    /// Two guard samples are added so a fractional read at the maximum
    /// offset still has an older neighbour to interpolate against.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "delay capacity must be > 0");
        Self {
            buffer: vec![0.0; max_delay_samples + 2],
            write_pos: 0,
        }
    }

    /// Create a delay line from sample rate and maximum delay time in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Write a sample and advance the cursor (wrapping). Real-time safe.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read the sample written exactly `delay_samples` pushes ago.
    ///
    /// Offset 0 is the most recent push. Precondition: `delay_samples <=
    /// max_delay()`.
    #[inline]
    pub fn pop_fixed(&self, delay_samples: usize) -> f32 {
        debug_assert!(delay_samples <= self.max_delay());

        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - delay_samples - 1) % len;
        self.buffer[read_pos]
    }

    /// Read at a fractional offset with linear interpolation.
    ///
    /// Interpolates between the samples at `floor(delay)` and
    /// `floor(delay) + 1` pushes ago, so continuously swept delay targets
    /// produce a continuous output. Precondition: `0 <= delay_samples <=
    /// max_delay()`.
    #[inline]
    pub fn read_fractional(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);
        debug_assert!(delay_samples <= self.max_delay() as f32);

        let len = self.buffer.len();
        let delay_int = delay_samples as usize;
        let frac = delay_samples - delay_int as f32;

        let read_pos = (self.write_pos + len - delay_int - 1) % len;
        let older_pos = (read_pos + len - 1) % len;

        let a = self.buffer[read_pos];
        let b = self.buffer[older_pos];
        a + (b - a) * frac
    }

    /// Zero the buffer and rewind the cursor without deallocating.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Largest valid read offset (capacity minus the interpolation guard).
    #[inline]
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 2
    }
}
