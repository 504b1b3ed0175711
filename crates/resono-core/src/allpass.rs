//! Schroeder allpass diffuser.
//!
//! Unity magnitude response, frequency-dependent phase shift. Chained in
//! series with staggered (and per-channel detuned) delays, these smear an
//! impulsive input into a dense, directionless onset before it reaches the
//! recirculating network.
//!
//! The canonical form is used throughout:
//!
//! ```text
//! d = delay[n - D]
//! w = x + g·d      (pushed into the delay)
//! y = d - g·w
//! ```

use crate::DelayLine;
use crate::flush_denormal;

/// Maximum stable diffusion gain. Kept well below the theoretical |g| < 1
/// bound so cascaded stages stay unconditionally stable.
pub const MAX_DIFFUSION_GAIN: f32 = 0.85;

/// Schroeder allpass stage for reverb diffusion.
///
/// Owns one [`DelayLine`]; stateless beyond it. The nominal delay is set in
/// samples (fractional values allowed) and must stay within the capacity
/// declared at construction.
///
/// # Example
///
/// ```rust
/// use resono_core::AllpassDiffuser;
///
/// let mut ap = AllpassDiffuser::new(600);
/// ap.set_delay(576.0);
/// ap.set_gain(0.75);
/// let y = ap.process(1.0);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct AllpassDiffuser {
    delay: DelayLine,
    delay_samples: f32,
    gain: f32,
}

impl AllpassDiffuser {
    /// Create a diffuser able to serve delays up to `max_delay_samples`.
    pub fn new(max_delay_samples: usize) -> Self {
        let delay = DelayLine::new(max_delay_samples.max(2));
        let delay_samples = delay.max_delay() as f32;
        Self {
            delay,
            delay_samples,
            gain: 0.5,
        }
    }

    /// Set the nominal delay in samples. Clamped to [1, capacity].
    pub fn set_delay(&mut self, delay_samples: f32) {
        self.delay_samples = delay_samples.clamp(1.0, self.delay.max_delay() as f32);
    }

    /// Current nominal delay in samples.
    pub fn delay(&self) -> f32 {
        self.delay_samples
    }

    /// Set the feedback gain, clamped to [0, 0.85] for guaranteed stability.
    #[inline]
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, MAX_DIFFUSION_GAIN);
    }

    /// Current feedback gain.
    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // The read happens before the push, so w[n-D] sits one sample
        // nearer the cursor than the nominal delay.
        let d = self.delay.read_fractional(self.delay_samples - 1.0);
        let w = input + self.gain * d;
        self.delay.push(flush_denormal(w));
        d - self.gain * w
    }

    /// Zero the internal delay state.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Maximum delay this stage can serve, in samples.
    pub fn capacity(&self) -> usize {
        self.delay.max_delay()
    }
}
