//! Feedback-path damping chain.
//!
//! Models frequency-dependent energy loss in a recirculating reverb loop as
//! a cascade of three one-pole stages, all driven by a single damping
//! control (a lowpass cutoff in Hz):
//!
//! 1. main lowpass at the damping cutoff — physical high-frequency loss
//! 2. optional highpass — removes DC/sub-bass buildup in the loop
//! 3. "psychoacoustic" lowpass at a cutoff derived from the same control —
//!    extra HF loss that grows as the room is made darker, suppressing the
//!    metallic ringing dense networks produce beyond what the physical
//!    damping accounts for
//!
//! The chain belongs *inside* the feedback path (never the early/direct
//! path) so its effect compounds once per loop traversal. Stage state
//! persists across parameter changes to avoid clicks; only [`DampingChain::
//! reset`] zeroes it.

use crate::{OnePoleHighpass, OnePoleLowpass};

/// Lower bound of the psychoacoustic smoothing cutoff, in Hz.
pub const PSYCHO_CUTOFF_MIN_HZ: f32 = 400.0;
/// Upper bound of the psychoacoustic smoothing cutoff, in Hz.
pub const PSYCHO_CUTOFF_MAX_HZ: f32 = 16000.0;

/// Map the damping control (cutoff in Hz) onto the psychoacoustic smoothing
/// cutoff in [400, 16000] Hz.
///
/// The damping range [500, 20000] and the psycho range [400, 16000] span
/// the same 40:1 log interval, so the log-domain map is a plain 0.8 ratio.
#[inline]
pub fn map_psycho_cutoff(damping_hz: f32) -> f32 {
    (damping_hz * 0.8).clamp(PSYCHO_CUTOFF_MIN_HZ, PSYCHO_CUTOFF_MAX_HZ)
}

/// One damping element: lowpass → optional highpass → psycho lowpass.
///
/// # Example
///
/// ```rust
/// use resono_core::DampingChain;
///
/// let mut chain = DampingChain::new(48000.0, 8000.0);
/// chain.enable_highpass(24.0);
/// let y = chain.process(1.0);
/// assert!(y < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DampingChain {
    lowpass: OnePoleLowpass,
    highpass: Option<OnePoleHighpass>,
    psycho: OnePoleLowpass,
    sample_rate: f32,
}

impl DampingChain {
    /// Create a chain at the given sample rate and damping cutoff (Hz).
    /// The highpass stage is disabled until [`Self::enable_highpass`].
    pub fn new(sample_rate: f32, damping_hz: f32) -> Self {
        Self {
            lowpass: OnePoleLowpass::new(sample_rate, damping_hz),
            highpass: None,
            psycho: OnePoleLowpass::new(sample_rate, map_psycho_cutoff(damping_hz)),
            sample_rate,
        }
    }

    /// Enable the DC/sub-bass highpass stage at the given cutoff (Hz).
    pub fn enable_highpass(&mut self, cutoff_hz: f32) {
        self.highpass = Some(OnePoleHighpass::new(self.sample_rate, cutoff_hz));
    }

    /// Retune both lowpass stages from the damping control.
    /// State persists so in-flight audio never clicks.
    pub fn set_damping(&mut self, damping_hz: f32) {
        self.lowpass.set_cutoff(damping_hz);
        self.psycho.set_cutoff(map_psycho_cutoff(damping_hz));
    }

    /// Current damping cutoff in Hz.
    pub fn damping(&self) -> f32 {
        self.lowpass.cutoff()
    }

    /// Update the sample rate and recompute every stage coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lowpass.set_sample_rate(sample_rate);
        self.psycho.set_sample_rate(sample_rate);
        if let Some(hp) = &mut self.highpass {
            hp.set_sample_rate(sample_rate);
        }
    }

    /// Filter one sample through the full cascade.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut y = self.lowpass.process(input);
        if let Some(hp) = &mut self.highpass {
            y = hp.process(y);
        }
        self.psycho.process(y)
    }

    /// Zero all stage state.
    pub fn reset(&mut self) {
        self.lowpass.reset();
        self.psycho.reset();
        if let Some(hp) = &mut self.highpass {
            hp.reset();
        }
    }
}
