//! The engine contract and the versioned topology selector.
//!
//! Hosts drive a reverb exclusively through [`ReverbEngine`]:
//! `prepare → (process_block | set_parameters)* → reset`. The trait is
//! object-safe so slots can hold `Box<dyn ReverbEngine>` and swap
//! topologies at runtime via [`ReverbKind`].

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::boxed::Box;

use crate::hall::HallEngine;
use crate::params::ReverbParameters;
use crate::plate::PlateEngine;

/// Contract between a host and a reverb engine.
///
/// # Lifecycle
///
/// [`prepare`](Self::prepare) must be called before anything else and may
/// be called again (sample-rate change); it re-derives every coefficient
/// and resizes internal buffers. [`reset`](Self::reset) zeroes delay-line
/// and filter state without deallocating. Neither is safe to call
/// concurrently with [`process_block`](Self::process_block); parameter
/// exchange is the only cross-thread interaction the engines support (see
/// [`SharedReverbParameters`](crate::SharedReverbParameters)).
///
/// # Real-time guarantees
///
/// After `prepare`, `process_block` performs no allocation, takes no locks
/// and never resizes a buffer. Parameters are read once at block start;
/// changes never take effect mid-block.
pub trait ReverbEngine {
    /// Allocate and size all internal state for the given stream format.
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize, num_channels: usize);

    /// Zero all delay-line and filter state, keeping allocations.
    fn reset(&mut self);

    /// Clamp and store a new parameter set, recomputing derived
    /// coefficients. Idempotent for unchanged values.
    fn set_parameters(&mut self, params: ReverbParameters);

    /// The last-applied, clamped parameter values.
    fn parameters(&self) -> ReverbParameters;

    /// Process `channels` in place. One or two channels are supported; a
    /// mono stream feeds both sides of the stereo topology and receives
    /// the left output. All channel slices must have the same length
    /// (checked by `debug_assert` only).
    fn process_block(&mut self, channels: &mut [&mut [f32]]);
}

/// The two fixed reverb topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbKind {
    /// Serial diffusion into a cross-fed pair of modulated tank lines.
    #[default]
    Hall,
    /// Pre-delay, diffusion, and a 4-line orthogonal feedback delay network.
    Plate,
}

impl ReverbKind {
    /// Construct a boxed engine of this kind with default parameters.
    /// The engine still needs [`ReverbEngine::prepare`] before use.
    pub fn create(self) -> Box<dyn ReverbEngine + Send> {
        match self {
            ReverbKind::Hall => Box::new(HallEngine::new()),
            ReverbKind::Plate => Box::new(PlateEngine::new()),
        }
    }

    /// Stable lowercase name, for CLI flags and logs.
    pub fn name(self) -> &'static str {
        match self {
            ReverbKind::Hall => "hall",
            ReverbKind::Plate => "plate",
        }
    }
}
