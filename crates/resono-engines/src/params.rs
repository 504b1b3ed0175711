//! Validated reverb control values and their lock-free exchange cell.
//!
//! [`ReverbParameters`] is the control surface shared by both engines.
//! Every field is clamped on write (constructor, setters, [`ReverbParameters
//! ::clamped`]) and never on read, so a stored value is always valid.
//!
//! [`SharedReverbParameters`] is the single-writer/single-reader handoff
//! between a control context and the audio thread: one word-sized atomic
//! per field, Relaxed ordering, snapshotted once per block. Tearing across
//! fields within one block is tolerated by design — each field is
//! independently atomic, not transactionally updated.

use core::sync::atomic::{AtomicU32, Ordering};

/// Valid range for `room_size` (dimensionless scale on the tank delays).
pub const ROOM_SIZE_RANGE: (f32, f32) = (0.25, 1.75);
/// Valid range for `decay_time` in seconds (RT60 target).
pub const DECAY_TIME_RANGE: (f32, f32) = (0.1, 20.0);
/// Valid range for `damping_hz` (feedback lowpass cutoff).
pub const DAMPING_RANGE: (f32, f32) = (500.0, 20000.0);
/// Valid range for `mod_rate_hz` (tank modulation LFO rate).
pub const MOD_RATE_RANGE: (f32, f32) = (0.05, 5.0);
/// Valid range for `mod_depth` (normalized modulation amount).
pub const MOD_DEPTH_RANGE: (f32, f32) = (0.0, 1.0);
/// Valid range for `pre_delay_ms`.
pub const PRE_DELAY_RANGE: (f32, f32) = (0.0, 200.0);
/// Valid range for `mix` (dry/wet crossfade).
pub const MIX_RANGE: (f32, f32) = (0.0, 1.0);

/// Control values shared by the Hall and Plate engines.
///
/// Fields are plain `f32`s; validity is maintained by clamping at every
/// write seam. Copy the struct into an engine with
/// `ReverbEngine::set_parameters` — engines keep their own clamped copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Scale on the topology's nominal delay times, 0.25 to 1.75.
    pub room_size: f32,
    /// RT60 decay target in seconds, 0.1 to 20.
    pub decay_time: f32,
    /// Feedback damping cutoff in Hz, 500 to 20000.
    pub damping_hz: f32,
    /// Delay modulation rate in Hz, 0.05 to 5.
    pub mod_rate_hz: f32,
    /// Delay modulation depth, 0 to 1.
    pub mod_depth: f32,
    /// Pre-delay ahead of the diffuse field in milliseconds, 0 to 200.
    pub pre_delay_ms: f32,
    /// Dry/wet crossfade, 0 (dry) to 1 (wet).
    pub mix: f32,
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 1.0,
            decay_time: 2.0,
            damping_hz: 20000.0,
            mod_rate_hz: 0.35,
            mod_depth: 0.0,
            pre_delay_ms: 0.0,
            mix: 0.5,
        }
    }
}

#[inline]
fn clamp_to(value: f32, range: (f32, f32)) -> f32 {
    // NaN falls through to the lower bound rather than propagating.
    if value.is_nan() {
        range.0
    } else {
        value.clamp(range.0, range.1)
    }
}

impl ReverbParameters {
    /// Return a copy with every field clamped to its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            room_size: clamp_to(self.room_size, ROOM_SIZE_RANGE),
            decay_time: clamp_to(self.decay_time, DECAY_TIME_RANGE),
            damping_hz: clamp_to(self.damping_hz, DAMPING_RANGE),
            mod_rate_hz: clamp_to(self.mod_rate_hz, MOD_RATE_RANGE),
            mod_depth: clamp_to(self.mod_depth, MOD_DEPTH_RANGE),
            pre_delay_ms: clamp_to(self.pre_delay_ms, PRE_DELAY_RANGE),
            mix: clamp_to(self.mix, MIX_RANGE),
        }
    }
}

/// Lock-free parameter cell for control-thread → audio-thread handoff.
///
/// Each field is stored as an `f32` bit pattern in an [`AtomicU32`].
/// The writer calls [`store`](Self::store); the audio thread calls
/// [`load`](Self::load) once per block and works from the snapshot.
///
/// No locks, no allocation, no ordering stronger than Relaxed: parameter
/// changes take effect with block granularity, never mid-block.
#[derive(Debug)]
pub struct SharedReverbParameters {
    room_size: AtomicU32,
    decay_time: AtomicU32,
    damping_hz: AtomicU32,
    mod_rate_hz: AtomicU32,
    mod_depth: AtomicU32,
    pre_delay_ms: AtomicU32,
    mix: AtomicU32,
}

impl Default for SharedReverbParameters {
    /// A cell holding the default parameter values. Deriving this would
    /// zero-initialize the atomics and leak out-of-range fields to readers.
    fn default() -> Self {
        Self::new(ReverbParameters::default())
    }
}

impl SharedReverbParameters {
    /// Create a cell holding the given (clamped) values.
    pub fn new(params: ReverbParameters) -> Self {
        let cell = Self {
            room_size: AtomicU32::new(0),
            decay_time: AtomicU32::new(0),
            damping_hz: AtomicU32::new(0),
            mod_rate_hz: AtomicU32::new(0),
            mod_depth: AtomicU32::new(0),
            pre_delay_ms: AtomicU32::new(0),
            mix: AtomicU32::new(0),
        };
        cell.store(params);
        cell
    }

    /// Publish a full parameter set. Values are clamped before storing so
    /// readers can never observe an out-of-range field.
    pub fn store(&self, params: ReverbParameters) {
        let p = params.clamped();
        self.room_size.store(p.room_size.to_bits(), Ordering::Relaxed);
        self.decay_time.store(p.decay_time.to_bits(), Ordering::Relaxed);
        self.damping_hz.store(p.damping_hz.to_bits(), Ordering::Relaxed);
        self.mod_rate_hz.store(p.mod_rate_hz.to_bits(), Ordering::Relaxed);
        self.mod_depth.store(p.mod_depth.to_bits(), Ordering::Relaxed);
        self.pre_delay_ms.store(p.pre_delay_ms.to_bits(), Ordering::Relaxed);
        self.mix.store(p.mix.to_bits(), Ordering::Relaxed);
    }

    /// Snapshot the current values. Intended to be called once per block.
    pub fn load(&self) -> ReverbParameters {
        ReverbParameters {
            room_size: f32::from_bits(self.room_size.load(Ordering::Relaxed)),
            decay_time: f32::from_bits(self.decay_time.load(Ordering::Relaxed)),
            damping_hz: f32::from_bits(self.damping_hz.load(Ordering::Relaxed)),
            mod_rate_hz: f32::from_bits(self.mod_rate_hz.load(Ordering::Relaxed)),
            mod_depth: f32::from_bits(self.mod_depth.load(Ordering::Relaxed)),
            pre_delay_ms: f32::from_bits(self.pre_delay_ms.load(Ordering::Relaxed)),
            mix: f32::from_bits(self.mix.load(Ordering::Relaxed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let p = ReverbParameters::default();
        assert_eq!(p, p.clamped());
    }

    #[test]
    fn test_clamp_out_of_range() {
        let p = ReverbParameters {
            room_size: 5.0,
            decay_time: -1.0,
            damping_hz: 100.0,
            mod_rate_hz: 50.0,
            mod_depth: 2.0,
            pre_delay_ms: 1000.0,
            mix: -0.5,
        }
        .clamped();

        assert_eq!(p.room_size, 1.75);
        assert_eq!(p.decay_time, 0.1);
        assert_eq!(p.damping_hz, 500.0);
        assert_eq!(p.mod_rate_hz, 5.0);
        assert_eq!(p.mod_depth, 1.0);
        assert_eq!(p.pre_delay_ms, 200.0);
        assert_eq!(p.mix, 0.0);
    }

    #[test]
    fn test_clamp_nan_to_lower_bound() {
        let p = ReverbParameters {
            decay_time: f32::NAN,
            ..ReverbParameters::default()
        }
        .clamped();
        assert_eq!(p.decay_time, DECAY_TIME_RANGE.0);
    }

    #[test]
    fn test_default_cell_holds_default_values() {
        let cell = SharedReverbParameters::default();
        let loaded = cell.load();
        assert_eq!(loaded, ReverbParameters::default());
        assert_eq!(loaded, loaded.clamped());
    }

    #[test]
    fn test_shared_roundtrip() {
        let cell = SharedReverbParameters::new(ReverbParameters::default());
        let mut p = ReverbParameters::default();
        p.mix = 0.75;
        p.decay_time = 7.5;
        cell.store(p);
        assert_eq!(cell.load(), p);
    }

    #[test]
    fn test_shared_store_clamps() {
        let cell = SharedReverbParameters::default();
        cell.store(ReverbParameters {
            room_size: 99.0,
            ..ReverbParameters::default()
        });
        assert_eq!(cell.load().room_size, 1.75);
    }
}
