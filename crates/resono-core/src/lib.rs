//! Resono Core - DSP primitives for algorithmic reverberation
//!
//! The leaf components every reverb topology in this workspace is built
//! from, designed for real-time processing with zero allocation in the
//! audio path.
//!
//! # Components
//!
//! - [`DelayLine`] - ring buffer with integer and fractional-offset reads
//! - [`AllpassDiffuser`] - Schroeder allpass stage for diffusion
//! - [`QuadratureLfo`] - correlated sine/cosine modulation source
//! - [`OnePoleLowpass`] / [`OnePoleHighpass`] - feedback-path filters
//! - [`DampingChain`] - lowpass + highpass + psychoacoustic smoothing
//!   cascade driven by a single damping control
//!
//! # Utilities
//!
//! [`flush_denormal`], [`db_to_linear`], [`linear_to_db`],
//! [`ms_to_samples`], [`wet_dry_mix`], [`mono_sum`].
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (with `alloc`); disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! resono-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: buffers are sized at construction and never grow
//! - **Clamp, don't fail**: invalid control values are clamped at the seam,
//!   so the hot path carries no error channel
//! - **Denormal-proof**: every recirculating state write is flushed

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod damping;
pub mod delay;
pub mod lfo;
pub mod math;
pub mod one_pole;

pub use allpass::{AllpassDiffuser, MAX_DIFFUSION_GAIN};
pub use damping::{DampingChain, PSYCHO_CUTOFF_MAX_HZ, PSYCHO_CUTOFF_MIN_HZ, map_psycho_cutoff};
pub use delay::DelayLine;
pub use lfo::{QuadratureLfo, QuadratureOutput};
pub use math::{
    db_to_linear, flush_denormal, linear_to_db, mono_sum, ms_to_samples, samples_to_ms,
    wet_dry_mix,
};
pub use one_pole::{OnePoleHighpass, OnePoleLowpass};
