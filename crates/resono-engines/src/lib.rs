//! Resono Engines - Hall and Plate algorithmic reverbs
//!
//! Two fixed stereo topologies built from the [`resono_core`] primitives,
//! driven through one object-safe contract:
//!
//! - [`HallEngine`] - serial diffusion into a cross-fed pair of modulated
//!   tank delay lines
//! - [`PlateEngine`] - pre-delay, early diffusion, and a 4-line orthogonal
//!   feedback delay network
//!
//! Hosts hold a `Box<dyn ReverbEngine + Send>` obtained from
//! [`ReverbKind::create`] and drive it `prepare → process_block*`. Both
//! engines share the [`ReverbParameters`] control surface; a control thread
//! publishes changes through [`SharedReverbParameters`] and the audio
//! thread snapshots them once per block.
//!
//! # Example
//!
//! ```rust
//! use resono_engines::{ReverbEngine, ReverbKind, ReverbParameters};
//!
//! let mut engine = ReverbKind::Plate.create();
//! engine.prepare(48000.0, 512, 2);
//! engine.set_parameters(ReverbParameters {
//!     decay_time: 3.0,
//!     mix: 0.4,
//!     ..ReverbParameters::default()
//! });
//!
//! let mut left = [0.0f32; 512];
//! let mut right = [0.0f32; 512];
//! left[0] = 1.0;
//! right[0] = 1.0;
//! engine.process_block(&mut [&mut left, &mut right]);
//! ```
//!
//! # Real-time guarantees
//!
//! After `prepare`, processing performs no allocation and takes no locks.
//! Parameter exchange is lock-free with block granularity; see
//! [`SharedReverbParameters`].

#![cfg_attr(not(feature = "std"), no_std)]

pub mod engine;
pub mod hall;
pub mod params;
pub mod plate;

pub use engine::{ReverbEngine, ReverbKind};
pub use hall::HallEngine;
pub use params::{
    DAMPING_RANGE, DECAY_TIME_RANGE, MIX_RANGE, MOD_DEPTH_RANGE, MOD_RATE_RANGE, PRE_DELAY_RANGE,
    ROOM_SIZE_RANGE, ReverbParameters, SharedReverbParameters,
};
pub use plate::PlateEngine;
