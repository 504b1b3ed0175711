//! CLI subcommand implementations.

pub mod common;
pub mod engines;
pub mod impulse;
pub mod render;
