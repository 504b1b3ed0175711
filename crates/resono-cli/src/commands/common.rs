//! Flags and helpers shared by the CLI commands.

use clap::{Args, ValueEnum};
use resono_engines::{ReverbEngine, ReverbKind, ReverbParameters};

use crate::wav::StereoSamples;

/// Engine selection for CLI flags.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliEngine {
    #[default]
    Hall,
    Plate,
}

impl From<CliEngine> for ReverbKind {
    fn from(e: CliEngine) -> Self {
        match e {
            CliEngine::Hall => ReverbKind::Hall,
            CliEngine::Plate => ReverbKind::Plate,
        }
    }
}

/// Reverb controls exposed on every rendering command. Out-of-range values
/// are clamped by the engine, not rejected here.
#[derive(Args)]
pub struct ReverbArgs {
    /// Reverb topology
    #[arg(long, value_enum, default_value_t = CliEngine::Hall)]
    pub engine: CliEngine,

    /// Room size scale (0.25 to 1.75)
    #[arg(long, default_value = "1.0")]
    pub room_size: f32,

    /// RT60 decay time in seconds (0.1 to 20)
    #[arg(long, default_value = "2.0")]
    pub decay: f32,

    /// Damping lowpass cutoff in Hz (500 to 20000)
    #[arg(long, default_value = "20000")]
    pub damping: f32,

    /// Delay modulation rate in Hz (0.05 to 5)
    #[arg(long, default_value = "0.35")]
    pub mod_rate: f32,

    /// Delay modulation depth (0 to 1)
    #[arg(long, default_value = "0.0")]
    pub mod_depth: f32,

    /// Pre-delay in milliseconds (0 to 200, plate only)
    #[arg(long, default_value = "0.0")]
    pub predelay: f32,

    /// Dry/wet mix (0 = dry, 1 = wet)
    #[arg(long, default_value = "0.5")]
    pub mix: f32,
}

impl ReverbArgs {
    /// The parameter set described by the flags.
    pub fn parameters(&self) -> ReverbParameters {
        ReverbParameters {
            room_size: self.room_size,
            decay_time: self.decay,
            damping_hz: self.damping,
            mod_rate_hz: self.mod_rate,
            mod_depth: self.mod_depth,
            pre_delay_ms: self.predelay,
            mix: self.mix,
        }
    }

    /// Build and prepare an engine from the flags.
    pub fn create_engine(
        &self,
        sample_rate: u32,
        block_size: usize,
    ) -> Box<dyn ReverbEngine + Send> {
        let kind = ReverbKind::from(self.engine);
        let mut engine = kind.create();
        engine.prepare(f64::from(sample_rate), block_size, 2);
        engine.set_parameters(self.parameters());
        tracing::info!(engine = kind.name(), sample_rate, "engine prepared");
        engine
    }
}

/// Run a stereo buffer through the engine block by block, in place.
pub fn process_stereo(
    engine: &mut dyn ReverbEngine,
    samples: &mut StereoSamples,
    block_size: usize,
) {
    for (l, r) in samples
        .left
        .chunks_mut(block_size)
        .zip(samples.right.chunks_mut(block_size))
    {
        engine.process_block(&mut [l, r]);
    }
}

/// Peak absolute value over both channels.
pub fn peak(samples: &StereoSamples) -> f32 {
    samples
        .left
        .iter()
        .chain(samples.right.iter())
        .copied()
        .map(f32::abs)
        .fold(0.0f32, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_processing_matches_single_pass() {
        let args = ReverbArgs {
            engine: CliEngine::Plate,
            room_size: 1.0,
            decay: 1.5,
            damping: 8000.0,
            mod_rate: 0.35,
            mod_depth: 0.0,
            predelay: 10.0,
            mix: 1.0,
        };

        let mut input = StereoSamples::new(vec![0.0; 4096], vec![0.0; 4096]);
        input.left[0] = 1.0;
        input.right[0] = 1.0;

        let mut blocked = input.clone();
        let mut whole = input;
        let mut a = args.create_engine(48000, 256);
        let mut b = args.create_engine(48000, 4096);
        process_stereo(a.as_mut(), &mut blocked, 256);
        process_stereo(b.as_mut(), &mut whole, 4096);

        assert_eq!(blocked.left, whole.left);
        assert_eq!(blocked.right, whole.right);
    }
}
