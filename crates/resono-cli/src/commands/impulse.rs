//! Impulse response rendering command.

use clap::Args;
use std::path::PathBuf;

use crate::commands::common::{ReverbArgs, process_stereo};
use crate::wav::{StereoSamples, WavSpec, write_wav_stereo};
use resono_core::linear_to_db;

#[derive(Args)]
pub struct ImpulseArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    reverb: ReverbArgs,

    /// Length of the rendered response in seconds
    #[arg(long, default_value = "4.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,
}

pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.duration > 0.0, "duration must be positive");

    let frames = (args.duration * args.sample_rate as f32) as usize;
    let mut samples = StereoSamples::new(vec![0.0; frames], vec![0.0; frames]);
    samples.left[0] = 1.0;
    samples.right[0] = 1.0;

    let mut engine = args.reverb.create_engine(args.sample_rate, args.block_size);
    process_stereo(engine.as_mut(), &mut samples, args.block_size);

    // Report where the tail falls below -60 dB relative to its peak.
    let pk = samples
        .left
        .iter()
        .copied()
        .map(f32::abs)
        .fold(0.0f32, f32::max);
    let floor = pk * 0.001;
    let rt60_frame = samples
        .left
        .iter()
        .rposition(|s| s.abs() > floor)
        .unwrap_or(0);
    println!(
        "Peak {:.1} dB, -60 dB point at {:.2}s",
        linear_to_db(pk),
        rt60_frame as f32 / args.sample_rate as f32
    );

    let spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: 32,
    };
    println!("Writing {}...", args.output.display());
    write_wav_stereo(&args.output, &samples, spec)?;
    Ok(())
}
