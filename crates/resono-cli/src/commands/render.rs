//! File-based reverb rendering command.

use clap::Args;
use std::path::PathBuf;

use crate::commands::common::{ReverbArgs, peak, process_stereo};
use crate::wav::{WavSpec, read_wav_stereo, write_wav_stereo};
use resono_core::linear_to_db;

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    reverb: ReverbArgs,

    /// Extra tail to render past the input, in seconds
    #[arg(long, default_value = "3.0")]
    tail: f32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)?;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / spec.sample_rate as f32
    );

    // Zero padding past the input so the tail is captured.
    let tail_frames = (args.tail.max(0.0) * spec.sample_rate as f32) as usize;
    let total = samples.len() + tail_frames;
    samples.left.resize(total, 0.0);
    samples.right.resize(total, 0.0);

    let mut engine = args.reverb.create_engine(spec.sample_rate, args.block_size);
    let input_peak = peak(&samples);
    process_stereo(engine.as_mut(), &mut samples, args.block_size);
    let output_peak = peak(&samples);

    println!(
        "Peak: in {:.1} dB, out {:.1} dB",
        linear_to_db(input_peak),
        linear_to_db(output_peak)
    );

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("Writing {}...", args.output.display());
    write_wav_stereo(&args.output, &samples, out_spec)?;
    Ok(())
}
