//! List the available engines and their control ranges.

use clap::Args;
use resono_engines::{
    DAMPING_RANGE, DECAY_TIME_RANGE, MOD_DEPTH_RANGE, MOD_RATE_RANGE, PRE_DELAY_RANGE,
    ROOM_SIZE_RANGE, ReverbKind, ReverbParameters,
};

#[derive(Args)]
pub struct EnginesArgs {}

pub fn run(_args: EnginesArgs) -> anyhow::Result<()> {
    println!("Engines:");
    for kind in [ReverbKind::Hall, ReverbKind::Plate] {
        let desc = match kind {
            ReverbKind::Hall => "serial diffusion into cross-fed modulated tank lines",
            ReverbKind::Plate => "pre-delay, diffusion, 4-line feedback delay network",
        };
        println!("  {:<6} {desc}", kind.name());
    }

    let d = ReverbParameters::default();
    println!("\nControls (default in parentheses):");
    println!(
        "  --room-size  {} to {}  ({})",
        ROOM_SIZE_RANGE.0, ROOM_SIZE_RANGE.1, d.room_size
    );
    println!(
        "  --decay      {} to {} s  ({})",
        DECAY_TIME_RANGE.0, DECAY_TIME_RANGE.1, d.decay_time
    );
    println!(
        "  --damping    {} to {} Hz  ({})",
        DAMPING_RANGE.0, DAMPING_RANGE.1, d.damping_hz
    );
    println!(
        "  --mod-rate   {} to {} Hz  ({})",
        MOD_RATE_RANGE.0, MOD_RATE_RANGE.1, d.mod_rate_hz
    );
    println!(
        "  --mod-depth  {} to {}  ({})",
        MOD_DEPTH_RANGE.0, MOD_DEPTH_RANGE.1, d.mod_depth
    );
    println!(
        "  --predelay   {} to {} ms  ({})",
        PRE_DELAY_RANGE.0, PRE_DELAY_RANGE.1, d.pre_delay_ms
    );
    println!("  --mix        0 to 1  ({})", d.mix);
    Ok(())
}
