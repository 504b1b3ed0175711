//! Plate reverb: pre-delay, early diffusion, and a 4-line orthogonal
//! feedback delay network.
//!
//! The mono-summed input passes a fractional pre-delay and two detuned
//! 4-stage allpass cascades, then injects into the four FDN lines with
//! fixed alternating signs so a single source decorrelates across the
//! network. Each sample the four line outputs are read first (at slewed,
//! LFO-modulated fractional offsets), mixed through a fixed Hadamard
//! matrix scaled by the RT60-derived feedback gain, summed with the new
//! injection, damped per line, and only then written back — read-all-
//! then-write-all keeps the network independent of line iteration order.
//!
//! Delay times, injection signs and the stereo decode weights are an
//! empirically tuned preset table.

use libm::expf;
use resono_core::{
    AllpassDiffuser, DampingChain, DelayLine, QuadratureLfo, flush_denormal, mono_sum,
    ms_to_samples, wet_dry_mix,
};

use crate::engine::ReverbEngine;
use crate::params::{PRE_DELAY_RANGE, ROOM_SIZE_RANGE, ReverbParameters};

/// Number of FDN lines. The decode matrix and injection table below are
/// written for exactly four.
const FDN_LINES: usize = 4;

/// Base FDN line delays in ms, scaled by `room_size` at block rate.
const FDN_DELAYS_MS: [f32; FDN_LINES] = [31.0, 37.0, 44.0, 56.0];

/// Early-diffuser nominal delays in ms (one cascade per channel).
const DIFFUSER_DELAYS_MS: [f32; 4] = [4.7, 3.6, 12.7, 9.3];
const DIFFUSER_GAIN: f32 = 0.70;

/// Right-channel diffuser detune factor.
const RIGHT_DIFFUSER_DETUNE: f32 = 1.07;

/// Injection signs spreading the mono diffused signal across the lines.
const INJECTION: [f32; FDN_LINES] = [0.7, -0.5, 0.5, -0.7];

/// Orthonormal Hadamard feedback matrix; rows have unit norm, so the loop
/// gain is exactly the scalar feedback gain.
const FEEDBACK_MATRIX: [[f32; FDN_LINES]; FDN_LINES] = [
    [0.5, 0.5, 0.5, 0.5],
    [0.5, -0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5, 0.5],
];

/// Peak per-line delay modulation as a fraction of the base delay.
const MOD_RATIO: f32 = 0.0015;

/// Per-sample exponential slew toward the modulated delay target.
const DELAY_SLEW: f32 = 0.001;

/// Maps the decay-time control onto the plate's perceived decay; the RT60
/// point lands at `decay_time · DECAY_STRETCH` before damping losses.
const DECAY_STRETCH: f32 = 0.85;

/// Hard ceiling on the feedback gain, independent of user input.
const MAX_FEEDBACK_GAIN: f32 = 0.995;

/// ln(0.001): a signal decayed to this ratio is 60 dB down.
const LN_MINUS_60DB: f32 = -6.907_755;

/// Stereo decode weights for the raw line outputs.
const DECODE_MAIN: f32 = 0.35;
const DECODE_CROSS: f32 = 0.15;

/// Makeup applied to the decoded wet signal.
const MAKEUP_GAIN: f32 = 1.25;

/// Loop highpass cutoff (Hz); keeps DC out of the network.
const LOOP_HIGHPASS_HZ: f32 = 24.0;

/// Plate reverb engine. See the module docs for the topology.
pub struct PlateEngine {
    params: ReverbParameters,
    sample_rate: f32,

    predelay: DelayLine,
    /// Early diffusion, indexed [L0..L3, R0..R3].
    diffusers: [AllpassDiffuser; 8],

    lines: [DelayLine; FDN_LINES],
    damping: [DampingChain; FDN_LINES],
    lfo: QuadratureLfo,

    /// Unscaled base line delays in samples.
    base_delay: [f32; FDN_LINES],
    max_delay: [f32; FDN_LINES],
    /// Slewed read offsets, persisted across blocks.
    current_delay: [f32; FDN_LINES],
    /// RT60-derived, safety-clamped feedback gain.
    feedback_gain: f32,
    pre_delay_samples: f32,
}

impl PlateEngine {
    /// Create an unprepared engine with default parameters.
    pub fn new() -> Self {
        let mut engine = Self {
            params: ReverbParameters::default(),
            sample_rate: 0.0,
            predelay: DelayLine::new(2),
            diffusers: core::array::from_fn(|_| AllpassDiffuser::new(2)),
            lines: core::array::from_fn(|_| DelayLine::new(2)),
            damping: core::array::from_fn(|_| DampingChain::new(44100.0, 20000.0)),
            lfo: QuadratureLfo::new(44100.0, 0.35),
            base_delay: [1.0; FDN_LINES],
            max_delay: [1.0; FDN_LINES],
            current_delay: [1.0; FDN_LINES],
            feedback_gain: 0.0,
            pre_delay_samples: 0.0,
        };
        engine.prepare(44100.0, 512, 2);
        engine
    }

    /// Re-derive everything that depends on the stored parameters.
    fn update_derived(&mut self) {
        for chain in &mut self.damping {
            chain.set_damping(self.params.damping_hz);
        }
        self.lfo.set_rate(self.params.mod_rate_hz);
        self.lfo.set_depth(self.params.mod_depth);

        self.pre_delay_samples = ms_to_samples(self.params.pre_delay_ms, self.sample_rate)
            .clamp(0.0, self.predelay.max_delay() as f32);

        // Classic RT60 relation over the estimated one-pass loop time,
        // then the unconditional-stability clamp.
        let mean_base = self.base_delay.iter().sum::<f32>() / FDN_LINES as f32;
        let t_loop = mean_base * self.params.room_size / self.sample_rate;
        let g = expf(LN_MINUS_60DB * t_loop / (self.params.decay_time * DECAY_STRETCH));
        self.feedback_gain = g.min(MAX_FEEDBACK_GAIN);
    }
}

impl Default for PlateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverbEngine for PlateEngine {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize, _num_channels: usize) {
        let sr = sample_rate as f32;
        self.sample_rate = sr;

        self.predelay = DelayLine::from_time(sr, PRE_DELAY_RANGE.1 / 1000.0);

        for (i, stage) in self.diffusers.iter_mut().enumerate() {
            let detune = if i < 4 { 1.0 } else { RIGHT_DIFFUSER_DETUNE };
            let nominal = ms_to_samples(DIFFUSER_DELAYS_MS[i % 4] * detune, sr);
            *stage = AllpassDiffuser::new(nominal as usize + 32);
            stage.set_delay(nominal);
            stage.set_gain(DIFFUSER_GAIN);
        }

        for i in 0..FDN_LINES {
            let longest = ms_to_samples(FDN_DELAYS_MS[i] * ROOM_SIZE_RANGE.1, sr)
                * (1.0 + MOD_RATIO)
                + 8.0;
            self.lines[i] = DelayLine::new(longest as usize);
            self.max_delay[i] = self.lines[i].max_delay() as f32;
            self.base_delay[i] = ms_to_samples(FDN_DELAYS_MS[i], sr).clamp(1.0, self.max_delay[i]);
            self.current_delay[i] = self.base_delay[i] * self.params.room_size;

            self.damping[i] = DampingChain::new(sr, self.params.damping_hz);
            self.damping[i].enable_highpass(LOOP_HIGHPASS_HZ);
        }

        self.lfo = QuadratureLfo::new(sr, self.params.mod_rate_hz);

        self.update_derived();
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = sr,
            feedback_gain = self.feedback_gain,
            "plate engine prepared"
        );
    }

    fn reset(&mut self) {
        self.predelay.clear();
        for stage in &mut self.diffusers {
            stage.clear();
        }
        for line in &mut self.lines {
            line.clear();
        }
        for chain in &mut self.damping {
            chain.reset();
        }
        self.lfo.reset();
        for i in 0..FDN_LINES {
            self.current_delay[i] =
                (self.base_delay[i] * self.params.room_size).clamp(1.0, self.max_delay[i]);
        }
    }

    fn set_parameters(&mut self, params: ReverbParameters) {
        let clamped = params.clamped();
        if clamped == self.params {
            return;
        }
        self.params = clamped;
        self.update_derived();
    }

    fn parameters(&self) -> ReverbParameters {
        self.params
    }

    fn process_block(&mut self, channels: &mut [&mut [f32]]) {
        if channels.is_empty() {
            return;
        }

        // Snapshot once; changes never apply mid-block.
        let p = self.params;
        let mix = p.mix;
        let g = self.feedback_gain;
        let pre_delay = self.pre_delay_samples;

        let mut base = [0.0f32; FDN_LINES];
        for i in 0..FDN_LINES {
            base[i] = (self.base_delay[i] * p.room_size).clamp(1.0, self.max_delay[i]);
        }

        let stereo = channels.len() > 1;
        let num_samples = channels[0].len();
        debug_assert!(channels.iter().all(|c| c.len() == num_samples));

        for n in 0..num_samples {
            let in_l = channels[0][n];
            let in_r = if stereo { channels[1][n] } else { in_l };

            // Pre-delay: mono write, one fractional read feeding both
            // detuned per-channel cascades.
            self.predelay.push(mono_sum(in_l, in_r));
            let pre = self.predelay.read_fractional(pre_delay);

            let mut diff_l = pre;
            for stage in &mut self.diffusers[..4] {
                diff_l = stage.process(diff_l);
            }
            let mut diff_r = pre;
            for stage in &mut self.diffusers[4..] {
                diff_r = stage.process(diff_r);
            }
            let diffused = mono_sum(diff_l, diff_r);

            // Per-line modulation phases from one quadrature pair.
            let lfo = self.lfo.tick();
            let phases = [lfo.normal, lfo.quadrature, -lfo.normal, -lfo.quadrature];

            // Read all line outputs first.
            let mut outs = [0.0f32; FDN_LINES];
            for i in 0..FDN_LINES {
                let target =
                    (base[i] * (1.0 + MOD_RATIO * phases[i])).clamp(1.0, self.max_delay[i]);
                self.current_delay[i] += DELAY_SLEW * (target - self.current_delay[i]);
                // The read precedes this sample's push, so the offset sits
                // one sample nearer the cursor than the nominal delay.
                outs[i] = self.lines[i].read_fractional(self.current_delay[i] - 1.0);
            }

            // Mixed feedback vector, then write all lines.
            for i in 0..FDN_LINES {
                let mut fb = 0.0f32;
                for j in 0..FDN_LINES {
                    fb += FEEDBACK_MATRIX[i][j] * outs[j];
                }
                let line_in = INJECTION[i] * diffused + g * fb;
                let damped = self.damping[i].process(line_in);
                self.lines[i].push(flush_denormal(damped));
            }

            // Stereo decode from the raw (pre-feedback) line outputs.
            let wet_l =
                (DECODE_MAIN * (outs[0] + outs[2]) + DECODE_CROSS * (outs[1] - outs[3]))
                    * MAKEUP_GAIN;
            let wet_r =
                (DECODE_MAIN * (outs[1] + outs[3]) + DECODE_CROSS * (outs[0] - outs[2]))
                    * MAKEUP_GAIN;

            channels[0][n] = wet_dry_mix(in_l, wet_l, mix);
            if stereo {
                channels[1][n] = wet_dry_mix(in_r, wet_r, mix);
            }
        }
    }
}
