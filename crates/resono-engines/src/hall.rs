//! Hall reverb: serial diffusion into a cross-fed pair of modulated tank
//! lines.
//!
//! Per sample, each channel runs through two early allpass stages, is
//! summed 50/50 with the previous sample's cross-fed feedback and written
//! into its tank delay line. The tank is read at an LFO-modulated,
//! slew-smoothed fractional offset, diffused again by two late allpasses,
//! damped, and recirculated: `fb_l = (damped_l + cross·damped_r)·decay`.
//! The right-channel diffusers are slightly detuned against the left so
//! the tail decorrelates without splitting the image.
//!
//! All nominal delays and gains are an empirically tuned preset table, not
//! derived values.

use libm::expf;
use resono_core::{
    AllpassDiffuser, DampingChain, DelayLine, QuadratureLfo, flush_denormal, ms_to_samples,
    wet_dry_mix,
};

use crate::engine::ReverbEngine;
use crate::params::{ROOM_SIZE_RANGE, ReverbParameters};

/// Early diffusion nominal delays (ms) and gains, left channel.
const EARLY_DELAYS_MS: [f32; 2] = [12.0, 20.0];
const EARLY_GAINS: [f32; 2] = [0.75, 0.70];

/// Late (tank) diffusion nominal delays (ms) and gains, left channel.
const LATE_DELAYS_MS: [f32; 2] = [35.0, 60.0];
const LATE_GAINS: [f32; 2] = [0.72, 0.70];

/// Right-channel detune factors for the first and second stage of each
/// cascade. Decorrelates the stereo image without audible pitch offset.
const RIGHT_DETUNE: [f32; 2] = [1.1, 0.9];

/// Nominal tank delays in ms (L, R), scaled by `room_size` at block rate.
const TANK_DELAYS_MS: [f32; 2] = [80.0, 93.0];

/// Stereo cross-feedback amount.
const CROSS_FEED: f32 = 0.30;

/// The tank input averages early signal and feedback.
const TANK_INPUT_GAIN: f32 = 0.5;

/// Peak delay modulation as a fraction of the base tank delay.
const MOD_RATIO: f32 = 0.005;

/// Per-sample exponential slew toward the modulated delay target. Direct
/// jumps in a fractional read produce audible zippering.
const DELAY_SLEW: f32 = 0.001;

/// Hard ceiling on the per-loop gain, independent of user input.
const MAX_LOOP_GAIN: f32 = 0.995;

/// ln(0.001): a signal decayed to this ratio is 60 dB down.
const LN_MINUS_60DB: f32 = -6.907_755;

/// Loop highpass cutoff (Hz); keeps DC from accumulating in the tank.
const LOOP_HIGHPASS_HZ: f32 = 24.0;

/// Hall reverb engine. See the module docs for the topology.
pub struct HallEngine {
    params: ReverbParameters,
    sample_rate: f32,

    // Diffusion cascades, indexed [L1, L2, R1, R2].
    early: [AllpassDiffuser; 4],
    late: [AllpassDiffuser; 4],

    tanks: [DelayLine; 2],
    damping: [DampingChain; 2],
    lfo: QuadratureLfo,

    /// Unscaled nominal tank delays in samples (L, R).
    base_delay: [f32; 2],
    /// Largest delay each tank line can serve.
    max_delay: [f32; 2],
    /// Slewed read offsets, persisted across blocks.
    current_delay: [f32; 2],
    /// Previous sample's cross-fed feedback.
    feedback: [f32; 2],
    /// Per-loop feedback multiplier derived from `decay_time`.
    decay_gain: f32,
}

impl HallEngine {
    /// Create an unprepared engine with default parameters.
    pub fn new() -> Self {
        let mut engine = Self {
            params: ReverbParameters::default(),
            sample_rate: 0.0,
            early: core::array::from_fn(|_| AllpassDiffuser::new(2)),
            late: core::array::from_fn(|_| AllpassDiffuser::new(2)),
            tanks: [DelayLine::new(2), DelayLine::new(2)],
            damping: [
                DampingChain::new(44100.0, 20000.0),
                DampingChain::new(44100.0, 20000.0),
            ],
            lfo: QuadratureLfo::new(44100.0, 0.35),
            base_delay: [1.0; 2],
            max_delay: [1.0; 2],
            current_delay: [1.0; 2],
            feedback: [0.0; 2],
            decay_gain: 0.0,
        };
        engine.prepare(44100.0, 512, 2);
        engine
    }

    fn make_allpass(sample_rate: f32, delay_ms: f32, gain: f32) -> AllpassDiffuser {
        let nominal = ms_to_samples(delay_ms, sample_rate);
        // Headroom beyond the nominal delay, matching prepare-time sizing
        // elsewhere; the nominal itself never changes after prepare.
        let mut ap = AllpassDiffuser::new(nominal as usize + 32);
        ap.set_delay(nominal);
        ap.set_gain(gain);
        ap
    }

    /// Re-derive everything that depends on the stored parameters.
    fn update_derived(&mut self) {
        for chain in &mut self.damping {
            chain.set_damping(self.params.damping_hz);
        }
        self.lfo.set_rate(self.params.mod_rate_hz);
        self.lfo.set_depth(self.params.mod_depth);

        // RT60 over the mean tank loop time, compensated for the 0.5 tank
        // input mix. The clamp keeps the worst-case loop gain
        // (input gain · decay · (1 + cross-feed)) below MAX_LOOP_GAIN even
        // when both channels recirculate fully correlated signal.
        let mean_base = (self.base_delay[0] + self.base_delay[1]) * 0.5;
        let t_loop = mean_base * self.params.room_size / self.sample_rate;
        let rt60_gain = expf(LN_MINUS_60DB * t_loop / self.params.decay_time);
        let limit = MAX_LOOP_GAIN / (TANK_INPUT_GAIN * (1.0 + CROSS_FEED));
        self.decay_gain = (rt60_gain / TANK_INPUT_GAIN).min(limit);
    }
}

impl Default for HallEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverbEngine for HallEngine {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize, _num_channels: usize) {
        let sr = sample_rate as f32;
        self.sample_rate = sr;

        for (i, stage) in self.early.iter_mut().enumerate() {
            let detune = if i < 2 { 1.0 } else { RIGHT_DETUNE[i - 2] };
            *stage = Self::make_allpass(sr, EARLY_DELAYS_MS[i % 2] * detune, EARLY_GAINS[i % 2]);
        }
        for (i, stage) in self.late.iter_mut().enumerate() {
            let detune = if i < 2 { 1.0 } else { RIGHT_DETUNE[i - 2] };
            *stage = Self::make_allpass(sr, LATE_DELAYS_MS[i % 2] * detune, LATE_GAINS[i % 2]);
        }

        for (i, tank) in self.tanks.iter_mut().enumerate() {
            // Room scale plus modulation headroom; never resized after this.
            let longest = ms_to_samples(TANK_DELAYS_MS[i] * ROOM_SIZE_RANGE.1, sr)
                * (1.0 + MOD_RATIO)
                + 8.0;
            *tank = DelayLine::new(longest as usize);
            self.max_delay[i] = tank.max_delay() as f32;
            self.base_delay[i] = ms_to_samples(TANK_DELAYS_MS[i], sr)
                .clamp(1.0, self.max_delay[i]);
            self.current_delay[i] = self.base_delay[i] * self.params.room_size;
        }

        for chain in &mut self.damping {
            *chain = DampingChain::new(sr, self.params.damping_hz);
            chain.enable_highpass(LOOP_HIGHPASS_HZ);
        }
        self.lfo = QuadratureLfo::new(sr, self.params.mod_rate_hz);

        self.update_derived();
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = sr,
            tank_l = self.base_delay[0],
            tank_r = self.base_delay[1],
            "hall engine prepared"
        );
    }

    fn reset(&mut self) {
        for stage in self.early.iter_mut().chain(self.late.iter_mut()) {
            stage.clear();
        }
        for tank in &mut self.tanks {
            tank.clear();
        }
        for chain in &mut self.damping {
            chain.reset();
        }
        self.lfo.reset();
        self.feedback = [0.0; 2];
        for i in 0..2 {
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
        let decay = self.decay_gain;

        let base = [
            (self.base_delay[0] * p.room_size).clamp(1.0, self.max_delay[0]),
            (self.base_delay[1] * p.room_size).clamp(1.0, self.max_delay[1]),
        ];
        let max_mod = [base[0] * MOD_RATIO, base[1] * MOD_RATIO];

        let stereo = channels.len() > 1;
        let num_samples = channels[0].len();
        debug_assert!(channels.iter().all(|c| c.len() == num_samples));

        for n in 0..num_samples {
            let in_l = channels[0][n];
            let in_r = if stereo { channels[1][n] } else { in_l };

            // Early diffusion, two stages per channel.
            let mut early_l = self.early[0].process(in_l);
            early_l = self.early[1].process(early_l);
            let mut early_r = self.early[2].process(in_r);
            early_r = self.early[3].process(early_r);

            // One LFO tick serves both channels: normal drives the left
            // tank, the quadrature tap the right.
            let lfo = self.lfo.tick();
            let target_l = (base[0] + max_mod[0] * lfo.normal).clamp(1.0, self.max_delay[0]);
            let target_r = (base[1] + max_mod[1] * lfo.quadrature).clamp(1.0, self.max_delay[1]);
            self.current_delay[0] += DELAY_SLEW * (target_l - self.current_delay[0]);
            self.current_delay[1] += DELAY_SLEW * (target_r - self.current_delay[1]);

            // Tank write, then modulated fractional read.
            let tank_in_l = TANK_INPUT_GAIN * (early_l + self.feedback[0]);
            let tank_in_r = TANK_INPUT_GAIN * (early_r + self.feedback[1]);
            self.tanks[0].push(flush_denormal(tank_in_l));
            self.tanks[1].push(flush_denormal(tank_in_r));
            let tank_out_l = self.tanks[0].read_fractional(self.current_delay[0]);
            let tank_out_r = self.tanks[1].read_fractional(self.current_delay[1]);

            // Late diffusion.
            let mut diff_l = self.late[0].process(tank_out_l);
            diff_l = self.late[1].process(diff_l);
            let mut diff_r = self.late[2].process(tank_out_r);
            diff_r = self.late[3].process(diff_r);

            // Damping inside the loop, then the cross-fed feedback for the
            // next sample.
            let damped_l = self.damping[0].process(diff_l);
            let damped_r = self.damping[1].process(diff_r);
            self.feedback[0] = flush_denormal((damped_l + CROSS_FEED * damped_r) * decay);
            self.feedback[1] = flush_denormal((damped_r + CROSS_FEED * damped_l) * decay);

            channels[0][n] = wet_dry_mix(in_l, damped_l, mix);
            if stereo {
                channels[1][n] = wet_dry_mix(in_r, damped_r, mix);
            }
        }
    }
}
