//! Memoryless waveshaping transfer functions.
//!
//! Every function here is pure: no filter state, no history, no allocation.
//! The per-sample path is
//!
//! ```text
//! driven = sample * (1 + drive)
//! wet    = transfer(mode, driven)
//! out    = mix * wet + (1 - mix) * sample
//! ```
//!
//! | Mode | Transfer | Pre-mix range |
//! |------|----------|---------------|
//! | Hard | `clamp(x, -1, 1)` | [-1, 1] |
//! | Soft | `c = clamp(x, -1, 1); 1.5c - 0.5c³` | [-1, 1] |
//! | Fold | `sin(2π·x)` | [-1, 1] |
//!
//! The soft curve only ever sees clamped input, so it saturates exactly at
//! ±1 with zero slope. Fold does not clamp: large drive keeps folding.
//!
//! The block functions select the transfer function once per block and run a
//! branch-free inner loop.

use core::f32::consts::TAU;

use libm::sinf;

use crate::params::ShapeMode;

/// Hard clip to ±1.
#[inline]
pub fn hard_clip(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

/// Clamp to ±1, then apply the cubic `1.5x - 0.5x³`.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    let x = hard_clip(x);
    1.5 * x - 0.5 * x * x * x
}

/// Sine wavefolder: `sin(2π·x)`.
#[inline]
pub fn sine_fold(x: f32) -> f32 {
    sinf(TAU * x)
}

/// Transfer function selected by `mode`.
#[inline]
pub fn transfer(mode: ShapeMode, x: f32) -> f32 {
    match mode {
        ShapeMode::Hard => hard_clip(x),
        ShapeMode::Soft => soft_clip(x),
        ShapeMode::Fold => sine_fold(x),
    }
}

/// Shaped (pre-mix) value of one sample.
#[inline]
pub fn shape(sample: f32, drive: f32, mode: ShapeMode) -> f32 {
    transfer(mode, sample * (1.0 + drive))
}

/// Linear dry/wet blend. `mix = 0` returns `dry`, `mix = 1` returns `wet`.
#[inline]
pub fn mix(dry: f32, wet: f32, mix: f32) -> f32 {
    mix * wet + (1.0 - mix) * dry
}

/// Parameter snapshot used for one contiguous run of samples.
///
/// Both channels of a run share the same settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSettings {
    /// Pre-shaping drive; gain is `1 + drive`.
    pub drive: f32,
    /// Dry/wet blend factor.
    pub mix: f32,
    /// Transfer function.
    pub mode: ShapeMode,
}

impl ShapeSettings {
    /// Output sample (shaped and mixed) for one input sample.
    #[inline]
    pub fn process(&self, sample: f32) -> f32 {
        mix(sample, shape(sample, self.drive, self.mode), self.mix)
    }
}

/// Shape `input` into `output`.
///
/// Processes `min(input.len(), output.len())` samples.
pub fn shape_block(settings: &ShapeSettings, input: &[f32], output: &mut [f32]) {
    match settings.mode {
        ShapeMode::Hard => run_block(settings, input, output, hard_clip),
        ShapeMode::Soft => run_block(settings, input, output, soft_clip),
        ShapeMode::Fold => run_block(settings, input, output, sine_fold),
    }
}

/// Shape a buffer in place.
pub fn shape_block_in_place(settings: &ShapeSettings, buffer: &mut [f32]) {
    match settings.mode {
        ShapeMode::Hard => run_in_place(settings, buffer, hard_clip),
        ShapeMode::Soft => run_in_place(settings, buffer, soft_clip),
        ShapeMode::Fold => run_in_place(settings, buffer, sine_fold),
    }
}

#[inline(always)]
fn run_block(
    settings: &ShapeSettings,
    input: &[f32],
    output: &mut [f32],
    curve: impl Fn(f32) -> f32,
) {
    let gain = 1.0 + settings.drive;
    let amount = settings.mix;
    for (out, &dry) in output.iter_mut().zip(input) {
        *out = mix(dry, curve(dry * gain), amount);
    }
}

#[inline(always)]
fn run_in_place(settings: &ShapeSettings, buffer: &mut [f32], curve: impl Fn(f32) -> f32) {
    let gain = 1.0 + settings.drive;
    let amount = settings.mix;
    for sample in buffer.iter_mut() {
        let dry = *sample;
        *sample = mix(dry, curve(dry * gain), amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(drive: f32, amount: f32, mode: ShapeMode) -> ShapeSettings {
        ShapeSettings { drive, mix: amount, mode }
    }

    #[test]
    fn hard_clip_scenario() {
        let s = settings(0.0, 1.0, ShapeMode::Hard);
        let input = [0.5, 1.5, -2.0];
        let mut output = [0.0; 3];
        shape_block(&s, &input, &mut output);
        assert_eq!(output, [0.5, 1.0, -1.0]);
    }

    #[test]
    fn dry_mix_is_bypass() {
        let input = [0.3, -0.9];
        for mode in ShapeMode::ALL {
            let s = settings(0.0, 0.0, mode);
            let mut output = [0.0; 2];
            shape_block(&s, &input, &mut output);
            assert_eq!(output, input, "mode {mode:?}");
        }
    }

    #[test]
    fn soft_clip_saturates_at_unity() {
        assert_eq!(soft_clip(1.0), 1.0);
        assert_eq!(soft_clip(-1.0), -1.0);
        assert_eq!(soft_clip(8.0), 1.0);
        assert_eq!(soft_clip(0.0), 0.0);
        assert!((soft_clip(0.5) - 0.6875).abs() < 1e-7);
    }

    #[test]
    fn fold_is_periodic_in_driven_input() {
        assert!(sine_fold(0.0).abs() < 1e-6);
        assert!((sine_fold(0.25) - 1.0).abs() < 1e-6);
        assert!((sine_fold(0.75) + 1.0).abs() < 1e-6);
        // Drive of 1 doubles the input before folding.
        assert!((shape(0.125, 1.0, ShapeMode::Fold) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn negative_drive_attenuates() {
        assert_eq!(shape(0.8, -1.0, ShapeMode::Hard), 0.0);
        assert_eq!(shape(0.8, -0.5, ShapeMode::Hard), 0.4);
    }

    #[test]
    fn block_matches_per_sample() {
        let input: [f32; 16] = core::array::from_fn(|i| (i as f32 - 8.0) * 0.17);
        for mode in ShapeMode::ALL {
            let s = settings(2.5, 0.3, mode);
            let mut output = [0.0; 16];
            shape_block(&s, &input, &mut output);
            let mut in_place = input;
            shape_block_in_place(&s, &mut in_place);
            for i in 0..input.len() {
                assert_eq!(output[i], s.process(input[i]), "mode {mode:?} sample {i}");
                assert_eq!(in_place[i], output[i]);
            }
        }
    }
}
