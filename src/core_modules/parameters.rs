// THEORY:
// The `parameters` module turns the learned profile into the five bounded
// enhancement knobs the transform layer consumes. Generation is a pure read
// of `PersonalMemory`: defaults, nudged by the bias vector in proportion to
// the learning strength, shaped by a per-scene multiplier table, and finally
// clamped so no reachable profile can push a knob outside its safe range.
//
// The clamp is the contract: downstream per-pixel math assumes every
// parameter is inside its documented range, so clamping happens here, last,
// unconditionally — even for the untouched defaults.

use crate::core_modules::memory::PersonalMemory;
use crate::core_modules::scene::SceneCategory;

pub const EXPOSURE_RANGE: (f32, f32) = (0.8, 1.8);
pub const CONTRAST_RANGE: (f32, f32) = (0.8, 1.5);
pub const SATURATION_RANGE: (f32, f32) = (0.8, 1.8);
pub const SHARPNESS_RANGE: (f32, f32) = (0.01, 0.2);
pub const WARMTH_RANGE: (f32, f32) = (0.2, 0.8);

// How hard each bias component may push its knob, before learning strength
// scales it down.
const EXPOSURE_BIAS_WEIGHT: f32 = 0.3;
const CONTRAST_BIAS_WEIGHT: f32 = 0.4;
const SATURATION_BIAS_WEIGHT: f32 = 0.4;

/// The five tunable enhancement knobs.
///
/// `sharpness` is carried through the whole pipeline but not applied by the
/// per-pixel transform; it is reserved for a neighborhood sharpening pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementParameters {
    pub exposure: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub sharpness: f32,
    pub warmth: f32,
}

impl Default for EnhancementParameters {
    /// The neutral starting point for generation; a gentle general-purpose
    /// enhancement, not an identity transform.
    fn default() -> Self {
        Self {
            exposure: 1.1,
            contrast: 1.15,
            saturation: 1.2,
            sharpness: 0.08,
            warmth: 0.5,
        }
    }
}

impl EnhancementParameters {
    /// Parameters under which the pixel transform is a no-op (modulo byte
    /// truncation). Useful as a baseline in tests and host UIs.
    pub fn identity() -> Self {
        Self {
            exposure: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            sharpness: 0.08,
            warmth: 0.5,
        }
    }

    /// Returns a copy with every knob clamped to its documented range.
    pub fn clamped(self) -> Self {
        Self {
            exposure: self.exposure.clamp(EXPOSURE_RANGE.0, EXPOSURE_RANGE.1),
            contrast: self.contrast.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1),
            saturation: self.saturation.clamp(SATURATION_RANGE.0, SATURATION_RANGE.1),
            sharpness: self.sharpness.clamp(SHARPNESS_RANGE.0, SHARPNESS_RANGE.1),
            warmth: self.warmth.clamp(WARMTH_RANGE.0, WARMTH_RANGE.1),
        }
    }

    /// True when every knob lies inside its documented range.
    pub fn is_within_bounds(&self) -> bool {
        let in_range = |value: f32, range: (f32, f32)| value >= range.0 && value <= range.1;
        in_range(self.exposure, EXPOSURE_RANGE)
            && in_range(self.contrast, CONTRAST_RANGE)
            && in_range(self.saturation, SATURATION_RANGE)
            && in_range(self.sharpness, SHARPNESS_RANGE)
            && in_range(self.warmth, WARMTH_RANGE)
    }
}

/// Derives enhancement parameters from the learned profile.
///
/// With no favorites stored, the defaults come back unchanged. Otherwise the
/// bias vector nudges exposure, contrast, saturation and warmth at a depth of
/// `learning_strength / 200`, the current scene applies its multipliers, and
/// the result is clamped.
pub fn generate(memory: &PersonalMemory) -> EnhancementParameters {
    let mut params = EnhancementParameters::default();

    if memory.favorite_count() > 0 {
        let bias = memory.bias();
        let bias_strength = memory.learning_strength() as f32 / 200.0;

        params.exposure += (bias[0] - 0.5) * EXPOSURE_BIAS_WEIGHT * bias_strength;
        params.contrast += (bias[4] - 0.5) * CONTRAST_BIAS_WEIGHT * bias_strength;
        params.saturation += (bias[6] - 0.5) * SATURATION_BIAS_WEIGHT * bias_strength;
        params.warmth = 0.5 + (bias[5] - 0.5) * bias_strength;

        match memory.current_scene() {
            SceneCategory::Portrait => {
                params.saturation *= 1.1;
                params.sharpness *= 0.8;
                params.warmth *= 1.2;
            }
            SceneCategory::Landscape => {
                params.exposure *= 1.15;
                params.contrast *= 1.2;
                params.saturation *= 1.3;
            }
            SceneCategory::LowLight => {
                params.exposure *= 1.3;
                params.sharpness *= 0.5;
            }
            SceneCategory::Sunset => {
                params.warmth *= 1.4;
                params.saturation *= 1.25;
            }
            SceneCategory::Indoor => {
                params.exposure *= 1.1;
                params.sharpness *= 0.7;
            }
            SceneCategory::Macro => {
                params.saturation *= 1.2;
                params.sharpness *= 1.3;
            }
            SceneCategory::Unknown => {}
        }
    }

    params.clamped()
}
