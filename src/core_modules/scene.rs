// THEORY:
// The `scene` module maps a `PhotoSignature` onto a small set of coarse scene
// categories. It is intentionally a fixed threshold cascade rather than
// anything learned: classification must stay stable while the memory layer
// adapts around it, otherwise the per-scene counters would drift with the
// user's bias and stop meaning anything.
//
// The rules overlap, and the cascade order is the tie-break — a dark, warm
// frame satisfies both the low-light and sunset conditions and must classify
// as low light because that rule is checked first. Reordering the cascade
// changes observable behavior.

use std::fmt;

use crate::core_modules::signature::signature::PhotoSignature;

const LOW_LIGHT_MAX_BRIGHTNESS: f32 = 0.3;
const LOW_LIGHT_MAX_CONTRAST: f32 = 0.2;
const PORTRAIT_MIN_BRIGHTNESS: f32 = 0.4;
const PORTRAIT_MAX_BRIGHTNESS: f32 = 0.7;
const PORTRAIT_MIN_RG_RATIO: f32 = 1.1;
const SUNSET_MIN_WARMTH: f32 = 0.7;
const SUNSET_MIN_BRIGHTNESS: f32 = 0.3;
const LANDSCAPE_MIN_BRIGHTNESS: f32 = 0.6;
const LANDSCAPE_MIN_CONTRAST: f32 = 0.3;
const MACRO_MIN_SATURATION: f32 = 0.7;
const INDOOR_MIN_BRIGHTNESS: f32 = 0.3;
const INDOOR_MAX_BRIGHTNESS: f32 = 0.6;

/// Coarse heuristic classification of a photo's scene.
///
/// The declaration order is load-bearing: per-scene counters are indexed by
/// it, and most-common-scene ties resolve to the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneCategory {
    /// Mid-brightness frame with a red-shifted channel balance, typical of skin tones.
    Portrait,
    /// Bright, high-contrast frame.
    Landscape,
    /// Dark, flat frame.
    LowLight,
    /// Warm-dominated frame with enough light to rule out low light.
    Sunset,
    /// Mid-brightness frame that matched nothing more specific.
    Indoor,
    /// Strongly saturated close-up.
    Macro,
    /// Nothing matched; no scene adjustment is applied.
    #[default]
    Unknown,
}

/// Every category, in counter-index order.
pub const ALL_SCENES: [SceneCategory; SceneCategory::COUNT] = [
    SceneCategory::Portrait,
    SceneCategory::Landscape,
    SceneCategory::LowLight,
    SceneCategory::Sunset,
    SceneCategory::Indoor,
    SceneCategory::Macro,
    SceneCategory::Unknown,
];

impl SceneCategory {
    /// Number of scene categories.
    pub const COUNT: usize = 7;

    /// The counter-table index for this category.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Classifies a signature with the fixed threshold cascade.
    /// The first matching rule wins.
    pub fn classify(sig: &PhotoSignature) -> Self {
        let brightness = sig.brightness();
        let contrast = sig.contrast();
        let warmth = sig.warmth();
        let saturation = sig.saturation();
        let rg_ratio = sig.red_green_ratio();

        if brightness < LOW_LIGHT_MAX_BRIGHTNESS && contrast < LOW_LIGHT_MAX_CONTRAST {
            return SceneCategory::LowLight;
        }
        if brightness > PORTRAIT_MIN_BRIGHTNESS
            && brightness < PORTRAIT_MAX_BRIGHTNESS
            && rg_ratio > PORTRAIT_MIN_RG_RATIO
        {
            return SceneCategory::Portrait;
        }
        if warmth > SUNSET_MIN_WARMTH && brightness > SUNSET_MIN_BRIGHTNESS {
            return SceneCategory::Sunset;
        }
        if brightness > LANDSCAPE_MIN_BRIGHTNESS && contrast > LANDSCAPE_MIN_CONTRAST {
            return SceneCategory::Landscape;
        }
        if saturation > MACRO_MIN_SATURATION {
            return SceneCategory::Macro;
        }
        if brightness > INDOOR_MIN_BRIGHTNESS && brightness < INDOOR_MAX_BRIGHTNESS {
            return SceneCategory::Indoor;
        }
        SceneCategory::Unknown
    }
}

impl fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneCategory::Portrait => "Portrait",
            SceneCategory::Landscape => "Landscape",
            SceneCategory::LowLight => "Low Light",
            SceneCategory::Sunset => "Sunset",
            SceneCategory::Indoor => "Indoor",
            SceneCategory::Macro => "Macro",
            SceneCategory::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
