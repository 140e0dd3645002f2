// THEORY:
// The `signature` module is the most fundamental unit of the personalization
// engine. It reduces a full-resolution RGB frame to a compact, fixed-length
// numeric summary — the `PhotoSignature` — that every higher layer consumes.
// A signature is meaningless pixel-by-pixel; its value is that two photos with
// similar color and tone character produce nearby signatures, which is what
// lets the memory layer average them into a preference.
//
// Key architectural principles:
// 1.  **Stride Sampling**: Only every 8th pixel in each direction is sampled.
//     Color statistics are spatially redundant, so an 8x8 grid captures the
//     same character at a fraction of the cost, keeping extraction cheap
//     enough to run on every captured frame.
// 2.  **Accumulate Then Summarize**: The loop maintains running sums (luma,
//     per-channel intensity, warm/cool energy, saturation) and min/max
//     brightness; the signature components are simple ratios and differences
//     of those accumulators, computed once at the end.
// 3.  **Determinism**: Extraction is a pure function of the buffer and its
//     dimensions. No shared state, no randomness — identical input yields a
//     bit-identical signature, which the tests rely on.
// 4.  **Guarded Arithmetic**: Every division that could see a zero denominator
//     is protected, either by an additive epsilon or by forcing the sample
//     count to one for degenerate grids.

pub mod signature {
    use crate::error::{EngineError, validate_rgb_buffer};

    pub type Byte = u8;
    pub type Feature = f32;
    pub type Brightness = f32;
    pub type Warmth = f32;
    pub type Saturation = f32;

    /// Number of components in a `PhotoSignature`.
    pub const FEATURE_COUNT: usize = 10;

    /// Pixels are sampled on this stride in both directions.
    const SAMPLE_STRIDE: usize = 8;

    /// Additive guard for ratio denominators that could reach zero.
    const RATIO_EPSILON: f32 = 0.001;

    // Rec. 601 luma weights.
    const LUMA_RED: f32 = 0.299;
    const LUMA_GREEN: f32 = 0.587;
    const LUMA_BLUE: f32 = 0.114;

    /// A compact numeric summary of one photo's color and tone character.
    ///
    /// Component layout:
    /// - `[0]` mean brightness (Rec. 601 luma)
    /// - `[1]`..`[3]` mean red / green / blue intensity
    /// - `[4]` brightness range (contrast proxy)
    /// - `[5]` warm/cool energy ratio
    /// - `[6]` mean saturation
    /// - `[7]` red/green ratio
    /// - `[8]` green/blue ratio
    /// - `[9]` (red+green)/blue ratio
    #[derive(Debug, Clone, PartialEq)]
    pub struct PhotoSignature {
        features: [Feature; FEATURE_COUNT],
    }

    impl PhotoSignature {
        pub fn from_features(features: [Feature; FEATURE_COUNT]) -> Self {
            Self { features }
        }

        /// The raw component array, in the layout documented on the type.
        pub fn features(&self) -> &[Feature; FEATURE_COUNT] {
            &self.features
        }

        pub fn brightness(&self) -> Brightness {
            self.features[0]
        }

        /// Brightness range across the sampled grid; the contrast proxy.
        pub fn contrast(&self) -> Feature {
            self.features[4]
        }

        /// Warm energy (red plus half green) over total warm+cool energy.
        pub fn warmth(&self) -> Warmth {
            self.features[5]
        }

        pub fn saturation(&self) -> Saturation {
            self.features[6]
        }

        pub fn red_green_ratio(&self) -> Feature {
            self.features[7]
        }
    }

    /// Reduces an interleaved RGB buffer to its `PhotoSignature`.
    ///
    /// The buffer must hold at least `width * height * 3` bytes, row-major,
    /// no padding. Rejects malformed input instead of producing a degenerate
    /// signature.
    pub fn extract(image: &[u8], width: u32, height: u32) -> Result<PhotoSignature, EngineError> {
        validate_rgb_buffer(image, width, height)?;

        let width = width as usize;
        let height = height as usize;
        let total_bytes = width * height * 3;

        let mut brightness_sum = 0.0f32;
        let mut red_sum = 0.0f32;
        let mut green_sum = 0.0f32;
        let mut blue_sum = 0.0f32;
        let mut min_brightness = 1.0f32;
        let mut max_brightness = 0.0f32;
        let mut warm_sum = 0.0f32;
        let mut cool_sum = 0.0f32;
        let mut saturation_sum = 0.0f32;
        let mut sample_count: usize = 0;

        for y in (0..height).step_by(SAMPLE_STRIDE) {
            for x in (0..width).step_by(SAMPLE_STRIDE) {
                let index = (y * width + x) * 3;
                if index + 2 >= total_bytes {
                    continue;
                }

                let red = image[index] as f32 / 255.0;
                let green = image[index + 1] as f32 / 255.0;
                let blue = image[index + 2] as f32 / 255.0;

                let brightness = LUMA_RED * red + LUMA_GREEN * green + LUMA_BLUE * blue;
                brightness_sum += brightness;
                red_sum += red;
                green_sum += green;
                blue_sum += blue;

                min_brightness = min_brightness.min(brightness);
                max_brightness = max_brightness.max(brightness);

                warm_sum += red + green * 0.5;
                cool_sum += blue;

                let max_channel = red.max(green).max(blue);
                let min_channel = red.min(green).min(blue);
                if max_channel > 0.0 {
                    saturation_sum += (max_channel - min_channel) / max_channel;
                }

                sample_count += 1;
            }
        }

        // Degenerate grids must never divide by zero.
        let samples = sample_count.max(1) as f32;

        Ok(PhotoSignature::from_features([
            brightness_sum / samples,
            red_sum / samples,
            green_sum / samples,
            blue_sum / samples,
            max_brightness - min_brightness,
            warm_sum / (warm_sum + cool_sum + RATIO_EPSILON),
            saturation_sum / samples,
            red_sum / (green_sum + RATIO_EPSILON),
            green_sum / (blue_sum + RATIO_EPSILON),
            (red_sum + green_sum) / (blue_sum + RATIO_EPSILON),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::signature::*;
    use crate::error::EngineError;

    fn uniform_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            buffer.extend_from_slice(&rgb);
        }
        buffer
    }

    #[test]
    fn extraction_is_deterministic() {
        let mut buffer = vec![0u8; 64 * 48 * 3];
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = (i * 31 % 256) as u8;
        }

        let first = extract(&buffer, 64, 48).expect("valid buffer");
        let second = extract(&buffer, 64, 48).expect("valid buffer");
        assert_eq!(first, second);
    }

    #[test]
    fn uniform_gray_signature_matches_known_statistics() {
        let buffer = uniform_rgb(16, 16, [128, 128, 128]);
        let sig = extract(&buffer, 16, 16).expect("valid buffer");

        // 128/255 under Rec. 601 weights sums back to 128/255.
        assert!((sig.brightness() - 0.502).abs() < 0.001);
        // Every sample is identical, so the brightness range collapses.
        assert_eq!(sig.contrast(), 0.0);
        // warm = cool * 1.5 per sample, so the ratio sits at 1.5/2.5.
        assert!((sig.warmth() - 0.6).abs() < 0.001);
        assert_eq!(sig.saturation(), 0.0);
        assert!((sig.red_green_ratio() - 1.0).abs() < 0.01);
    }

    #[test]
    fn pure_red_is_fully_saturated_and_warm() {
        let buffer = uniform_rgb(32, 32, [255, 0, 0]);
        let sig = extract(&buffer, 32, 32).expect("valid buffer");

        assert!((sig.saturation() - 1.0).abs() < 1e-6);
        assert!(sig.warmth() > 0.95);
        assert!((sig.brightness() - 0.299).abs() < 0.001);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let buffer = vec![0u8; 100];
        let result = extract(&buffer, 16, 16);
        assert_eq!(
            result,
            Err(EngineError::BufferTooSmall {
                expected: 768,
                actual: 100
            })
        );
    }

    #[test]
    fn zero_width_is_rejected() {
        let result = extract(&[], 0, 16);
        assert!(matches!(result, Err(EngineError::InvalidDimensions { .. })));
    }
}
