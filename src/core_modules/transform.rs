// THEORY:
// The `transform` module is the engine's output stage: a stateless per-pixel
// map that applies the five enhancement knobs to an interleaved RGB buffer.
// Every pixel is handled independently — no neighborhood reads, no shared
// accumulators — which is what lets the parallel pipeline split a frame into
// row bands and process them on separate workers with no synchronization.
//
// The per-pixel stage order is fixed: warmth, exposure, contrast, saturation,
// clamp, byte scale. Reordering the stages changes the output, because each
// stage feeds the next (saturation in particular re-derives luma from the
// already-exposed, already-contrasted channels).
//
// Byte conversion truncates rather than rounds; a channel that survives the
// pipeline at exactly its input value can still come back one step lower.

use crate::core_modules::parameters::EnhancementParameters;
use crate::error::{EngineError, validate_rgb_buffer};

pub mod transform {
    use super::*;

    const LUMA_RED: f32 = 0.299;
    const LUMA_GREEN: f32 = 0.587;
    const LUMA_BLUE: f32 = 0.114;

    // Asymmetric warmth push: the boosted channel moves faster than the
    // attenuated one.
    const WARMTH_BOOST: f32 = 0.4;
    const WARMTH_ATTENUATION: f32 = 0.3;

    /// Applies the enhancement parameters to every pixel, returning a new
    /// buffer with the same dimensions and layout.
    pub fn apply(
        input: &[u8],
        width: u32,
        height: u32,
        params: &EnhancementParameters,
    ) -> Result<Vec<u8>, EngineError> {
        validate_rgb_buffer(input, width, height)?;
        let byte_count = (width as usize) * (height as usize) * 3;
        Ok(apply_slice(&input[..byte_count], params))
    }

    /// Applies the enhancement parameters, writing into a caller-supplied
    /// buffer of the same layout.
    pub fn apply_into(
        input: &[u8],
        output: &mut [u8],
        width: u32,
        height: u32,
        params: &EnhancementParameters,
    ) -> Result<(), EngineError> {
        validate_rgb_buffer(input, width, height)?;
        validate_rgb_buffer(output, width, height)?;

        let byte_count = (width as usize) * (height as usize) * 3;
        for (source, target) in input[..byte_count]
            .chunks_exact(3)
            .zip(output[..byte_count].chunks_exact_mut(3))
        {
            let (red, green, blue) = enhance_pixel(source[0], source[1], source[2], params);
            target[0] = red;
            target[1] = green;
            target[2] = blue;
        }
        Ok(())
    }

    /// Maps a raw span of interleaved RGB bytes. The span length must be a
    /// multiple of 3; the parallel pipeline feeds whole row bands through
    /// here without re-validating dimensions per band.
    pub fn apply_slice(pixels: &[u8], params: &EnhancementParameters) -> Vec<u8> {
        let mut output = Vec::with_capacity(pixels.len());
        for pixel in pixels.chunks_exact(3) {
            let (red, green, blue) = enhance_pixel(pixel[0], pixel[1], pixel[2], params);
            output.push(red);
            output.push(green);
            output.push(blue);
        }
        output
    }

    fn enhance_pixel(red: u8, green: u8, blue: u8, params: &EnhancementParameters) -> (u8, u8, u8) {
        let mut r = red as f32 / 255.0;
        let mut g = green as f32 / 255.0;
        let mut b = blue as f32 / 255.0;

        // Warmth: push red up and blue down above the midpoint, mirrored below.
        if params.warmth > 0.5 {
            r *= 1.0 + (params.warmth - 0.5) * WARMTH_BOOST;
            b *= 1.0 - (params.warmth - 0.5) * WARMTH_ATTENUATION;
        } else {
            b *= 1.0 + (0.5 - params.warmth) * WARMTH_BOOST;
            r *= 1.0 - (0.5 - params.warmth) * WARMTH_ATTENUATION;
        }

        r *= params.exposure;
        g *= params.exposure;
        b *= params.exposure;

        r = 0.5 + (r - 0.5) * params.contrast;
        g = 0.5 + (g - 0.5) * params.contrast;
        b = 0.5 + (b - 0.5) * params.contrast;

        // Saturation pulls each channel toward or away from the luma of the
        // already-adjusted pixel.
        let luma = LUMA_RED * r + LUMA_GREEN * g + LUMA_BLUE * b;
        r = luma + params.saturation * (r - luma);
        g = luma + params.saturation * (g - luma);
        b = luma + params.saturation * (b - luma);

        r = r.clamp(0.0, 1.0);
        g = g.clamp(0.0, 1.0);
        b = b.clamp(0.0, 1.0);

        ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }
}
