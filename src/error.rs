//! Error types for the personalization engine.
//!
//! The engine rejects malformed pixel buffers loudly instead of producing a
//! degenerate signature or a half-written output frame.

use thiserror::Error;

/// Failures surfaced by the engine's buffer-consuming operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Width or height was zero; there are no pixels to analyze.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The pixel buffer is shorter than the interleaved RGB layout requires.
    #[error("pixel buffer too small: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },
}

/// Validates an interleaved 3-byte-per-pixel RGB buffer against its claimed
/// dimensions. Every buffer-consuming entry point funnels through this check.
pub fn validate_rgb_buffer(buffer: &[u8], width: u32, height: u32) -> Result<(), EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * 3;
    if buffer.len() < expected {
        return Err(EngineError::BufferTooSmall {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}
