// THEORY:
// The `pipeline` module is the top-level API for the personalization engine.
// It owns the single `PersonalMemory` instance and wires the stateless
// analysis stages around it, exposing the handful of operations a host
// application needs: learn from a favorite, enhance a photo, tune the
// learning strength, wipe the profile, and read a stats snapshot.
//
// The pipeline deliberately owns no platform concerns. Pixel buffers come in
// as plain interleaved RGB slices and leave the same way; timestamps are
// `SystemTime`; the stats snapshot is raw numbers for the host to format.
// Telemetry is emitted through `tracing` at the entry points so a host can
// subscribe or ignore it wholesale.

use std::time::SystemTime;

use tracing::{debug, info};

use crate::core_modules::memory::PersonalMemory;
use crate::core_modules::parameters;
use crate::core_modules::signature::signature;
use crate::core_modules::transform::transform;
use crate::error::EngineError;

// Re-export key data structures for the public API.
pub use crate::core_modules::memory::{DEFAULT_LEARNING_STRENGTH, FAVORITE_CAPACITY};
pub use crate::core_modules::parameters::EnhancementParameters;
pub use crate::core_modules::scene::SceneCategory;
pub use crate::core_modules::signature::signature::PhotoSignature;

/// Result of marking a photo as a favorite.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteSummary {
    /// Number of favorites stored after this addition.
    pub favorite_count: usize,
    /// The scene the favorite was classified as.
    pub scene: SceneCategory,
}

/// Output of one image-processing call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPhoto {
    /// The enhanced frame; same dimensions and layout as the input.
    pub pixels: Vec<u8>,
    /// The parameters that were actually applied, for host-side logging/UI.
    pub parameters: EnhancementParameters,
    /// The scene the frame was classified as.
    pub scene: SceneCategory,
}

/// Read-only snapshot of the learned profile. The host owns any user-facing
/// formatting of these numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalityStats {
    pub favorite_count: usize,
    pub learning_strength: i32,
    pub images_processed: u64,
    pub last_update: SystemTime,
    /// Occurrence counters, indexed by `SceneCategory::index`.
    pub scene_patterns: [u32; SceneCategory::COUNT],
    /// Mean warmth parameter across stored favorites; 0.0 when empty.
    pub average_warmth: f32,
    /// Mean saturation parameter across stored favorites; 0.0 when empty.
    pub average_saturation: f32,
    pub most_common_scene: SceneCategory,
    /// The bias component steering contrast.
    pub contrast_bias: f32,
}

/// The main, top-level struct for the personalization engine.
pub struct PersonalizationPipeline {
    memory: PersonalMemory,
}

impl Default for PersonalizationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonalizationPipeline {
    pub fn new() -> Self {
        Self {
            memory: PersonalMemory::new(),
        }
    }

    /// A pipeline whose profile starts at the given learning strength
    /// instead of the default.
    pub fn with_learning_strength(percent: i32) -> Self {
        let mut pipeline = Self::new();
        pipeline.memory.set_learning_strength(percent);
        pipeline
    }

    /// Learns from a user-marked favorite: extracts the photo's signature,
    /// stores it with the user's chosen parameters, and updates the bias.
    pub fn add_favorite(
        &mut self,
        image: &[u8],
        width: u32,
        height: u32,
        parameters: EnhancementParameters,
    ) -> Result<FavoriteSummary, EngineError> {
        let sig = signature::extract(image, width, height)?;
        let (favorite_count, scene) = self.memory.add_favorite(sig, parameters);

        info!(favorite_count, scene = %scene, "favorite added");

        Ok(FavoriteSummary {
            favorite_count,
            scene,
        })
    }

    /// Enhances a photo with parameters derived from the learned profile.
    /// Observes the frame (counter, transient scene) but never learns from it.
    pub fn process_image(
        &mut self,
        image: &[u8],
        width: u32,
        height: u32,
    ) -> Result<ProcessedPhoto, EngineError> {
        let sig = signature::extract(image, width, height)?;
        let scene = self.memory.note_processed(&sig);
        let params = parameters::generate(&self.memory);
        let pixels = transform::apply(image, width, height, &params)?;

        debug!(
            processed = self.memory.total_images_processed(),
            width,
            height,
            scene = %scene,
            exposure = params.exposure,
            contrast = params.contrast,
            saturation = params.saturation,
            warmth = params.warmth,
            "image processed"
        );

        Ok(ProcessedPhoto {
            pixels,
            parameters: params,
            scene,
        })
    }

    /// Overwrites the learning strength percentage. Stored as given; values
    /// outside [0, 100] scale the personalization proportionally.
    pub fn set_learning_strength(&mut self, percent: i32) {
        self.memory.set_learning_strength(percent);
        info!(percent, "learning strength updated");
    }

    /// Wipes the learned profile. Learning strength survives.
    pub fn clear(&mut self) {
        self.memory.clear();
        info!("personality memory cleared");
    }

    /// A read-only snapshot of the profile for host-side display.
    pub fn stats(&self) -> PersonalityStats {
        PersonalityStats {
            favorite_count: self.memory.favorite_count(),
            learning_strength: self.memory.learning_strength(),
            images_processed: self.memory.total_images_processed(),
            last_update: self.memory.last_update(),
            scene_patterns: *self.memory.scene_patterns(),
            average_warmth: self.memory.average_warmth(),
            average_saturation: self.memory.average_saturation(),
            most_common_scene: self.memory.most_common_scene(),
            contrast_bias: self.memory.contrast_bias(),
        }
    }

    /// Direct read access to the underlying profile, for advanced hosts.
    pub fn memory(&self) -> &PersonalMemory {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            buffer.extend_from_slice(&rgb);
        }
        buffer
    }

    #[test]
    fn fresh_pipeline_enhances_with_defaults() {
        let mut pipeline = PersonalizationPipeline::new();
        let frame = uniform_rgb(16, 16, [128, 128, 128]);

        let processed = pipeline
            .process_image(&frame, 16, 16)
            .expect("valid buffer");

        assert_eq!(processed.parameters, EnhancementParameters::default());
        assert_eq!(processed.scene, SceneCategory::Indoor);
        assert_eq!(processed.pixels.len(), frame.len());
        assert_eq!(pipeline.stats().images_processed, 1);
    }

    #[test]
    fn favorites_shape_later_processing() {
        let mut pipeline = PersonalizationPipeline::with_learning_strength(100);
        // A warm, bright favorite: classifies as Sunset.
        let favorite = uniform_rgb(32, 32, [250, 180, 60]);

        let summary = pipeline
            .add_favorite(&favorite, 32, 32, EnhancementParameters::default())
            .expect("valid buffer");
        assert_eq!(summary.favorite_count, 1);
        assert_eq!(summary.scene, SceneCategory::Sunset);

        let processed = pipeline
            .process_image(&favorite, 32, 32)
            .expect("valid buffer");
        assert_ne!(processed.parameters, EnhancementParameters::default());
        assert!(processed.parameters.is_within_bounds());
    }

    #[test]
    fn stats_snapshot_reflects_profile() {
        let mut pipeline = PersonalizationPipeline::new();
        let favorite = uniform_rgb(16, 16, [250, 180, 60]);

        let mut chosen = EnhancementParameters::default();
        chosen.warmth = 0.7;
        pipeline
            .add_favorite(&favorite, 16, 16, chosen)
            .expect("valid buffer");

        let stats = pipeline.stats();
        assert_eq!(stats.favorite_count, 1);
        assert_eq!(stats.learning_strength, DEFAULT_LEARNING_STRENGTH);
        assert_eq!(stats.images_processed, 0);
        assert_eq!(stats.most_common_scene, SceneCategory::Sunset);
        assert_eq!(stats.scene_patterns[SceneCategory::Sunset.index()], 1);
        assert!((stats.average_warmth - 0.7).abs() < 1e-6);
    }

    #[test]
    fn clear_through_the_pipeline_preserves_strength() {
        let mut pipeline = PersonalizationPipeline::with_learning_strength(30);
        let frame = uniform_rgb(16, 16, [128, 128, 128]);
        pipeline
            .add_favorite(&frame, 16, 16, EnhancementParameters::default())
            .expect("valid buffer");

        pipeline.clear();

        let stats = pipeline.stats();
        assert_eq!(stats.favorite_count, 0);
        assert_eq!(stats.images_processed, 0);
        assert_eq!(stats.learning_strength, 30);
    }

    #[test]
    fn malformed_buffers_are_rejected_by_both_entry_points() {
        let mut pipeline = PersonalizationPipeline::new();
        let short = vec![0u8; 5];

        assert!(
            pipeline
                .add_favorite(&short, 16, 16, EnhancementParameters::default())
                .is_err()
        );
        assert!(pipeline.process_image(&short, 16, 16).is_err());
        // Neither failed call left a trace in the profile.
        assert_eq!(pipeline.stats().favorite_count, 0);
        assert_eq!(pipeline.stats().images_processed, 0);
    }
}
