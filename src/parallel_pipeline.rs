// THEORY:
// The `parallel_pipeline` module is the concurrent front door to the engine.
// A host that captures and enhances frames from several tasks at once shares
// one profile through a `SharedPipeline`: every memory operation runs under a
// single mutex, so concurrent adds, clears, and processing calls linearize —
// no operation is ever observed half-applied.
//
// The expensive part of processing, the per-pixel transform, carries no
// shared state at all, so it runs entirely outside the lock: the frame is
// split into row bands and each band is mapped on its own tokio worker, then
// the bands are reassembled in order. The lock is held only for the brief
// bookkeeping-and-generate window, never across pixel work.

use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tracing::{debug, info};

use crate::core_modules::memory::PersonalMemory;
use crate::core_modules::parameters;
use crate::core_modules::signature::signature;
use crate::core_modules::transform::transform;
use crate::error::EngineError;
use crate::pipeline::{
    EnhancementParameters, FavoriteSummary, PersonalityStats, ProcessedPhoto,
};

/// Bands smaller than this are not worth a task spawn.
const MIN_ROWS_PER_BAND: usize = 16;

/// A cloneable, thread-safe handle to one shared personality profile.
#[derive(Clone)]
pub struct SharedPipeline {
    memory: Arc<Mutex<PersonalMemory>>,
    worker_count: usize,
}

impl Default for SharedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedPipeline {
    pub fn new() -> Self {
        Self {
            memory: Arc::new(Mutex::new(PersonalMemory::new())),
            worker_count: num_cpus::get().max(1),
        }
    }

    /// Learns from a favorite. Signature extraction runs outside the lock;
    /// the memory update inside it is atomic as observed by other handles.
    pub async fn add_favorite(
        &self,
        image: &[u8],
        width: u32,
        height: u32,
        parameters: EnhancementParameters,
    ) -> Result<FavoriteSummary, EngineError> {
        let sig = signature::extract(image, width, height)?;

        let (favorite_count, scene) = {
            let mut memory = self.memory.lock().unwrap();
            memory.add_favorite(sig, parameters)
        };

        info!(favorite_count, scene = %scene, "favorite added");

        Ok(FavoriteSummary {
            favorite_count,
            scene,
        })
    }

    /// Enhances a photo. Bookkeeping and parameter generation are linearized
    /// under the lock; the pixel transform fans out over row bands.
    pub async fn process_image(
        &self,
        image: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<ProcessedPhoto, EngineError> {
        let sig = signature::extract(&image, width, height)?;

        let (scene, params) = {
            let mut memory = self.memory.lock().unwrap();
            let scene = memory.note_processed(&sig);
            (scene, parameters::generate(&memory))
        };

        let pixels = self.transform_in_bands(image, width, height, params).await;

        debug!(width, height, scene = %scene, "image processed");

        Ok(ProcessedPhoto {
            pixels,
            parameters: params,
            scene,
        })
    }

    pub async fn set_learning_strength(&self, percent: i32) {
        self.memory.lock().unwrap().set_learning_strength(percent);
        info!(percent, "learning strength updated");
    }

    pub async fn clear(&self) {
        self.memory.lock().unwrap().clear();
        info!("personality memory cleared");
    }

    pub async fn stats(&self) -> PersonalityStats {
        let memory = self.memory.lock().unwrap();
        PersonalityStats {
            favorite_count: memory.favorite_count(),
            learning_strength: memory.learning_strength(),
            images_processed: memory.total_images_processed(),
            last_update: memory.last_update(),
            scene_patterns: *memory.scene_patterns(),
            average_warmth: memory.average_warmth(),
            average_saturation: memory.average_saturation(),
            most_common_scene: memory.most_common_scene(),
            contrast_bias: memory.contrast_bias(),
        }
    }

    /// Splits the frame into row bands and maps each band on its own worker.
    /// Band boundaries fall on whole rows, so every band is a valid span of
    /// interleaved pixels.
    async fn transform_in_bands(
        &self,
        image: Vec<u8>,
        width: u32,
        height: u32,
        params: EnhancementParameters,
    ) -> Vec<u8> {
        let width = width as usize;
        let height = height as usize;
        let row_bytes = width * 3;
        let rows_per_band = height.div_ceil(self.worker_count).max(MIN_ROWS_PER_BAND);

        if rows_per_band >= height {
            return transform::apply_slice(&image[..height * row_bytes], &params);
        }

        let input = Arc::new(image);
        let mut tasks = Vec::new();

        let mut start_row = 0;
        while start_row < height {
            let end_row = (start_row + rows_per_band).min(height);
            let input = Arc::clone(&input);
            let band_params = params;

            tasks.push(tokio::spawn(async move {
                let band = &input[start_row * row_bytes..end_row * row_bytes];
                transform::apply_slice(band, &band_params)
            }));

            start_row = end_row;
        }

        let mut output = Vec::with_capacity(height * row_bytes);
        for task in join_all(tasks).await {
            let band = task.expect("pixel worker panicked");
            output.extend_from_slice(&band);
        }
        output
    }
}
