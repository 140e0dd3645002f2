// THEORY:
// `PersonalMemory` is the stateful heart of the engine — the only component
// that remembers anything between calls. It learns a user's taste from the
// photos they mark as favorites, and nothing else: processing an image for
// display is observed (a counter, a transient scene) but never teaches.
//
// Key architectural principles:
// 1.  **Bounded Memory**: Favorites live in a `VecDeque` with a fixed
//     capacity. When the ring is full the oldest entry is evicted before the
//     new one is appended, so memory use is constant and the profile tracks
//     the user's *recent* taste rather than their whole history.
// 2.  **Exponential Forgetting**: The bias vector is an exponential moving
//     average over favorite signatures. Each addition pulls every component
//     toward the new signature by `0.1 * (learning_strength / 100)` — old
//     preferences fade geometrically instead of being dropped at a cliff.
// 3.  **Single Mutation Surface**: All state transitions go through the
//     methods here. Callers that need concurrency wrap one instance in a
//     lock; the struct itself carries no synchronization so the synchronous
//     pipeline pays nothing for it.
// 4.  **Transient vs. Learned State**: `current_scene` and the processed
//     counter are bookkeeping that reset on `clear`; `learning_strength` is
//     user configuration and deliberately survives it.

use std::collections::VecDeque;
use std::time::SystemTime;

use crate::core_modules::parameters::EnhancementParameters;
use crate::core_modules::scene::SceneCategory;
use crate::core_modules::signature::signature::{FEATURE_COUNT, Feature, PhotoSignature};

/// Maximum number of favorites retained; the oldest is evicted beyond this.
pub const FAVORITE_CAPACITY: usize = 100;

/// Default learning strength percentage for a fresh profile.
pub const DEFAULT_LEARNING_STRENGTH: i32 = 75;

/// Bias update rate at 100% learning strength.
const BASE_LEARN_RATE: f32 = 0.1;

/// Every bias component starts here; 0.5 is the "no preference" midpoint.
const NEUTRAL_BIAS: Feature = 0.5;

/// One user-marked photo: its signature and the parameters the user chose.
#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub signature: PhotoSignature,
    pub parameters: EnhancementParameters,
}

/// The user's learned photography profile.
#[derive(Debug, Clone)]
pub struct PersonalMemory {
    /// Chronological ring of recent favorites; front is oldest.
    favorites: VecDeque<Favorite>,
    /// Exponentially averaged estimate of the user's preferred signature.
    bias: [Feature; FEATURE_COUNT],
    /// Percentage controlling the bias update rate and personalization depth.
    /// Stored exactly as the caller set it.
    learning_strength: i32,
    /// Wall-clock time of the last favorite addition.
    last_update: SystemTime,
    /// Occurrence counters, indexed by `SceneCategory::index`.
    scene_patterns: [u32; SceneCategory::COUNT],
    /// The most recently classified scene, from either a favorite addition
    /// or an image-processing call.
    current_scene: SceneCategory,
    /// Monotonic count of image-processing calls; distinct from favorites.
    total_images_processed: u64,
}

impl Default for PersonalMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonalMemory {
    pub fn new() -> Self {
        Self {
            favorites: VecDeque::with_capacity(FAVORITE_CAPACITY),
            bias: [NEUTRAL_BIAS; FEATURE_COUNT],
            learning_strength: DEFAULT_LEARNING_STRENGTH,
            last_update: SystemTime::now(),
            scene_patterns: [0; SceneCategory::COUNT],
            current_scene: SceneCategory::default(),
            total_images_processed: 0,
        }
    }

    /// Records a favorite: evicts the oldest entry if the ring is full,
    /// appends the new pair, counts the classified scene, and pulls the bias
    /// vector toward the new signature.
    ///
    /// Returns the new favorite count and the classified scene.
    pub fn add_favorite(
        &mut self,
        signature: PhotoSignature,
        parameters: EnhancementParameters,
    ) -> (usize, SceneCategory) {
        if self.favorites.len() >= FAVORITE_CAPACITY {
            self.favorites.pop_front();
        }

        let scene = SceneCategory::classify(&signature);
        self.scene_patterns[scene.index()] += 1;
        self.current_scene = scene;
        self.last_update = SystemTime::now();

        let rate = BASE_LEARN_RATE * (self.learning_strength as f32 / 100.0);
        for (bias, feature) in self.bias.iter_mut().zip(signature.features()) {
            *bias = *bias * (1.0 - rate) + feature * rate;
        }

        self.favorites.push_back(Favorite {
            signature,
            parameters,
        });

        (self.favorites.len(), scene)
    }

    /// Bookkeeping for an image-processing call: bumps the processed counter
    /// and records the classified scene. Never touches favorites, bias, or
    /// the scene counters — only favorites teach.
    pub fn note_processed(&mut self, signature: &PhotoSignature) -> SceneCategory {
        self.total_images_processed += 1;
        let scene = SceneCategory::classify(signature);
        self.current_scene = scene;
        scene
    }

    /// Overwrites the learning strength. The value is stored as given, even
    /// outside [0, 100]; out-of-range values scale the update rate and
    /// personalization depth proportionally.
    pub fn set_learning_strength(&mut self, percent: i32) {
        self.learning_strength = percent;
    }

    /// Resets the learned profile: favorites, bias, scene counters, the
    /// processed counter, and the transient scene. Learning strength is user
    /// configuration and survives.
    pub fn clear(&mut self) {
        self.favorites.clear();
        self.bias = [NEUTRAL_BIAS; FEATURE_COUNT];
        self.scene_patterns = [0; SceneCategory::COUNT];
        self.current_scene = SceneCategory::default();
        self.total_images_processed = 0;
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn learning_strength(&self) -> i32 {
        self.learning_strength
    }

    pub fn total_images_processed(&self) -> u64 {
        self.total_images_processed
    }

    pub fn last_update(&self) -> SystemTime {
        self.last_update
    }

    pub fn current_scene(&self) -> SceneCategory {
        self.current_scene
    }

    pub fn scene_patterns(&self) -> &[u32; SceneCategory::COUNT] {
        &self.scene_patterns
    }

    pub fn bias(&self) -> &[Feature; FEATURE_COUNT] {
        &self.bias
    }

    /// The bias component steering contrast; surfaced in the stats snapshot.
    pub fn contrast_bias(&self) -> Feature {
        self.bias[4]
    }

    /// Mean warmth parameter across stored favorites; 0.0 for an empty ring.
    pub fn average_warmth(&self) -> f32 {
        self.average_parameter(|p| p.warmth)
    }

    /// Mean saturation parameter across stored favorites; 0.0 for an empty ring.
    pub fn average_saturation(&self) -> f32 {
        self.average_parameter(|p| p.saturation)
    }

    fn average_parameter(&self, component: impl Fn(&EnhancementParameters) -> f32) -> f32 {
        if self.favorites.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .favorites
            .iter()
            .map(|favorite| component(&favorite.parameters))
            .sum();
        sum / self.favorites.len() as f32
    }

    /// The scene with the highest counter. Ties resolve to the lowest index,
    /// so an empty profile reports the first category.
    pub fn most_common_scene(&self) -> SceneCategory {
        let mut best = 0;
        for (index, &count) in self.scene_patterns.iter().enumerate() {
            if count > self.scene_patterns[best] {
                best = index;
            }
        }
        crate::core_modules::scene::ALL_SCENES[best]
    }

    /// Iterator over the stored favorites, oldest first.
    pub fn favorites(&self) -> impl Iterator<Item = &Favorite> {
        self.favorites.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature_with_brightness(brightness: f32) -> PhotoSignature {
        let mut features = [0.5f32; FEATURE_COUNT];
        features[0] = brightness;
        PhotoSignature::from_features(features)
    }

    #[test]
    fn ring_evicts_oldest_after_capacity() {
        let mut memory = PersonalMemory::new();

        for i in 0..=FAVORITE_CAPACITY {
            let brightness = i as f32 / 1000.0;
            memory.add_favorite(
                signature_with_brightness(brightness),
                EnhancementParameters::default(),
            );
        }

        assert_eq!(memory.favorite_count(), FAVORITE_CAPACITY);

        let stored: Vec<f32> = memory
            .favorites()
            .map(|favorite| favorite.signature.brightness())
            .collect();
        // The very first addition (brightness 0.0) was evicted.
        assert_eq!(stored[0], 1.0 / 1000.0);
        // The 101st addition is present at the back.
        assert_eq!(stored[FAVORITE_CAPACITY - 1], 100.0 / 1000.0);
    }

    #[test]
    fn bias_moves_toward_signature_at_learning_rate() {
        let mut memory = PersonalMemory::new();
        let bright = PhotoSignature::from_features([1.0; FEATURE_COUNT]);

        memory.add_favorite(bright, EnhancementParameters::default());

        // Default strength 75% gives rate 0.075: 0.5 * 0.925 + 1.0 * 0.075.
        for &component in memory.bias() {
            assert!((component - 0.5375).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_learning_strength_freezes_bias() {
        let mut memory = PersonalMemory::new();
        memory.set_learning_strength(0);

        memory.add_favorite(
            PhotoSignature::from_features([1.0; FEATURE_COUNT]),
            EnhancementParameters::default(),
        );

        assert_eq!(memory.bias(), &[0.5; FEATURE_COUNT]);
    }

    #[test]
    fn processing_observes_but_never_teaches() {
        let mut memory = PersonalMemory::new();
        let sig = signature_with_brightness(0.45);

        let scene = memory.note_processed(&sig);

        assert_eq!(scene, SceneCategory::Indoor);
        assert_eq!(memory.current_scene(), SceneCategory::Indoor);
        assert_eq!(memory.total_images_processed(), 1);
        assert_eq!(memory.favorite_count(), 0);
        assert_eq!(memory.bias(), &[0.5; FEATURE_COUNT]);
        assert_eq!(memory.scene_patterns(), &[0; SceneCategory::COUNT]);
    }

    #[test]
    fn clear_resets_profile_but_keeps_learning_strength() {
        let mut memory = PersonalMemory::new();
        memory.set_learning_strength(40);
        memory.add_favorite(
            signature_with_brightness(0.45),
            EnhancementParameters::default(),
        );
        memory.note_processed(&signature_with_brightness(0.45));

        memory.clear();

        assert_eq!(memory.favorite_count(), 0);
        assert_eq!(memory.total_images_processed(), 0);
        assert_eq!(memory.bias(), &[0.5; FEATURE_COUNT]);
        assert_eq!(memory.scene_patterns(), &[0; SceneCategory::COUNT]);
        assert_eq!(memory.current_scene(), SceneCategory::Unknown);
        assert_eq!(memory.learning_strength(), 40);
    }

    #[test]
    fn most_common_scene_ties_resolve_to_lowest_index() {
        let mut memory = PersonalMemory::new();
        assert_eq!(memory.most_common_scene(), SceneCategory::Portrait);

        // One Indoor favorite (brightness 0.45) and one Sunset favorite.
        memory.add_favorite(
            signature_with_brightness(0.45),
            EnhancementParameters::default(),
        );
        let mut warm = [0.5f32; FEATURE_COUNT];
        warm[0] = 0.65;
        warm[5] = 0.9;
        memory.add_favorite(
            PhotoSignature::from_features(warm),
            EnhancementParameters::default(),
        );

        // Indoor (index 4) vs Sunset (index 3): tie resolves to Sunset.
        assert_eq!(memory.most_common_scene(), SceneCategory::Sunset);
    }

    #[test]
    fn average_parameters_track_stored_favorites() {
        let mut memory = PersonalMemory::new();
        assert_eq!(memory.average_warmth(), 0.0);

        let mut cool = EnhancementParameters::default();
        cool.warmth = 0.3;
        cool.saturation = 1.0;
        let mut warm = EnhancementParameters::default();
        warm.warmth = 0.7;
        warm.saturation = 1.4;

        memory.add_favorite(signature_with_brightness(0.45), cool);
        memory.add_favorite(signature_with_brightness(0.45), warm);

        assert!((memory.average_warmth() - 0.5).abs() < 1e-6);
        assert!((memory.average_saturation() - 1.2).abs() < 1e-6);
    }
}
