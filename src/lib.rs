// THEORY:
// This file is the main entry point for the `personalens` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (a camera app, a
// gallery host, or a platform binding layer).
//
// The primary goal is to export the `PersonalizationPipeline` and its
// associated data structures (`EnhancementParameters`, `PersonalityStats`,
// etc.) as the clean, high-level interface for the entire engine. The
// internal analysis modules (`core_modules`) stay encapsulated behind it,
// with the `SharedPipeline` variant available for hosts that enhance frames
// from several tasks concurrently.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
