//! Core types for the analysis service

pub mod analysis;
pub mod media;
pub mod recipe;
pub mod transcript;

pub use analysis::{AnalysisResult, StageTimings};
pub use media::{MediaAsset, VideoSource};
pub use recipe::{Ingredient, Recipe, RecipeStep};
pub use transcript::{Transcript, TranscriptSegment};
