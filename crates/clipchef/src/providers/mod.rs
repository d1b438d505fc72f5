//! Provider abstractions for media download, speech-to-text, and recipe structuring
//!
//! Trait seams let the pipeline run against stub collaborators in tests
//! and swap external tools without touching job logic.

pub mod fetcher;
pub mod ollama;
pub mod structurer;
pub mod transcriber;
pub mod whisper;
pub mod ytdlp;

pub use fetcher::MediaFetcher;
pub use ollama::OllamaStructurer;
pub use structurer::RecipeStructurer;
pub use transcriber::Transcriber;
pub use whisper::WhisperClient;
pub use ytdlp::YtDlpFetcher;
