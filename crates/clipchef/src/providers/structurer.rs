//! Recipe structuring trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Recipe, Transcript};

/// Trait for extracting a structured recipe from a transcript
///
/// Implementations:
/// - `OllamaStructurer`: local Ollama server (llama3.2, qwen2.5, etc.)
#[async_trait]
pub trait RecipeStructurer: Send + Sync {
    /// Parse the transcript into a structured recipe
    async fn structure(&self, transcript: &Transcript) -> Result<Recipe>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
