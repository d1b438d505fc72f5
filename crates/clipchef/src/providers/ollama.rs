//! Ollama-backed recipe structurer with retry logic
//!
//! Sends the transcript to a local Ollama server in JSON mode and parses
//! the completion into a `Recipe`. Small local models produce malformed
//! output now and then, so every attempt (request and parse) retries with
//! exponential backoff before the stage is declared failed.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use super::structurer::RecipeStructurer;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::{Recipe, Transcript};

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: String,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Recipe extraction through a local Ollama server
pub struct OllamaStructurer {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_retries: u32,
}

impl OllamaStructurer {
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        }
    }

    /// One request plus parse. Retried by `structure`.
    async fn attempt(&self, prompt: &str) -> Result<Recipe> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: "json".to_string(),
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::recipe_parse(format!("generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::recipe_parse(format!(
                "generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::recipe_parse(format!("unreadable generation response: {}", e)))?;

        parse_recipe_json(&generate_response.response)
    }
}

#[async_trait]
impl RecipeStructurer for OllamaStructurer {
    async fn structure(&self, transcript: &Transcript) -> Result<Recipe> {
        let prompt = build_prompt(transcript);
        tracing::info!("Parsing recipe with model: {}", self.model);

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            match self.attempt(&prompt).await {
                Ok(recipe) => return Ok(recipe),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Recipe extraction failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::recipe_parse("unknown error")))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Transcript segments keep their timestamps so the model can anchor steps
/// to moments in the video
fn build_prompt(transcript: &Transcript) -> String {
    let mut body = String::new();
    if transcript.segments.is_empty() {
        body.push_str(&transcript.full_text);
    } else {
        for segment in &transcript.segments {
            body.push_str(&format!("[{:.1}s] {}\n", segment.start, segment.text));
        }
    }

    format!(
        "You are a recipe extraction assistant. Below is the transcript of a \
         short cooking video. Extract the recipe it describes as a single JSON \
         object with exactly these keys:\n\
         - \"title\": string\n\
         - \"description\": string or null\n\
         - \"servings\": string or null\n\
         - \"total_time\": string or null\n\
         - \"difficulty\": string or null\n\
         - \"ingredients\": array of {{\"name\", \"amount\", \"unit\", \"note\"}}\n\
         - \"steps\": array of {{\"stepNumber\", \"instruction\", \"timestamp\", \
         \"duration\", \"details\", \"tips\"}}\n\
         - \"tips\": array of strings\n\
         Number steps from 1. Use the [seconds] markers for each step's \
         \"timestamp\" when present. Use null for anything the transcript does \
         not state. Do not invent ingredients or steps. Respond with JSON only.\n\n\
         Transcript:\n{}",
        body
    )
}

/// Parse the model completion, tolerating code fences around the JSON
fn parse_recipe_json(raw: &str) -> Result<Recipe> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned)
        .map_err(|e| Error::recipe_parse(format!("model returned malformed recipe JSON: {}", e)))
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TranscriptSegment;

    fn transcript_with_segments() -> Transcript {
        Transcript {
            full_text: "First boil the anchovy stock. Add the aged kimchi.".to_string(),
            segments: vec![
                TranscriptSegment {
                    start: 0.0,
                    end: 4.0,
                    text: "First boil the anchovy stock.".to_string(),
                },
                TranscriptSegment {
                    start: 4.0,
                    end: 9.5,
                    text: "Add the aged kimchi.".to_string(),
                },
            ],
            language: Some("en".to_string()),
            duration: 9.5,
            source: "whisper".to_string(),
        }
    }

    #[test]
    fn test_prompt_includes_segment_timestamps() {
        let prompt = build_prompt(&transcript_with_segments());
        assert!(prompt.contains("[0.0s] First boil the anchovy stock."));
        assert!(prompt.contains("[4.0s] Add the aged kimchi."));
    }

    #[test]
    fn test_prompt_falls_back_to_full_text() {
        let transcript = Transcript {
            segments: Vec::new(),
            ..transcript_with_segments()
        };
        let prompt = build_prompt(&transcript);
        assert!(prompt.contains("First boil the anchovy stock. Add the aged kimchi."));
    }

    #[test]
    fn test_request_asks_for_json_mode() {
        let request = GenerateRequest {
            model: "llama3.2:3b".to_string(),
            prompt: "extract".to_string(),
            stream: false,
            format: "json".to_string(),
            options: GenerateOptions { temperature: 0.2 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], "json");
        assert_eq!(value["stream"], false);
        let temperature = value["options"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_recipe_from_clean_json() {
        let raw = r#"{
            "title": "Kimchi stew",
            "ingredients": [{"name": "aged kimchi", "amount": "300", "unit": "g"}],
            "steps": [{"stepNumber": 1, "instruction": "Boil the stock", "timestamp": 0.0}]
        }"#;
        let recipe = parse_recipe_json(raw).unwrap();
        assert_eq!(recipe.title, "Kimchi stew");
        assert_eq!(recipe.steps[0].step_number, 1);
        assert_eq!(recipe.ingredients[0].name, "aged kimchi");
    }

    #[test]
    fn test_parse_recipe_strips_code_fences() {
        let raw = "```json\n{\"title\": \"Kimchi stew\"}\n```";
        let recipe = parse_recipe_json(raw).unwrap();
        assert_eq!(recipe.title, "Kimchi stew");
    }

    #[test]
    fn test_parse_recipe_rejects_prose() {
        let e = parse_recipe_json("Sure! Here is the recipe you asked for.").unwrap_err();
        assert!(e.to_string().contains("malformed recipe JSON"));
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }
}
