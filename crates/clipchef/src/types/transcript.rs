//! Speech transcripts with segment timing and provenance

use serde::{Deserialize, Serialize};

/// One timed span of transcribed speech
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    /// Transcribed text
    pub text: String,
}

/// Full transcript of a media asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Concatenated text of all segments
    pub full_text: String,
    /// Timed segments in playback order
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
    /// Detected or forced language code
    #[serde(default)]
    pub language: Option<String>,
    /// Audio duration in seconds (end of the last segment)
    #[serde(default)]
    pub duration: f64,
    /// Extraction method that produced this transcript (e.g. "whisper")
    pub source: String,
}

impl Transcript {
    /// Character count of the full text, used for the minimum-length check
    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_is_chars_not_bytes() {
        let transcript = Transcript {
            full_text: "김치찌개 끓이기".to_string(),
            segments: Vec::new(),
            language: Some("ko".to_string()),
            duration: 0.0,
            source: "whisper".to_string(),
        };
        assert_eq!(transcript.char_count(), 8);
    }
}
