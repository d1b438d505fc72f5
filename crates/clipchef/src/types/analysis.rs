//! Completed analysis payload

use serde::{Deserialize, Serialize};

use super::{MediaAsset, Recipe, Transcript};

/// Wall-clock timings recorded per pipeline stage, rounded to centiseconds.
/// Advisory data for observability, never used for control decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    /// Video download stage
    pub download_secs: f64,
    /// Speech-to-text stage
    pub transcribe_secs: f64,
    /// Recipe parsing stage
    pub parse_secs: f64,
    /// End-to-end run
    pub total_secs: f64,
    /// Which extraction method produced the transcript (e.g. "whisper")
    pub transcript_source: String,
}

impl StageTimings {
    /// Round a stage duration the way timings are reported
    pub fn round(secs: f64) -> f64 {
        (secs * 100.0).round() / 100.0
    }
}

/// Everything a completed job hands back: the parsed recipe plus the
/// inputs used to produce it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The structured recipe
    pub recipe: Recipe,
    /// Download metadata for the source video
    pub video_info: MediaAsset,
    /// The transcript the recipe was parsed from
    pub transcript: Transcript,
    /// Per-stage timings
    pub timing: StageTimings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_centiseconds() {
        assert_eq!(StageTimings::round(1.23456), 1.23);
        assert_eq!(StageTimings::round(0.005), 0.01);
        assert_eq!(StageTimings::round(12.0), 12.0);
    }
}
