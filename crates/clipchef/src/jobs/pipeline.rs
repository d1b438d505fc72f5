//! Staged analysis pipeline
//!
//! One spawned task per job walks download, transcription, and recipe
//! parsing in order, updating the store and pushing progress at every
//! stage boundary. The first stage error marks the job failed and halts
//! the run; errors never escape the spawned task.

use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::notifier::ProgressNotifier;
use super::record::{JobStage, JobStatus};
use super::store::JobStore;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::providers::{MediaFetcher, RecipeStructurer, Transcriber};
use crate::storage::JobWorkspace;
use crate::types::{AnalysisResult, StageTimings, Transcript, VideoSource};

// Progress bands per stage. Ordering is the contract; the numbers are
// display hints for clients.
const DOWNLOAD_START: u8 = 5;
const DOWNLOAD_DONE: u8 = 25;
const STT_START: u8 = 28;
const STT_DONE: u8 = 50;
const PARSE_START: u8 = 55;
const PARSE_DONE: u8 = 90;
const COMPLETE: u8 = 100;

/// Runs the download → transcribe → parse sequence for one job
pub struct AnalysisPipeline {
    store: Arc<JobStore>,
    notifier: ProgressNotifier,
    workspace: JobWorkspace,
    fetcher: Arc<dyn MediaFetcher>,
    transcriber: Arc<dyn Transcriber>,
    structurer: Arc<dyn RecipeStructurer>,
    min_transcript_chars: usize,
}

impl AnalysisPipeline {
    pub fn new(
        store: Arc<JobStore>,
        notifier: ProgressNotifier,
        fetcher: Arc<dyn MediaFetcher>,
        transcriber: Arc<dyn Transcriber>,
        structurer: Arc<dyn RecipeStructurer>,
        config: &PipelineConfig,
    ) -> Self {
        let workspace = store.workspace().clone();
        Self {
            store,
            notifier,
            workspace,
            fetcher,
            transcriber,
            structurer,
            min_transcript_chars: config.min_transcript_chars,
        }
    }

    /// Spawned entry point. Runs the staged sequence and absorbs any
    /// error into the job record.
    pub async fn run(self: Arc<Self>, job_id: Uuid, source: VideoSource) {
        if let Err(e) = self.execute(job_id, &source).await {
            let message = e.to_string();
            tracing::error!("Job {} failed: {}", job_id, message);
            self.store.fail(job_id, message);

            // Report the failure with the same fields the store now holds.
            // The record may have been evicted mid-run; nothing to report then.
            if let Some(record) = self.store.get(job_id) {
                self.notifier
                    .notify(
                        job_id,
                        record.status,
                        record.progress,
                        record.stage,
                        &record.message,
                    )
                    .await;
            }
        }
    }

    async fn execute(&self, job_id: Uuid, source: &VideoSource) -> Result<()> {
        let total_start = Instant::now();
        let job_dir = self.workspace.ensure_job_dir(job_id)?;

        // Stage 1: acquire video and audio
        self.progress(job_id, JobStage::Download, DOWNLOAD_START, "Downloading video...")
            .await;
        let stage_start = Instant::now();
        let asset = self.fetcher.fetch(&source.url, &job_dir).await?;
        let download_secs = StageTimings::round(stage_start.elapsed().as_secs_f64());
        tracing::info!(
            "Job {}: downloaded \"{}\" in {}s",
            job_id,
            asset.title,
            download_secs
        );
        self.store.set_video_info(job_id, asset.clone());
        self.progress(job_id, JobStage::Download, DOWNLOAD_DONE, "Download complete")
            .await;

        // Stage 2: speech to text
        self.progress(job_id, JobStage::Stt, STT_START, "Transcribing audio...")
            .await;
        let stage_start = Instant::now();
        let transcript = self.transcriber.transcribe(&asset.audio_path).await?;
        self.check_transcript(&transcript)?;
        let transcribe_secs = StageTimings::round(stage_start.elapsed().as_secs_f64());
        tracing::info!(
            "Job {}: transcribed {} chars in {}s (source: {})",
            job_id,
            transcript.char_count(),
            transcribe_secs,
            transcript.source
        );
        self.progress(job_id, JobStage::Stt, STT_DONE, "Transcript ready")
            .await;

        // Stage 3: structure the recipe
        self.progress(job_id, JobStage::Parsing, PARSE_START, "Parsing recipe...")
            .await;
        let stage_start = Instant::now();
        let recipe = self.structurer.structure(&transcript).await?;
        let parse_secs = StageTimings::round(stage_start.elapsed().as_secs_f64());
        tracing::info!(
            "Job {}: parsed recipe \"{}\" in {}s",
            job_id,
            recipe.title,
            parse_secs
        );
        self.progress(job_id, JobStage::Parsing, PARSE_DONE, "Recipe parsed")
            .await;

        // Finalize
        let timing = StageTimings {
            download_secs,
            transcribe_secs,
            parse_secs,
            total_secs: StageTimings::round(total_start.elapsed().as_secs_f64()),
            transcript_source: transcript.source.clone(),
        };
        tracing::info!("Job {} completed in {}s", job_id, timing.total_secs);
        let result = AnalysisResult {
            recipe,
            video_info: asset,
            transcript,
            timing,
        };
        self.store.complete(job_id, result);
        self.notifier
            .notify(
                job_id,
                JobStatus::Completed,
                COMPLETE,
                JobStage::Done,
                "Analysis complete!",
            )
            .await;

        Ok(())
    }

    /// Record a transition and push it to the callback in one step
    async fn progress(&self, job_id: Uuid, stage: JobStage, progress: u8, message: &str) {
        self.store.advance(job_id, stage, progress, message);
        self.notifier
            .notify(job_id, JobStatus::Processing, progress, stage, message)
            .await;
    }

    /// A transcript below the minimum length cannot yield a recipe, even
    /// though the transcriber itself succeeded
    fn check_transcript(&self, transcript: &Transcript) -> Result<()> {
        if transcript.char_count() < self.min_transcript_chars {
            return Err(Error::transcription(
                "no usable speech or text could be extracted from the video",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JobsConfig, NotifyConfig};
    use crate::types::{MediaAsset, Recipe, RecipeStep};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MediaFetcher for StubFetcher {
        async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<MediaAsset> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::download("video unavailable"));
            }
            Ok(MediaAsset {
                video_path: dest_dir.join("video.mp4"),
                audio_path: dest_dir.join("audio.mp3"),
                video_id: "dQw4w9WgXcQ".to_string(),
                title: "Kimchi stew in 3 minutes".to_string(),
                duration: 173,
                url: url.to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "stub-fetcher"
        }
    }

    struct StubTranscriber {
        text: String,
        calls: AtomicUsize,
    }

    impl StubTranscriber {
        fn with_text(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: text.to_string(),
                calls: AtomicUsize::new(0),
            })
        }

        fn ok() -> Arc<Self> {
            Self::with_text("First boil the anchovy stock, then add the aged kimchi and pork.")
        }
    }

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Transcript {
                full_text: self.text.clone(),
                segments: Vec::new(),
                language: Some("en".to_string()),
                duration: 173.0,
                source: "whisper".to_string(),
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub-transcriber"
        }
    }

    struct StubStructurer {
        calls: AtomicUsize,
    }

    impl StubStructurer {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RecipeStructurer for StubStructurer {
        async fn structure(&self, _transcript: &Transcript) -> Result<Recipe> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Recipe {
                title: "Kimchi stew".to_string(),
                description: None,
                servings: Some("2".to_string()),
                total_time: None,
                difficulty: None,
                ingredients: Vec::new(),
                steps: vec![RecipeStep {
                    step_number: 1,
                    instruction: "Boil the anchovy stock".to_string(),
                    timestamp: 12.5,
                    duration: None,
                    details: None,
                    tips: None,
                }],
                tips: Vec::new(),
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub-structurer"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn test_source() -> VideoSource {
        VideoSource::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap()
    }

    fn build(
        fetcher: Arc<dyn MediaFetcher>,
        transcriber: Arc<dyn Transcriber>,
        structurer: Arc<dyn RecipeStructurer>,
        notify_base: Option<String>,
    ) -> (Arc<JobStore>, Arc<AnalysisPipeline>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(JobStore::new(&JobsConfig {
            max_jobs: 100,
            expire_hours: 24,
            data_dir: tmp.path().to_path_buf(),
        }));
        let notifier = ProgressNotifier::new(&NotifyConfig {
            base_url: notify_base,
            timeout_secs: 1,
        });
        let pipeline = Arc::new(AnalysisPipeline::new(
            Arc::clone(&store),
            notifier,
            fetcher,
            transcriber,
            structurer,
            &PipelineConfig {
                min_transcript_chars: 20,
            },
        ));
        (store, pipeline, tmp)
    }

    fn submit(store: &JobStore, source: &VideoSource) -> Uuid {
        let id = Uuid::new_v4();
        store.create(id, source.url.clone(), Some(source.video_id.clone()));
        id
    }

    #[tokio::test]
    async fn test_happy_path_completes_with_result() {
        let (store, pipeline, _tmp) = build(
            StubFetcher::ok(),
            StubTranscriber::ok(),
            StubStructurer::ok(),
            None,
        );
        let source = test_source();
        let id = submit(&store, &source);

        pipeline.run(id, source).await;

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.stage, JobStage::Done);
        assert_eq!(record.progress, 100);
        assert_eq!(record.message, "Analysis complete!");
        assert!(record.video_info.is_some());

        let result = record.result.unwrap();
        assert_eq!(result.recipe.title, "Kimchi stew");
        assert_eq!(result.timing.transcript_source, "whisper");
        assert!(result.timing.total_secs >= 0.0);
    }

    #[tokio::test]
    async fn test_short_transcript_fails_before_parsing() {
        let structurer = StubStructurer::ok();
        let (store, pipeline, _tmp) = build(
            StubFetcher::ok(),
            StubTranscriber::with_text("uh"),
            Arc::clone(&structurer) as Arc<dyn RecipeStructurer>,
            None,
        );
        let source = test_source();
        let id = submit(&store, &source);

        pipeline.run(id, source).await;

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.progress, 0);
        assert!(record.message.contains("no usable speech or text"));
        assert!(record.result.is_none());
        assert_eq!(structurer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_failure_halts_run() {
        let transcriber = StubTranscriber::ok();
        let structurer = StubStructurer::ok();
        let (store, pipeline, _tmp) = build(
            StubFetcher::failing(),
            Arc::clone(&transcriber) as Arc<dyn Transcriber>,
            Arc::clone(&structurer) as Arc<dyn RecipeStructurer>,
            None,
        );
        let source = test_source();
        let id = submit(&store, &source);

        pipeline.run(id, source).await;

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.progress, 0);
        assert!(record.message.starts_with("Video download failed"));
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
        assert_eq!(structurer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_notifier_does_not_fail_job() {
        // Nothing listens on the discard port; every push fails, the run
        // must still complete.
        let (store, pipeline, _tmp) = build(
            StubFetcher::ok(),
            StubTranscriber::ok(),
            StubStructurer::ok(),
            Some("http://127.0.0.1:9".to_string()),
        );
        let source = test_source();
        let id = submit(&store, &source);

        pipeline.run(id, source).await;

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 100);
    }

    #[tokio::test]
    async fn test_run_survives_mid_flight_eviction() {
        let (store, pipeline, _tmp) = build(
            StubFetcher::ok(),
            StubTranscriber::ok(),
            StubStructurer::ok(),
            None,
        );
        let source = test_source();
        let id = submit(&store, &source);
        store.delete(id);

        // Every store write from here is a silent no-op.
        pipeline.run(id, source).await;
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_progress_bands_are_ordered() {
        assert!(DOWNLOAD_START < DOWNLOAD_DONE);
        assert!(DOWNLOAD_DONE < STT_START);
        assert!(STT_START < STT_DONE);
        assert!(STT_DONE < PARSE_START);
        assert!(PARSE_START < PARSE_DONE);
        assert!(PARSE_DONE < COMPLETE);
    }
}
