//! Application state for the analysis server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::Config;
use crate::jobs::{AnalysisPipeline, JobStore, ProgressNotifier};
use crate::providers::{
    MediaFetcher, OllamaStructurer, RecipeStructurer, Transcriber, WhisperClient, YtDlpFetcher,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: Config,
    /// Bounded job registry
    store: Arc<JobStore>,
    /// Staged analysis pipeline
    pipeline: Arc<AnalysisPipeline>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with the default providers
    pub fn new(config: Config) -> Self {
        let fetcher: Arc<dyn MediaFetcher> = Arc::new(YtDlpFetcher::new(&config.fetch));
        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperClient::new(&config.stt));
        let structurer: Arc<dyn RecipeStructurer> = Arc::new(OllamaStructurer::new(&config.llm));
        Self::with_providers(config, fetcher, transcriber, structurer)
    }

    /// Create application state with explicit providers (used by tests)
    pub fn with_providers(
        config: Config,
        fetcher: Arc<dyn MediaFetcher>,
        transcriber: Arc<dyn Transcriber>,
        structurer: Arc<dyn RecipeStructurer>,
    ) -> Self {
        let store = Arc::new(JobStore::new(&config.jobs));
        tracing::info!(
            "Job store initialized (max {} jobs, {}h retention)",
            config.jobs.max_jobs,
            config.jobs.expire_hours
        );

        let notifier = ProgressNotifier::new(&config.notify);
        let pipeline = Arc::new(AnalysisPipeline::new(
            Arc::clone(&store),
            notifier,
            fetcher,
            transcriber,
            structurer,
            &config.pipeline,
        ));
        tracing::info!("Analysis pipeline initialized");

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                pipeline,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the job store
    pub fn store(&self) -> &Arc<JobStore> {
        &self.inner.store
    }

    /// Get the analysis pipeline
    pub fn pipeline(&self) -> &Arc<AnalysisPipeline> {
        &self.inner.pipeline
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
