//! Job tracking and the staged analysis pipeline
//!
//! A submission mints a `JobRecord` in the bounded `JobStore`, then an
//! `AnalysisPipeline` task walks the stages and reports progress through
//! the store and the optional `ProgressNotifier`.

pub mod notifier;
pub mod pipeline;
pub mod record;
pub mod store;

pub use notifier::ProgressNotifier;
pub use pipeline::AnalysisPipeline;
pub use record::{JobRecord, JobStage, JobStatus};
pub use store::{JobStore, StoreStats};
