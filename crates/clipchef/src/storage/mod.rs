//! On-disk artifact management

pub mod workspace;

pub use workspace::JobWorkspace;
