//! Export orchestration
//!
//! This module provides the run orchestration for stockfeed:
//! - Pipeline coordination ([`PipelineRunner`])
//! - Summary, reporting and exit codes ([`RunSummary`])

pub mod runner;
pub mod summary;

pub use runner::PipelineRunner;
pub use summary::{RunSummary, EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK, EXIT_RUN_FAILED};
