//! Core business logic for stockfeed.
//!
//! # Modules
//!
//! - [`reader`] - Schema mapping and cursor-based pagination over the source
//! - [`transform`] - Quantity adjustment and record validation
//! - [`sink`] - Streaming CSV artifact writer with run statistics
//! - [`transfer`] - Upload-then-verify against the partner's file server
//! - [`audit`] - Exactly-once audit row per run
//! - [`export`] - Run orchestration, summary and exit codes
//!
//! # Run Workflow
//!
//! 1. **Resolve schema**: map configured column candidates to real columns
//! 2. **Read**: page through the table in ascending id order
//! 3. **Transform**: adjust quantities, drop invalid rows
//! 4. **Write**: stream accepted rows into the CSV artifact
//! 5. **Transfer**: upload, overwrite, re-list and verify
//! 6. **Audit**: append one row describing the run, even after failures
//!
//! # Example
//!
//! ```rust,no_run
//! use stockfeed::config::load_config;
//! use stockfeed::core::export::PipelineRunner;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("stockfeed.toml")?;
//! let runner = PipelineRunner::from_config(&config).await?;
//!
//! let summary = runner.run().await;
//! println!("Lines: {:?}", summary.stats.as_ref().map(|s| s.line_count));
//! std::process::exit(summary.exit_code());
//! # }
//! ```

pub mod audit;
pub mod export;
pub mod reader;
pub mod sink;
pub mod transfer;
pub mod transform;
