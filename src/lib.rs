// Stockfeed - Inventory feed exporter
// Copyright (c) 2025 Stockfeed Contributors
// Licensed under the MIT License

//! # Stockfeed - Inventory feed exporter
//!
//! Stockfeed reads an inventory table page by page, turns it into a small
//! CSV feed for a trading partner, uploads that feed over FTP or FTPS and
//! records every run in an audit table.
//!
//! ## Overview
//!
//! One run is a straight pipeline:
//! - **Reading** the source table with keyset pagination on its id column
//! - **Transforming** each row: trimmed part number, `round(quantity * ratio)`,
//!   rows that publish nothing are dropped
//! - **Writing** the CSV artifact and computing its statistics
//! - **Transferring** the artifact and comparing the remote size
//! - **Auditing** the outcome with exactly one row per run
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages (reader, transform, sink, transfer, audit, export)
//! - [`adapters`] - External integrations (PostgreSQL, PostgREST, FTP)
//! - [`domain`] - Records, statistics, audit rows and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockfeed::config::load_config;
//! use stockfeed::core::export::PipelineRunner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("stockfeed.toml")?;
//!     let runner = PipelineRunner::from_config(&config).await?;
//!
//!     let summary = runner.run().await;
//!     println!("Wrote {} lines", summary.stats.as_ref().map_or(0, |s| s.line_count));
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], whose error type is
//! [`domain::StockfeedError`]. A failed transfer is not an error: it is part
//! of the run's outcome and lands in the audit row.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
