//! External system integrations for stockfeed.
//!
//! This module provides adapters for the systems a run talks to:
//!
//! - [`datastore`] - Source and audit abstraction layer (trait-based)
//! - [`postgresql`] - PostgreSQL implementation
//! - [`postgrest`] - PostgREST (HTTP) implementation
//! - [`ftp`] - Partner file server over FTP/FTPS
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The pipeline only sees
//! [`datastore::SourceStore`], [`datastore::AuditSink`] and
//! [`ftp::FileTransport`].
//!
//! # Datastore
//!
//! ```rust,no_run
//! use stockfeed::adapters::datastore::create_datastore;
//! use stockfeed::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("stockfeed.toml")?;
//! let datastore = create_datastore(&config).await?;
//!
//! datastore.source.test_connection().await?;
//! for row in datastore.audit.recent(5).await? {
//!     println!("{} {}", row.run_id, row.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # File Transfer
//!
//! ```rust,no_run
//! use stockfeed::adapters::ftp::{FileTransport, FtpTransport};
//! use stockfeed::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("stockfeed.toml")?;
//! let transport = FtpTransport::new(config.transfer.clone());
//!
//! let mut session = transport.connect()?;
//! let entries = session.list(&config.transfer.remote_dir)?;
//! println!("{} remote entries", entries.len());
//! session.quit();
//! # Ok(())
//! # }
//! ```

pub mod datastore;
pub mod ftp;
pub mod postgresql;
pub mod postgrest;
