//! Configuration management for stockfeed.
//!
//! Configuration is read once from a TOML file and handed to each pipeline
//! component as an explicit section. Supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `STOCKFEED_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation with descriptive messages
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! backend = "postgresql"
//! table = "public.inventory"
//! page_size = 1000
//!
//! [source.columns]
//! part_number = ["part_number", "partNumber"]
//! quantity = ["quantity", "qty"]
//!
//! [postgresql]
//! connection_string = "${STOCKFEED_PG_URL}"
//!
//! [transform]
//! ratio = 0.8
//!
//! [transfer]
//! host = "ftp.partner.example"
//! username = "feed"
//! password = "${STOCKFEED_FTP_PASSWORD}"
//! remote_dir = "/inbound"
//! remote_name = "inventory.csv"
//! secure = true
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ArtifactConfig, AuditConfig, ColumnCandidates, LoggingConfig,
    PassiveMode, PostgRestConfig, PostgreSQLConfig, SourceBackend, SourceConfig,
    StockfeedConfig, TransferConfig, TransformConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
