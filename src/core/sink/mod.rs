//! Artifact serialization
//!
//! Accepted records are streamed into a CSV file (`partNumber,quantity`, `\n`
//! line endings, RFC 4180 quoting) while [`crate::domain::RunStats`] is kept up
//! to date. The artifact is sized and checksummed once it is closed.

pub mod checksum;
pub mod writer;

pub use writer::{ArtifactLayout, FinishedArtifact, SinkWriter};
