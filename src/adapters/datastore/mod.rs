//! Datastore abstraction layer
//!
//! This module provides a trait-based abstraction over the inventory source
//! and the audit log, allowing stockfeed to work with different backends
//! (PostgreSQL, PostgREST).

pub mod factory;
pub mod traits;

pub use factory::{create_datastore, Datastore};
pub use traits::{AuditSink, SourceStore};
