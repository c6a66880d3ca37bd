//! PostgreSQL integration
//!
//! This module reads the inventory table and appends audit rows over a
//! pooled `tokio-postgres` connection.

pub mod adapter;
pub mod client;

pub use adapter::PostgreSQLAdapter;
pub use client::{PgFailure, PostgreSQLClient};
