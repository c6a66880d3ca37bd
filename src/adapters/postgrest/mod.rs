//! PostgREST integration
//!
//! HTTP backend for deployments where the inventory table is only reachable
//! through a PostgREST-compatible API.

pub mod client;

pub use client::PostgRestClient;
