//! Source reading
//!
//! - [`schema`] - Resolves configured column candidates to real columns once
//! - [`cursor`] - Keyset pagination with a monotonic cursor

pub mod cursor;
pub mod schema;

pub use cursor::CursorReader;
pub use schema::SchemaMapping;
