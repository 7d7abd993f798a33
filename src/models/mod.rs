//! Data models for xdb.
//!
//! This module re-exports all model types used throughout the crate.

pub mod connection;
pub mod query;
pub mod result;
pub mod value;

// Re-export commonly used types
pub use connection::{ConnectionConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PORT};
pub use query::QueryParam;
pub use result::{ResultSet, Row, RowIndex};
pub use value::{Field, FieldType, Value};
