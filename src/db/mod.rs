//! Database access layer.
//!
//! This module provides:
//! - The typed [`Connection`]
//! - The [`Session`] seam and its sqlx-backed MySQL implementation
//! - Native type classification and result decoding
//! - SQL template macros and quoting helpers

pub mod connection;
pub mod decode;
pub mod escape;
#[macro_use]
pub mod macros;
pub mod mysql;
pub(crate) mod params;
pub(crate) mod schema;
pub mod session;
pub mod types;

pub use connection::{Connection, QueryListener};
pub use escape::{quote, quote_identifier};
pub use mysql::MySqlSession;
pub use session::{RawColumn, RawResultSet, Session};
pub use types::{ColumnType, classify};
