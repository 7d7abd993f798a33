//! xdb: a typed, synchronous convenience layer over a MySQL client.
//!
//! A [`Connection`] issues SQL text and returns a [`ResultSet`] whose cells
//! are typed as text or 64-bit unsigned integers.
//!
//! ```no_run
//! let mut conn = xdb::Connection::connect("localhost", "root", "", "netunit", 3306)?;
//! conn.set_query_listener(|sql| eprintln!("{sql}"));
//! let row = xdb::single!(conn, "SELECT id, name FROM users WHERE id = {}", 1)?;
//! println!("{}", row.get("name")?.as_string());
//! # Ok::<(), xdb::XdbError>(())
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;

pub use config::Config;
pub use db::{Connection, quote, quote_identifier};
pub use error::{XdbError, XdbResult};
pub use models::{ConnectionConfig, Field, FieldType, QueryParam, ResultSet, Row, RowIndex, Value};
