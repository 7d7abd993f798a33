//! sqlx-backed MySQL session.
//!
//! sqlx is asynchronous; each [`MySqlSession`] owns a private current-thread
//! tokio runtime and blocks on it for every call, which gives the crate its
//! synchronous API. Do not use a session from inside another tokio runtime.

use crate::db::params::bound_query;
use crate::db::session::{RawColumn, RawResultSet, Session};
use crate::error::{XdbError, XdbResult};
use crate::models::{ConnectionConfig, QueryParam};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow, MySqlTypeInfo};
use sqlx::{Column as _, ConnectOptions as _, Connection as _, Executor as _};
use sqlx::{MySql, Row as _, Statement as _, Type, TypeInfo as _};
use std::fmt;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

/// An exclusively owned MySQL session. Closed exactly once, on drop.
pub struct MySqlSession {
    runtime: Runtime,
    conn: Option<MySqlConnection>,
    options: MySqlConnectOptions,
    connect_timeout: Option<Duration>,
    reconnect: bool,
    masked_url: String,
}

impl MySqlSession {
    /// Start the runtime and perform the server handshake.
    pub fn open(config: &ConnectionConfig) -> XdbResult<Self> {
        config.validate()?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| XdbError::connection(format!("Failed to start I/O runtime: {e}")))?;

        let options = connect_options(config);
        let connect_timeout = config.connect_timeout();
        let conn = establish(&runtime, &options, connect_timeout)?;

        let masked_url = config.masked_url();
        info!(url = %masked_url, "Connected to MySQL");

        Ok(Self {
            runtime,
            conn: Some(conn),
            options,
            connect_timeout,
            reconnect: config.reconnect,
            masked_url,
        })
    }

    /// Reopen a session dropped after a transport failure.
    fn ensure_connected(&mut self) -> XdbResult<()> {
        if self.conn.is_none() {
            warn!(url = %self.masked_url, "Re-establishing MySQL session");
            self.conn = Some(establish(
                &self.runtime,
                &self.options,
                self.connect_timeout,
            )?);
        }
        Ok(())
    }
}

impl Session for MySqlSession {
    fn execute(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<Option<RawResultSet>> {
        self.ensure_connected()?;

        let Self {
            runtime,
            conn,
            reconnect,
            ..
        } = self;
        let connection = conn
            .as_mut()
            .ok_or_else(|| XdbError::connection("Session is closed"))?;

        let rows = match runtime.block_on(fetch_rows(connection, sql, params)) {
            Ok(rows) => rows,
            Err(e) => {
                if *reconnect && is_transport_error(&e) {
                    warn!(error = %e, "MySQL session lost; it will be reopened before the next statement");
                    *conn = None;
                }
                return Err(XdbError::query(e.to_string()));
            }
        };

        if let Some(first) = rows.first() {
            let columns: Vec<RawColumn> = first
                .columns()
                .iter()
                .map(|c| RawColumn::from_type_name(c.name(), c.type_info().name()))
                .collect();
            let binary = !params.is_empty();
            let cells = rows
                .iter()
                .map(|row| read_cells(row, &columns, binary))
                .collect::<XdbResult<Vec<_>>>()?;
            return Ok(Some(RawResultSet {
                columns,
                rows: cells,
            }));
        }

        // No rows came back; only the statement's metadata can tell an empty
        // result set apart from a statement without one.
        match runtime.block_on(connection.prepare(sql)) {
            Ok(statement) => {
                let columns: Vec<RawColumn> = statement
                    .columns()
                    .iter()
                    .map(|c| RawColumn::from_type_name(c.name(), c.type_info().name()))
                    .collect();
                if columns.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(RawResultSet::new(columns)))
                }
            }
            Err(sqlx::Error::Database(e)) => {
                debug!(error = %e, "Statement cannot be described; treating as no result set");
                Ok(None)
            }
            Err(e) => Err(XdbError::result(e.to_string())),
        }
    }
}

impl Drop for MySqlSession {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            match self.runtime.block_on(conn.close()) {
                Ok(()) => debug!(url = %self.masked_url, "MySQL session closed"),
                Err(e) => debug!(url = %self.masked_url, error = %e, "MySQL session closed uncleanly"),
            }
        }
    }
}

impl fmt::Debug for MySqlSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlSession")
            .field("url", &self.masked_url)
            .field("open", &self.conn.is_some())
            .field("reconnect", &self.reconnect)
            .finish()
    }
}

fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .charset("utf8mb4")
        // No prepared statement outlives its call, including the metadata prepare
        .statement_cache_capacity(0);

    if config.database.is_empty() {
        options
    } else {
        options.database(&config.database)
    }
}

fn establish(
    runtime: &Runtime,
    options: &MySqlConnectOptions,
    connect_timeout: Option<Duration>,
) -> XdbResult<MySqlConnection> {
    runtime.block_on(async {
        let result = match connect_timeout {
            Some(limit) => tokio::time::timeout(limit, options.connect())
                .await
                .map_err(|_| {
                    XdbError::connection(format!(
                        "Handshake timed out after {}s",
                        limit.as_secs()
                    ))
                })?,
            None => options.connect().await,
        };
        result.map_err(|e| XdbError::connection(e.to_string()))
    })
}

async fn fetch_rows(
    conn: &mut MySqlConnection,
    sql: &str,
    params: &[QueryParam],
) -> Result<Vec<MySqlRow>, sqlx::Error> {
    if params.is_empty() {
        // Text protocol: every cell arrives in its textual form
        sqlx::raw_sql(sql).fetch_all(&mut *conn).await
    } else {
        bound_query(sql, params).fetch_all(&mut *conn).await
    }
}

/// Copy a row's cells out as text spans.
///
/// Bound statements come back in the binary protocol, where integers are
/// little-endian; those are rendered to decimal text here so decoding sees a
/// single representation.
fn read_cells(
    row: &MySqlRow,
    columns: &[RawColumn],
    binary: bool,
) -> XdbResult<Vec<Option<Vec<u8>>>> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let cell = match column.column_type() {
                Some(ty) if binary && ty.is_integer() => {
                    let unsigned = row
                        .columns()
                        .get(idx)
                        .is_some_and(|c| is_unsigned(c.type_info()));
                    read_integer_text(row, idx, unsigned)
                }
                _ => row
                    .try_get_unchecked::<Option<&[u8]>, _>(idx)
                    .map(|bytes| bytes.map(<[u8]>::to_vec)),
            };
            cell.map_err(|e| {
                XdbError::result(format!("Failed to read column '{}': {}", column.name, e))
            })
        })
        .collect()
}

/// Signedness from the column flags; the type name drops `UNSIGNED` for
/// `TINYINT(1)`, which sqlx reports as `BOOLEAN`.
fn is_unsigned(type_info: &MySqlTypeInfo) -> bool {
    <u64 as Type<MySql>>::compatible(type_info)
}

fn read_integer_text(
    row: &MySqlRow,
    idx: usize,
    unsigned: bool,
) -> Result<Option<Vec<u8>>, sqlx::Error> {
    let text = if unsigned {
        row.try_get_unchecked::<Option<u64>, _>(idx)?
            .map(|v| v.to_string())
    } else {
        row.try_get_unchecked::<Option<i64>, _>(idx)?
            .map(|v| v.to_string())
    };
    Ok(text.map(String::into_bytes))
}

fn is_transport_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_)
    )
}
