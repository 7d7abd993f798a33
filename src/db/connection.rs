//! The typed, synchronous connection.

use crate::db::decode::decode_result_set;
use crate::db::mysql::MySqlSession;
use crate::db::schema::queries;
use crate::db::session::Session;
use crate::error::{XdbError, XdbResult};
use crate::models::{ConnectionConfig, QueryParam, ResultSet, Row, Value};
use std::fmt;
use tracing::debug;

/// Callback observing each statement's final SQL text.
pub type QueryListener = Box<dyn FnMut(&str) + Send>;

/// One exclusively owned session with a MySQL server.
///
/// Not `Clone`. The session is released exactly once, when the connection is
/// dropped; a moved-from binding cannot be used again, so there is nothing to
/// release twice. All methods block the calling thread.
pub struct Connection<S: Session = MySqlSession> {
    session: S,
    database: String,
    listener: Option<QueryListener>,
}

impl Connection<MySqlSession> {
    /// Open a session to `host:port` bound to `database`.
    pub fn connect(
        host: &str,
        user: &str,
        password: &str,
        database: &str,
        port: u16,
    ) -> XdbResult<Self> {
        Self::connect_with(&ConnectionConfig::new(host, user, password, database, port))
    }

    pub fn connect_with(config: &ConnectionConfig) -> XdbResult<Self> {
        let session = MySqlSession::open(config)?;
        Ok(Self::with_session(session, config.database.clone()))
    }
}

impl<S: Session> Connection<S> {
    /// Wrap an already open session.
    pub fn with_session(session: S, database: impl Into<String>) -> Self {
        Self {
            session,
            database: database.into(),
            listener: None,
        }
    }

    /// The schema this connection is bound to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Install a callback that receives each statement's SQL text right
    /// before it is submitted. Replaces any previous callback.
    pub fn set_query_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_query_listener(&mut self) {
        self.listener = None;
    }

    /// Execute a statement and discard its result.
    pub fn query(&mut self, sql: &str) -> XdbResult<()> {
        self.execute(sql, &[]).map(drop)
    }

    /// Execute a statement and return its full result set.
    ///
    /// Statements that produce no result set yield an empty [`ResultSet`].
    pub fn select(&mut self, sql: &str) -> XdbResult<ResultSet> {
        self.execute(sql, &[])
    }

    /// Execute a statement and return its first row.
    pub fn single(&mut self, sql: &str) -> XdbResult<Row> {
        first_row(self.execute(sql, &[])?)
    }

    /// Execute a statement and return the first column of its first row.
    pub fn scalar(&mut self, sql: &str) -> XdbResult<Value> {
        first_value(self.execute(sql, &[])?)
    }

    /// Like [`query`](Self::query), binding `params` to `?` placeholders.
    pub fn query_with(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<()> {
        self.execute(sql, params).map(drop)
    }

    pub fn select_with(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<ResultSet> {
        self.execute(sql, params)
    }

    pub fn single_with(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<Row> {
        first_row(self.execute(sql, params)?)
    }

    pub fn scalar_with(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<Value> {
        first_value(self.execute(sql, params)?)
    }

    /// Whether a table named `name` exists in this connection's schema.
    ///
    /// Fails with `InvalidConfig` when the connection has no bound schema.
    pub fn is_table_exists(&mut self, name: &str) -> XdbResult<bool> {
        if self.database.is_empty() {
            return Err(XdbError::invalid_config(
                "table existence checks need a bound database",
            ));
        }
        let params = [
            QueryParam::from(self.database.as_str()),
            QueryParam::from(name),
        ];
        let count = self.scalar_with(queries::TABLE_EXISTS, &params)?;
        Ok(count.as_int()? != 0)
    }

    fn execute(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<ResultSet> {
        if let Some(listener) = self.listener.as_mut() {
            listener(sql);
        }
        debug!(
            sql_len = sql.len(),
            params = params.len(),
            "Executing statement"
        );

        match self.session.execute(sql, params)? {
            Some(raw) => {
                let result = decode_result_set(raw)?;
                debug!(
                    rows = result.num_rows(),
                    columns = result.num_columns(),
                    "Statement returned a result set"
                );
                Ok(result)
            }
            None => Ok(ResultSet::empty()),
        }
    }
}

impl<S: Session> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("database", &self.database)
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

fn first_row(result: ResultSet) -> XdbResult<Row> {
    result.into_rows().into_iter().next().ok_or(XdbError::NoRows)
}

fn first_value(result: ResultSet) -> XdbResult<Value> {
    first_row(result)?
        .into_values()
        .into_iter()
        .next()
        .ok_or(XdbError::NoRows)
}
