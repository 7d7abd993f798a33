//! The seam between [`Connection`](crate::Connection) and the client driver.
//!
//! A [`Session`] submits one statement and hands back the result set exactly
//! as the driver sees it: column names with native type codes, and each cell
//! as a raw byte span in the MySQL text representation. Turning that into
//! typed rows is the job of [`decode`](crate::db::decode).

use crate::db::types::ColumnType;
use crate::error::XdbResult;
use crate::models::QueryParam;

/// Column metadata as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    /// Driver type name, kept for diagnostics.
    pub type_name: String,
    /// Native type code; `None` when the driver reported a type with no known code.
    pub type_code: Option<u8>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            type_name: column_type.name().to_string(),
            type_code: Some(column_type.code()),
        }
    }

    /// Build from a driver type name, resolving its native code.
    pub fn from_type_name(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let type_code = ColumnType::from_type_name(&type_name).map(ColumnType::code);
        Self {
            name: name.into(),
            type_name,
            type_code,
        }
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        self.type_code.and_then(ColumnType::from_code)
    }
}

/// A buffered, undecoded result set. `None` cells are SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResultSet {
    pub columns: Vec<RawColumn>,
    pub rows: Vec<Vec<Option<Vec<u8>>>>,
}

impl RawResultSet {
    pub fn new(columns: Vec<RawColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of text cells.
    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = Option<C>>,
        C: AsRef<[u8]>,
    {
        self.rows
            .push(cells.into_iter().map(|c| c.map(|b| b.as_ref().to_vec())).collect());
        self
    }
}

/// One exclusively owned session with a database server.
///
/// Implementations release the server session when dropped.
pub trait Session {
    /// Submit `sql` synchronously.
    ///
    /// Returns `Ok(None)` when the statement produced no result set. With an
    /// empty `params` slice the SQL text is sent verbatim; otherwise the values
    /// are bound server-side to the statement's `?` placeholders.
    fn execute(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<Option<RawResultSet>>;
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn execute(&mut self, sql: &str, params: &[QueryParam]) -> XdbResult<Option<RawResultSet>> {
        (**self).execute(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_column_from_type_name() {
        let col = RawColumn::from_type_name("id", "BIGINT UNSIGNED");
        assert_eq!(col.type_code, Some(8));
        assert_eq!(col.column_type(), Some(ColumnType::LongLong));

        let col = RawColumn::from_type_name("v", "VECTOR");
        assert_eq!(col.type_code, None);
        assert_eq!(col.type_name, "VECTOR");
    }

    #[test]
    fn test_with_row_copies_cells() {
        let raw = RawResultSet::new(vec![RawColumn::new("a", ColumnType::VarString)])
            .with_row([Some("x")])
            .with_row([None::<&str>]);
        assert_eq!(raw.rows, vec![vec![Some(b"x".to_vec())], vec![None]]);
    }
}
