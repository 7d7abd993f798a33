//! Decoded rows and result sets.
//!
//! A [`ResultSet`] owns its field list once; every [`Row`] shares it through
//! an `Arc`, so name lookups on a row resolve against the same metadata the
//! result set reports.

use super::value::{Field, Value};
use crate::error::{XdbError, XdbResult};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A type that can locate a value within a [`Row`].
///
/// Implemented for `usize` (position) and `&str` (first column with that name).
pub trait RowIndex: std::fmt::Debug {
    fn index(&self, row: &Row) -> XdbResult<usize>;
}

impl RowIndex for usize {
    fn index(&self, row: &Row) -> XdbResult<usize> {
        if *self < row.len() {
            Ok(*self)
        } else {
            Err(XdbError::IndexOutOfRange {
                index: *self,
                len: row.len(),
            })
        }
    }
}

impl RowIndex for &str {
    fn index(&self, row: &Row) -> XdbResult<usize> {
        row.fields
            .iter()
            .position(|f| f.name() == *self)
            .ok_or_else(|| XdbError::unknown_column(*self))
    }
}

/// One row of a result set, positionally aligned with its fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Arc<[Field]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(fields: Arc<[Field]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(fields.len(), values.len());
        Self { fields, values }
    }

    /// Get a value by position or by column name.
    pub fn get<I: RowIndex>(&self, index: I) -> XdbResult<&Value> {
        let idx = index.index(self)?;
        Ok(&self.values[idx])
    }

    /// Get an integer column.
    pub fn get_int<I: RowIndex>(&self, index: I) -> XdbResult<u64> {
        self.get(index)?.as_int()
    }

    /// Get a column rendered as text.
    pub fn get_string<I: RowIndex>(&self, index: I) -> XdbResult<String> {
        Ok(self.get(index)?.as_string())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Column name / value pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&Field, &Value)> {
        self.fields.iter().zip(self.values.iter())
    }

    /// Convert to a JSON object. Repeated column names keep the first value.
    pub fn to_json_map(&self) -> serde_json::Map<String, JsonValue> {
        let mut map = serde_json::Map::with_capacity(self.len());
        for (field, value) in self.columns() {
            if map.contains_key(field.name()) {
                continue;
            }
            let json = match value {
                Value::Text(s) => JsonValue::String(s.clone()),
                Value::Int(i) => JsonValue::Number((*i).into()),
            };
            map.insert(field.name().to_string(), json);
        }
        map
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Fully decoded result of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    fields: Arc<[Field]>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// The result of a statement that produced no result set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(fields: Arc<[Field]>, rows: Vec<Row>) -> Self {
        Self { fields, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// The first row; fails on an empty result set.
    pub fn single(&self) -> XdbResult<&Row> {
        self.rows.first().ok_or(XdbError::EmptyResult)
    }

    /// Bounds-checked row access.
    pub fn row(&self, index: usize) -> XdbResult<&Row> {
        self.rows.get(index).ok_or(XdbError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn sample() -> ResultSet {
        let fields: Arc<[Field]> = vec![
            Field::new("id", FieldType::Int),
            Field::new("name", FieldType::String),
            Field::new("id", FieldType::String),
        ]
        .into();
        let rows = vec![
            Row::new(
                fields.clone(),
                vec![Value::Int(1), Value::from("alice"), Value::from("dup")],
            ),
            Row::new(
                fields.clone(),
                vec![Value::Int(2), Value::from("bob"), Value::from("dup")],
            ),
        ];
        ResultSet::new(fields, rows)
    }

    #[test]
    fn test_counts_match_contents() {
        let result = sample();
        assert_eq!(result.num_rows(), result.rows().len());
        assert_eq!(result.num_columns(), result.fields().len());
        for row in &result {
            assert_eq!(row.len(), result.num_columns());
        }
    }

    #[test]
    fn test_get_by_name_returns_first_match() {
        let result = sample();
        let row = result.single().unwrap();
        assert_eq!(row.get("id").unwrap(), &Value::Int(1));
        assert_eq!(row.get_int("id").unwrap(), 1);
        assert_eq!(row.get_string("name").unwrap(), "alice");
    }

    #[test]
    fn test_get_unknown_column() {
        let result = sample();
        let err = result.rows()[0].get("missing_column").unwrap_err();
        assert!(matches!(err, XdbError::UnknownColumn { name } if name == "missing_column"));
    }

    #[test]
    fn test_get_index_out_of_range() {
        let result = sample();
        let row = &result.rows()[1];
        assert_eq!(row.get(1).unwrap().as_str().unwrap(), "bob");
        let err = row.get(999).unwrap_err();
        assert!(matches!(err, XdbError::IndexOutOfRange { index: 999, len: 3 }));
    }

    #[test]
    fn test_default_row_is_empty() {
        let row = Row::default();
        assert!(row.is_empty());
        assert!(row.fields().is_empty());
        assert!(matches!(
            row.get(0),
            Err(XdbError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(matches!(row.get("id"), Err(XdbError::UnknownColumn { .. })));
    }

    #[test]
    fn test_empty_result_set() {
        let result = ResultSet::empty();
        assert_eq!(result.num_rows(), 0);
        assert_eq!(result.num_columns(), 0);
        assert!(result.fields().is_empty());
        assert!(result.rows().is_empty());
        assert!(matches!(result.single(), Err(XdbError::EmptyResult)));
        assert!(matches!(result.row(0), Err(XdbError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_to_json_map_keeps_first_duplicate() {
        let result = sample();
        let map = result.rows()[0].to_json_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["id"], serde_json::json!(1));
        assert_eq!(map["name"], serde_json::json!("alice"));
    }
}
