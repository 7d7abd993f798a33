//! Raw result set decoding.
//!
//! Columns are classified once, then every row is extracted cell by cell.
//! Any failure aborts the whole result set; there are no partial results.

use crate::db::session::{RawColumn, RawResultSet};
use crate::db::types::classify;
use crate::error::{XdbError, XdbResult};
use crate::models::{Field, FieldType, ResultSet, Row, Value};
use std::sync::Arc;

/// Decode a raw result set into typed rows.
pub fn decode_result_set(raw: RawResultSet) -> XdbResult<ResultSet> {
    let fields: Arc<[Field]> = raw
        .columns
        .iter()
        .map(classify_column)
        .collect::<XdbResult<Vec<_>>>()?
        .into();

    let rows = raw
        .rows
        .into_iter()
        .map(|cells| decode_row(&fields, cells))
        .collect::<XdbResult<Vec<_>>>()?;

    Ok(ResultSet::new(fields, rows))
}

/// Classify one column through the native type table.
pub fn classify_column(column: &RawColumn) -> XdbResult<Field> {
    column
        .type_code
        .and_then(classify)
        .map(|field_type| Field::new(column.name.clone(), field_type))
        .ok_or_else(|| XdbError::UnsupportedType {
            column: column.name.clone(),
            type_name: column.type_name.clone(),
            type_code: column.type_code,
        })
}

fn decode_row(fields: &Arc<[Field]>, cells: Vec<Option<Vec<u8>>>) -> XdbResult<Row> {
    if cells.len() != fields.len() {
        return Err(XdbError::result(format!(
            "row has {} cells but the result set has {} columns",
            cells.len(),
            fields.len()
        )));
    }

    let values = fields
        .iter()
        .zip(cells)
        .map(|(field, cell)| decode_value(field, cell.as_deref()))
        .collect::<XdbResult<Vec<_>>>()?;

    Ok(Row::new(fields.clone(), values))
}

/// Extract one cell according to its field type.
///
/// NULL is read as an empty span, so it becomes empty text in a string
/// column and a parse failure in an integer column.
pub fn decode_value(field: &Field, cell: Option<&[u8]>) -> XdbResult<Value> {
    let bytes = cell.unwrap_or_default();
    match field.field_type() {
        FieldType::String => Ok(Value::Text(
            String::from_utf8(bytes.to_vec())
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
        )),
        FieldType::Int => {
            let text = String::from_utf8_lossy(bytes);
            text.parse::<u64>()
                .map(Value::Int)
                .map_err(|source| XdbError::Parse {
                    column: field.name().to_string(),
                    value: text.into_owned(),
                    source,
                })
        }
        FieldType::Undefined => Err(XdbError::BadFieldType {
            column: field.name().to_string(),
        }),
    }
}
