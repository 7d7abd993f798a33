//! Column metadata and cell values.

use crate::error::{XdbError, XdbResult};
use serde::Serialize;
use std::fmt;

/// Semantic type of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    /// Sentinel before classification; never present in a returned [`Field`].
    Undefined,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and type of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    name: String,
    field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// One decoded cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(u64),
}

impl Value {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::String,
            Self::Int(_) => FieldType::Int,
        }
    }

    /// Text payload, or the canonical decimal rendering of an integer.
    pub fn as_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(i) => i.to_string(),
        }
    }

    /// Borrow the text payload. Integers are not rendered here.
    pub fn as_str(&self) -> XdbResult<&str> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Int(_) => Err(self.mismatch(FieldType::String)),
        }
    }

    /// Integer payload. Text is never parsed.
    pub fn as_int(&self) -> XdbResult<u64> {
        match self {
            Self::Int(i) => Ok(*i),
            Self::Text(_) => Err(self.mismatch(FieldType::Int)),
        }
    }

    fn mismatch(&self, expected: FieldType) -> XdbError {
        XdbError::TypeMismatch {
            expected: expected.as_str(),
            found: self.field_type().as_str(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}
