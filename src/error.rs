//! Error types for xdb.
//!
//! Every failure is reported synchronously through [`XdbError`]. Variants are
//! grouped by where they surface: establishing the session, executing a
//! statement, decoding a result set, and accessing decoded values.

use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XdbError {
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Failed to retrieve result: {message}")]
    Result { message: String },

    #[error(
        "Unsupported column type {type_name} (type code {}) for column '{column}'",
        .type_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
    )]
    UnsupportedType {
        column: String,
        type_name: String,
        /// Native MySQL `enum_field_types` code, when the driver reported a known type.
        type_code: Option<u8>,
    },

    #[error("Column '{column}' holds '{value}', which is not an unsigned integer: {source}")]
    Parse {
        column: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Bad field type for column '{column}'")]
    BadFieldType { column: String },

    #[error("Type mismatch: expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown column '{name}'")]
    UnknownColumn { name: String },

    #[error("Column index {index} out of range (columns: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Result set does not have any rows")]
    EmptyResult,

    #[error("Statement returned no rows")]
    NoRows,

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl XdbError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query submission error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a result retrieval error.
    pub fn result(message: impl Into<String>) -> Self {
        Self::Result {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown column error.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    /// True for errors raised while turning a native result set into typed rows.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. } | Self::Parse { .. } | Self::BadFieldType { .. }
        )
    }

    /// True for errors raised by accessors on already decoded data.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. }
                | Self::UnknownColumn { .. }
                | Self::IndexOutOfRange { .. }
                | Self::EmptyResult
                | Self::NoRows
        )
    }
}

/// Result type alias for xdb operations.
pub type XdbResult<T> = Result<T, XdbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XdbError::connection("Access denied for user 'root'@'localhost'");
        assert_eq!(
            err.to_string(),
            "Connection failed: Access denied for user 'root'@'localhost'"
        );
    }

    #[test]
    fn test_unsupported_type_names_code() {
        let err = XdbError::UnsupportedType {
            column: "created_at".to_string(),
            type_name: "DATETIME".to_string(),
            type_code: Some(12),
        };
        let msg = err.to_string();
        assert!(msg.contains("type code 12"));
        assert!(msg.contains("created_at"));

        let err = XdbError::UnsupportedType {
            column: "c".to_string(),
            type_name: "VECTOR".to_string(),
            type_code: None,
        };
        assert!(err.to_string().contains("type code unknown"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let source = "abc".parse::<u64>().unwrap_err();
        let err = XdbError::Parse {
            column: "id".to_string(),
            value: "abc".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_decode_error());
        assert!(!err.is_access_error());
    }

    #[test]
    fn test_error_classification() {
        assert!(XdbError::NoRows.is_access_error());
        assert!(XdbError::EmptyResult.is_access_error());
        assert!(XdbError::unknown_column("x").is_access_error());
        assert!(
            XdbError::BadFieldType {
                column: "x".to_string()
            }
            .is_decode_error()
        );
        assert!(!XdbError::query("syntax").is_decode_error());
        assert!(!XdbError::query("syntax").is_access_error());
    }
}
