//! Native MySQL column types and their classification.
//!
//! # Architecture
//!
//! Type handling uses a two-phase approach:
//! 1. The session reports each column's native type code (`enum_field_types`
//!    in the MySQL protocol), resolved from the driver's type name.
//! 2. [`classify`] maps that code onto a [`FieldType`] through a fixed table.
//!
//! The table is closed: a code outside it is rejected, never coerced.

use crate::models::FieldType;

/// MySQL protocol column type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColumnType {
    Decimal = 0,
    Tiny = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    LongLong = 8,
    Int24 = 9,
    Date = 10,
    Time = 11,
    Datetime = 12,
    Year = 13,
    VarChar = 15,
    Bit = 16,
    Json = 245,
    NewDecimal = 246,
    Enum = 247,
    Set = 248,
    TinyBlob = 249,
    MediumBlob = 250,
    LongBlob = 251,
    Blob = 252,
    VarString = 253,
    String = 254,
    Geometry = 255,
}

impl ColumnType {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Decimal,
            1 => Self::Tiny,
            2 => Self::Short,
            3 => Self::Long,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::Null,
            7 => Self::Timestamp,
            8 => Self::LongLong,
            9 => Self::Int24,
            10 => Self::Date,
            11 => Self::Time,
            12 => Self::Datetime,
            13 => Self::Year,
            15 => Self::VarChar,
            16 => Self::Bit,
            245 => Self::Json,
            246 => Self::NewDecimal,
            247 => Self::Enum,
            248 => Self::Set,
            249 => Self::TinyBlob,
            250 => Self::MediumBlob,
            251 => Self::LongBlob,
            252 => Self::Blob,
            253 => Self::VarString,
            254 => Self::String,
            255 => Self::Geometry,
            _ => return None,
        })
    }

    /// Resolve the type name sqlx reports for a MySQL column.
    ///
    /// sqlx folds flags into the name (`BIGINT UNSIGNED`, `VARBINARY`,
    /// `TEXT` for non-binary blobs, `ENUM` for flagged strings); the folding
    /// is undone here.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let upper = type_name.trim().to_ascii_uppercase();
        let base = upper.strip_suffix(" UNSIGNED").unwrap_or(upper.as_str());

        Some(match base {
            "BOOLEAN" | "TINYINT" => Self::Tiny,
            "SMALLINT" => Self::Short,
            "INT" => Self::Long,
            "MEDIUMINT" => Self::Int24,
            "BIGINT" => Self::LongLong,
            "DECIMAL" => Self::NewDecimal,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "NULL" => Self::Null,
            "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::Datetime,
            "YEAR" => Self::Year,
            "BIT" => Self::Bit,
            "JSON" => Self::Json,
            "SET" => Self::Set,
            "GEOMETRY" => Self::Geometry,
            // ENUM travels as STRING with a flag that sqlx folds into the name
            "CHAR" | "BINARY" | "ENUM" => Self::String,
            "VARCHAR" | "VARBINARY" => Self::VarString,
            "TINYBLOB" | "TINYTEXT" => Self::TinyBlob,
            "MEDIUMBLOB" | "MEDIUMTEXT" => Self::MediumBlob,
            "LONGBLOB" | "LONGTEXT" => Self::LongBlob,
            "BLOB" | "TEXT" => Self::Blob,
            _ => return None,
        })
    }

    /// True for the integer family, whose cells sqlx decodes by width.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Tiny | Self::Short | Self::Long | Self::Int24 | Self::LongLong
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Decimal => "DECIMAL",
            Self::Tiny => "TINY",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Null => "NULL",
            Self::Timestamp => "TIMESTAMP",
            Self::LongLong => "LONGLONG",
            Self::Int24 => "INT24",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Datetime => "DATETIME",
            Self::Year => "YEAR",
            Self::VarChar => "VARCHAR",
            Self::Bit => "BIT",
            Self::Json => "JSON",
            Self::NewDecimal => "NEWDECIMAL",
            Self::Enum => "ENUM",
            Self::Set => "SET",
            Self::TinyBlob => "TINY_BLOB",
            Self::MediumBlob => "MEDIUM_BLOB",
            Self::LongBlob => "LONG_BLOB",
            Self::Blob => "BLOB",
            Self::VarString => "VAR_STRING",
            Self::String => "STRING",
            Self::Geometry => "GEOMETRY",
        }
    }
}

/// Map a native type code onto the semantic field type.
///
/// Returns `None` for any code outside the supported table.
pub fn classify(type_code: u8) -> Option<FieldType> {
    match ColumnType::from_code(type_code)? {
        ColumnType::String | ColumnType::VarString | ColumnType::VarChar => Some(FieldType::String),
        ColumnType::Long
        | ColumnType::Int24
        | ColumnType::Short
        | ColumnType::Tiny
        | ColumnType::Decimal
        | ColumnType::NewDecimal
        | ColumnType::LongLong => Some(FieldType::Int),
        _ => None,
    }
}
