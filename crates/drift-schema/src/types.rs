//! Base type names shared by the desired model and the snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// SQL base types understood by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Small integer (16-bit).
    SmallInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string (length in the type spec).
    Varchar,
    /// Fixed-length character string.
    Char,
    /// Boolean.
    Boolean,
    /// Date and time.
    Timestamp,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Floating point (single precision).
    Real,
    /// Floating point (double precision).
    Double,
    /// Arbitrary-precision numeric (length = precision, precision = scale).
    Numeric,
    /// Binary data.
    Bytea,
    /// JSON document.
    Json,
    /// UUID.
    Uuid,
}

impl BaseType {
    /// Parses a lowercase type name from a schema document.
    pub fn parse(name: &str, context: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(Self::Integer),
            "bigint" => Ok(Self::BigInt),
            "smallint" => Ok(Self::SmallInt),
            "text" => Ok(Self::Text),
            "varchar" => Ok(Self::Varchar),
            "char" => Ok(Self::Char),
            "boolean" | "bool" => Ok(Self::Boolean),
            "timestamp" => Ok(Self::Timestamp),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "real" => Ok(Self::Real),
            "double" => Ok(Self::Double),
            "numeric" | "decimal" => Ok(Self::Numeric),
            "bytea" => Ok(Self::Bytea),
            "json" | "jsonb" => Ok(Self::Json),
            "uuid" => Ok(Self::Uuid),
            _ => Err(SchemaError::UnknownType {
                name: name.to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// Returns true if `name` spells a known base type.
    #[must_use]
    pub fn is_known(name: &str) -> bool {
        Self::parse(name, "").is_ok()
    }

    /// Renders the PostgreSQL spelling of this type with the given
    /// length/precision parameters.
    #[must_use]
    pub fn sql_name(&self, length: Option<u32>, precision: Option<u32>) -> String {
        match self {
            Self::Integer => "INTEGER".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::SmallInt => "SMALLINT".to_string(),
            Self::Text => "TEXT".to_string(),
            Self::Varchar => match length {
                Some(len) => format!("VARCHAR({})", len),
                None => "VARCHAR".to_string(),
            },
            Self::Char => match length {
                Some(len) => format!("CHAR({})", len),
                None => "CHAR".to_string(),
            },
            Self::Boolean => "BOOLEAN".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Time => "TIME".to_string(),
            Self::Real => "REAL".to_string(),
            Self::Double => "DOUBLE PRECISION".to_string(),
            Self::Numeric => match (length, precision) {
                (Some(p), Some(s)) => format!("NUMERIC({}, {})", p, s),
                (Some(p), None) => format!("NUMERIC({})", p),
                _ => "NUMERIC".to_string(),
            },
            Self::Bytea => "BYTEA".to_string(),
            Self::Json => "JSONB".to_string(),
            Self::Uuid => "UUID".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(BaseType::parse("bigint", "t").unwrap(), BaseType::BigInt);
        assert_eq!(BaseType::parse("VARCHAR", "t").unwrap(), BaseType::Varchar);
        assert_eq!(BaseType::parse("bool", "t").unwrap(), BaseType::Boolean);
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = BaseType::parse("blobby", "column users.id").unwrap_err();
        match err {
            SchemaError::UnknownType { name, context } => {
                assert_eq!(name, "blobby");
                assert_eq!(context, "column users.id");
            }
            other => panic!("Expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_sql_names() {
        assert_eq!(BaseType::BigInt.sql_name(None, None), "BIGINT");
        assert_eq!(BaseType::Varchar.sql_name(Some(255), None), "VARCHAR(255)");
        assert_eq!(
            BaseType::Numeric.sql_name(Some(10), Some(2)),
            "NUMERIC(10, 2)"
        );
        assert_eq!(BaseType::Double.sql_name(None, None), "DOUBLE PRECISION");
    }
}
