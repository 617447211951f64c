//! SQL type conversion utilities
//!
//! This module maps PostgreSQL column types reported by the driver onto the
//! Rust type used to decode them into a [`Value`](crate::Value).

/// How a result column is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Text,
    Uuid,
    Timestamp,
    TimestampTz,
    Date,
    Json,
    Unsupported,
}

/// Map a PostgreSQL type name (as reported by the driver) to its decode kind
pub fn pg_type_to_column_kind(pg_type: &str) -> ColumnKind {
    match pg_type.trim().to_ascii_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => ColumnKind::Bool,
        "INT2" | "SMALLINT" | "SMALLSERIAL" => ColumnKind::SmallInt,
        "INT4" | "INT" | "INTEGER" | "SERIAL" => ColumnKind::Integer,
        "INT8" | "BIGINT" | "BIGSERIAL" => ColumnKind::BigInt,
        "FLOAT4" | "REAL" => ColumnKind::Real,
        "FLOAT8" | "DOUBLE PRECISION" => ColumnKind::Double,
        "TEXT" | "VARCHAR" | "CHARACTER VARYING" | "CHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            ColumnKind::Text
        }
        "UUID" => ColumnKind::Uuid,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "TIMESTAMPTZ" => ColumnKind::TimestampTz,
        "DATE" => ColumnKind::Date,
        "JSON" | "JSONB" => ColumnKind::Json,
        _ => ColumnKind::Unsupported,
    }
}
