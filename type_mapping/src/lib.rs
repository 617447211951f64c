//! Unified type mapping between Rust field types and bound SQL parameters
//! This crate provides the scalar value model shared across the accessor ecosystem

pub mod param;
pub mod sql;
pub mod value;

pub use param::{infer_param_type, ParamType};
pub use sql::{pg_type_to_column_kind, ColumnKind};
pub use value::{FromValue, Value, ValueError};
