//! Entity Object - Core mapping layer for Accessor
//!
//! This crate provides the entity trait, the chained query builder, CRUD and
//! relationship execution, the connection provider and the bundled
//! PostgreSQL driver.

// Lets code generated by `table-derive` refer to `entity_object::` from inside this crate
extern crate self as entity_object;

pub mod binding;
pub mod database;
pub mod driver;
pub mod errors;
pub mod postgres;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use binding::{bind_values, Binding};
pub use database::{Connector, Database};
pub use driver::{BoundParam, Driver, ExecResult, Row, Statement, StatementKind};
pub use errors::EntityError;
pub use postgres::PgDriver;
pub use query_builder::{Condition, Query, QueryOperator, SortOrder};
pub use traits::*;
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

pub use config::DatabaseConfig;
pub use hook_system::{HookPoint, HookSet};
pub use type_mapping::{infer_param_type, FromValue, ParamType, Value, ValueError};
