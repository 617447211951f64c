//! Convenience re-exports for common entity-object usage

// Core traits
pub use crate::traits::{ActiveRecord, Entity, Relations};

// Error types
pub use crate::errors::EntityError;

// Connection and driver
pub use crate::database::Database;
pub use crate::driver::{Driver, ExecResult, Row, Statement};

// Query building
pub use crate::query_builder::{Condition, Query, SortOrder};

// Values and hooks
pub use hook_system::{HookPoint, HookSet};
pub use type_mapping::{FromValue, ParamType, Value};

pub use async_trait::async_trait;
