//! Convenience re-exports for common Accessor usage
//!
//! This prelude module re-exports the most commonly used items from the Accessor ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use accessor::prelude::*;
//!
//! // Entity, ActiveRecord, Relations, Query, Database and the #[model] macro are in scope
//! ```

// Core Accessor components
pub use crate::core::Accessor;
pub use crate::errors::AccessorError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Re-export commonly used entity-object types for convenience
pub use entity_object::prelude::*;

// Re-export entity_object module for macro-generated code
pub use entity_object;

// Re-export lifecycle hooks
pub use hook_system::prelude::*;

// Re-export table derive for model creation
pub use table_derive::{model, Entity};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use tokio;
