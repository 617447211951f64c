//! # Accessor
//!
//! An ActiveRecord-style mapper for PostgreSQL: a struct represents one row
//! of one table, queries are built by chaining, writes run lifecycle hooks
//! and relationships resolve to other mapped structs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use accessor::prelude::*;
//!
//! #[model]
//! #[table(name = "users")]
//! pub struct User {
//!     #[primary_key]
//!     pub id: i64,
//!     pub name: String,
//!     pub age: i32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "pgsql".to_string(), "localhost".to_string(), "app".to_string(),
//!         5432, "postgres".to_string(), "password".to_string(),
//!     );
//!     let accessor = Accessor::new(config);
//!     let db = accessor.database();
//!
//!     let mut user = User { name: "Ana".to_string(), age: 30, ..Default::default() };
//!     user.insert(db).await?;
//!
//!     let found = User::select().filter(("id", user.id)).first(db).await?;
//!     println!("Found: {:?}", found);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::Accessor;
pub use errors::AccessorError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use entity_object;
pub use hook_system;
pub use table_derive;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
