//! Query builder utilities
//!
//! This module provides the chained query state and SQL text generation.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod sql_generation;

#[cfg(test)]
mod tests;

pub use builder::Query;
pub use filter::{Condition, QueryOperator};
pub use ordering::SortOrder;
pub use sql_generation::SqlGenerator;
