//! Trait definitions
//!
//! This module defines the entity metadata trait and the CRUD and
//! relationship traits blanket-implemented on top of it.

pub mod active_record;
pub mod entity;
pub mod relations;

pub use active_record::ActiveRecord;
pub use entity::Entity;
pub use relations::Relations;
