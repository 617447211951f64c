//! Lifecycle hook system
//!
//! This crate provides the callback registry invoked around the insert,
//! update and delete operations of mapped entities.

pub mod event;
pub mod manager;
pub mod prelude;

pub use event::HookPoint;
pub use manager::{HookCallback, HookSet};
