//! Error types for the Accessor crate
//!
//! This module contains the top-level error returned by coordinator operations.

use config::ConfigError;
use entity_object::EntityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Entity(#[from] EntityError),
}
