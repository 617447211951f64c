use std::fmt::Display;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum EntityError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Execution error: {message} (sql: {sql})")]
    Execution { sql: String, message: String },

    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    #[error("Unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("Missing column in result: {0}")]
    MissingColumn(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl EntityError {
    pub fn connection(err: impl Display) -> Self {
        Self::Connection(err.to_string())
    }

    pub fn execution(sql: &str, err: impl Display) -> Self {
        Self::Execution {
            sql: sql.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(column: &str, err: impl Display) -> Self {
        Self::Decode {
            column: column.to_string(),
            message: err.to_string(),
        }
    }

    pub fn unknown_field(entity: &str, field: &str) -> Self {
        Self::UnknownField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<ValidationError> for EntityError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
