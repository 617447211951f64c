//! Parameter type inference
//!
//! Maps the runtime kind of a bound value to the parameter type the driver
//! is told about.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Bind type handed to the driver alongside each parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    Bool,
    Int,
    Null,
    Str,
}

/// Infer the bind type from a value: booleans, integers and nulls keep their
/// own type, everything else binds as a string.
pub fn infer_param_type(value: &Value) -> ParamType {
    match value {
        Value::Bool(_) => ParamType::Bool,
        Value::Int(_) => ParamType::Int,
        Value::Null => ParamType::Null,
        Value::Float(_) | Value::Text(_) => ParamType::Str,
    }
}

impl Value {
    pub fn param_type(&self) -> ParamType {
        infer_param_type(self)
    }
}
