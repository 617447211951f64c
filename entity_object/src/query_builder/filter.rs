//! Predicate conditions
//!
//! A query carries at most one predicate. Structured conditions compile to a
//! bound `:where_value` placeholder; raw fragments are spliced verbatim.

use crate::driver::BoundParam;
use crate::errors::EntityError;
use crate::validation::ValidatedFieldName;
use std::str::FromStr;
use type_mapping::Value;

/// Placeholder name used for the value of a structured condition
pub const WHERE_PLACEHOLDER: &str = "where_value";

/// Comparison operators accepted in structured conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,      // =
    Ne,      // != or <>
    Gt,      // >
    Gte,     // >=
    Lt,      // <
    Lte,     // <=
    Like,    // LIKE
    NotLike, // NOT LIKE
    ILike,   // ILIKE (case insensitive)
    Is,      // IS, NULL only
    IsNot,   // IS NOT, NULL only
}

impl QueryOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "=",
            QueryOperator::Ne => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::NotLike => "NOT LIKE",
            QueryOperator::ILike => "ILIKE",
            QueryOperator::Is => "IS",
            QueryOperator::IsNot => "IS NOT",
        }
    }
}

impl FromStr for QueryOperator {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" => Ok(QueryOperator::Eq),
            "!=" | "<>" => Ok(QueryOperator::Ne),
            ">" => Ok(QueryOperator::Gt),
            ">=" => Ok(QueryOperator::Gte),
            "<" => Ok(QueryOperator::Lt),
            "<=" => Ok(QueryOperator::Lte),
            "LIKE" => Ok(QueryOperator::Like),
            "NOT LIKE" => Ok(QueryOperator::NotLike),
            "ILIKE" => Ok(QueryOperator::ILike),
            "IS" => Ok(QueryOperator::Is),
            "IS NOT" => Ok(QueryOperator::IsNot),
            _ => Err(EntityError::validation(format!(
                "Unsupported comparison operator '{}'",
                s
            ))),
        }
    }
}

/// A single predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Trusted predicate text inserted verbatim into the WHERE clause.
    ///
    /// Nothing is escaped: never build a raw condition from user input.
    Raw(String),
    /// `field operator value`, with the value bound as a parameter
    Compare {
        field: String,
        operator: String,
        value: Value,
    },
}

impl Condition {
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, "=", value)
    }

    pub fn compare(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        Condition::Compare {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        }
    }

    /// Compile into WHERE clause text (without the keyword) and its parameters
    pub fn to_sql(&self) -> Result<(String, Vec<BoundParam>), EntityError> {
        match self {
            Condition::Raw(sql) => Ok((sql.clone(), Vec::new())),
            Condition::Compare {
                field,
                operator,
                value,
            } => {
                let field = ValidatedFieldName::new(field)?;
                let operator = operator.parse::<QueryOperator>()?;

                if value.is_null() {
                    return match operator {
                        QueryOperator::Eq | QueryOperator::Is => {
                            Ok((format!("{} IS NULL", field), Vec::new()))
                        }
                        QueryOperator::Ne | QueryOperator::IsNot => {
                            Ok((format!("{} IS NOT NULL", field), Vec::new()))
                        }
                        other => Err(EntityError::validation(format!(
                            "Operator '{}' cannot compare against NULL",
                            other.to_sql()
                        ))),
                    };
                }

                if matches!(operator, QueryOperator::Is | QueryOperator::IsNot) {
                    return Err(EntityError::validation(format!(
                        "Operator '{}' only compares against NULL",
                        operator.to_sql()
                    )));
                }

                Ok((
                    format!("{} {} :{}", field, operator.to_sql(), WHERE_PLACEHOLDER),
                    vec![BoundParam::new(WHERE_PLACEHOLDER, value.clone())],
                ))
            }
        }
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

impl<V: Into<Value>> From<(&str, V)> for Condition {
    fn from((field, value): (&str, V)) -> Self {
        Condition::eq(field, value)
    }
}

impl<V: Into<Value>> From<(&str, &str, V)> for Condition {
    fn from((field, operator, value): (&str, &str, V)) -> Self {
        Condition::compare(field, operator, value)
    }
}
