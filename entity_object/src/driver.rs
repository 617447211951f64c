//! Driver capability
//!
//! The mapper never talks to a database library directly. It compiles every
//! operation into a [`Statement`] with named `:placeholders` and hands it to
//! a [`Driver`], which executes it and reports rows or an insert id.

use crate::errors::EntityError;
use async_trait::async_trait;
use type_mapping::{ParamType, Value};

/// What a compiled statement does, so drivers can specialise execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Count => "COUNT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

/// One named parameter bound to a statement
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Placeholder name without the leading colon
    pub name: String,
    pub value: Value,
    pub param_type: ParamType,
}

impl BoundParam {
    /// Bind a value with its inferred parameter type
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let param_type = value.param_type();
        Self {
            name: name.into(),
            value,
            param_type,
        }
    }

    /// Bind a value with an explicit parameter type
    pub fn typed(name: impl Into<String>, value: Value, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            value,
            param_type,
        }
    }
}

/// Compiled SQL text plus its named parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<BoundParam>,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(kind: StatementKind, sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            kind,
        }
    }

    pub fn with_params(mut self, params: Vec<BoundParam>) -> Self {
        self.params = params;
        self
    }

    pub fn bind(mut self, param: BoundParam) -> Self {
        self.params.push(param);
        self
    }

    /// Look up a bound parameter by placeholder name
    pub fn param(&self, name: &str) -> Option<&BoundParam> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Outcome of a non-query statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Integer identity generated by the statement, when the driver knows one
    pub last_insert_id: Option<i64>,
}

/// A result row as ordered `(column, value)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Database driver capability
///
/// Implementations receive statements with named placeholders and are
/// responsible for translating them to their native parameter syntax.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Execute a statement that does not return rows
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, EntityError>;

    /// Execute a query and return every row
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, EntityError>;
}
