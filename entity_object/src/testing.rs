//! Test fixtures: a recording driver and a few mapped entities

use crate::driver::{Driver, ExecResult, Row, Statement};
use crate::errors::EntityError;
use async_trait::async_trait;
use config::DatabaseConfig;
use std::collections::VecDeque;
use std::sync::Mutex;
use table_derive::Entity;

/// Driver that records every statement and replays scripted results
#[derive(Debug, Default)]
pub struct MockDriver {
    statements: Mutex<Vec<Statement>>,
    rows: Mutex<VecDeque<Vec<Row>>>,
    results: Mutex<VecDeque<ExecResult>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next `fetch_all`
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.rows.lock().unwrap().push_back(rows);
        self
    }

    /// Queue the result returned by the next `execute`
    pub fn with_result(self, result: ExecResult) -> Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|s| s.sql).collect()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, EntityError> {
        self.statements.lock().unwrap().push(statement.clone());
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ExecResult {
                rows_affected: 1,
                last_insert_id: None,
            }))
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, EntityError> {
        self.statements.lock().unwrap().push(statement.clone());
        Ok(self.rows.lock().unwrap().pop_front().unwrap_or_default())
    }
}

pub fn test_config() -> DatabaseConfig {
    DatabaseConfig::new(
        "pgsql".to_string(),
        "localhost".to_string(),
        "accessor_test".to_string(),
        5432,
        "postgres".to_string(),
        "password".to_string(),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table(name = "users")]
pub struct User {
    #[primary_key]
    pub id: i64,
    pub name: String,
    pub age: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table(name = "customers")]
pub struct Customer {
    #[primary_key]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table(name = "orders")]
pub struct Order {
    #[primary_key]
    pub id: i64,
    pub customer_id: Option<i64>,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table(name = "roles")]
pub struct Role {
    #[primary_key]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table(name = "user_roles")]
pub struct UserRole {
    #[primary_key]
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table(name = "tokens")]
pub struct Token {
    #[primary_key]
    pub code: String,
    pub label: String,
}

pub fn user_row(id: i64, name: &str, age: i32) -> Row {
    Row::new().with("id", id).with("name", name).with("age", age)
}
