//! Shared fixtures for integration tests

#![allow(dead_code)]

use accessor::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Driver that records statements and replays scripted results
#[derive(Debug, Default)]
pub struct RecordingDriver {
    statements: Mutex<Vec<Statement>>,
    rows: Mutex<VecDeque<Vec<Row>>>,
    results: Mutex<VecDeque<ExecResult>>,
}

impl RecordingDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_rows(&self, rows: Vec<Row>) {
        self.rows.lock().unwrap().push_back(rows);
    }

    pub fn push_insert_id(&self, id: i64) {
        self.results.lock().unwrap().push_back(ExecResult {
            rows_affected: 1,
            last_insert_id: Some(id),
        });
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|s| s.sql).collect()
    }

    pub fn last(&self) -> Statement {
        self.statements().pop().expect("no statement recorded")
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, EntityError> {
        self.statements.lock().unwrap().push(statement.clone());
        Ok(self.results.lock().unwrap().pop_front().unwrap_or(ExecResult {
            rows_affected: 1,
            last_insert_id: None,
        }))
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, EntityError> {
        self.statements.lock().unwrap().push(statement.clone());
        Ok(self.rows.lock().unwrap().pop_front().unwrap_or_default())
    }
}

pub fn database(driver: &Arc<RecordingDriver>) -> Database {
    Database::with_driver(driver.clone())
}

#[model]
#[table(name = "users")]
pub struct User {
    #[primary_key]
    pub id: i64,
    pub name: String,
    pub age: i32,
}

#[model]
#[table(name = "customers")]
pub struct Customer {
    #[primary_key]
    pub id: i64,
    pub name: String,
}

#[model]
#[table(name = "orders")]
pub struct Order {
    #[primary_key]
    pub id: i64,
    pub customer_id: Option<i64>,
    pub total: f64,
}

#[model]
#[table(name = "profiles")]
pub struct Profile {
    #[primary_key]
    pub id: i64,
    pub user_id: i64,
    pub bio: Option<String>,
}

#[model]
#[table(name = "roles")]
pub struct Role {
    #[primary_key]
    pub id: i64,
    pub name: String,
}

#[model]
#[table(name = "user_roles")]
pub struct UserRole {
    #[primary_key]
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
}

pub fn user_row(id: i64, name: &str, age: i32) -> Row {
    Row::new().with("id", id).with("name", name).with("age", age)
}
