//! PostgreSQL driver built on sqlx
//!
//! Statements arrive with named `:placeholders`, which are rewritten to
//! positional `$n` parameters before execution. `Null` parameters are
//! rendered as the `NULL` literal so the server never has to type them.

use crate::database::Connector;
use crate::driver::{BoundParam, Driver, ExecResult, Row, Statement, StatementKind};
use crate::errors::EntityError;
use async_trait::async_trait;
use config::DatabaseConfig;
use futures::FutureExt;
use sqlx::postgres::{
    PgArguments, PgConnectOptions, PgConnection, PgPool, PgPoolOptions, PgRow, PgSslMode,
};
use sqlx::{Column, Executor, Postgres, Row as _, TypeInfo, ValueRef};
use std::sync::Arc;
use std::time::Duration;
use type_mapping::{pg_type_to_column_kind, ColumnKind, Value};

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// Driver backed by a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgDriver {
    pool: PgPool,
}

impl PgDriver {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, EntityError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(Self::connect_options(config)?)
            .await
            .map_err(EntityError::connection)?;

        Ok(Self { pool })
    }

    /// Connection options built field by field, so credentials need no escaping
    pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, EntityError> {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.dbname);

        for (key, value) in &config.options {
            options = match key.as_str() {
                "sslmode" => options.ssl_mode(value.parse::<PgSslMode>().map_err(|_| {
                    EntityError::connection(format!("invalid sslmode '{}'", value))
                })?),
                "application_name" => options.application_name(value),
                _ => options.options([(key.as_str(), value.as_str())]),
            };
        }

        Ok(options)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connector used by [`Database::new`](crate::Database::new)
    pub fn connector() -> Connector {
        Arc::new(|config: DatabaseConfig| {
            async move {
                let driver: Arc<dyn Driver> = Arc::new(PgDriver::connect(&config).await?);
                Ok::<_, EntityError>(driver)
            }
            .boxed()
        })
    }
}

#[async_trait]
impl Driver for PgDriver {
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, EntityError> {
        let (sql, params) = to_positional(statement)?;
        let mut conn = self.pool.acquire().await.map_err(EntityError::connection)?;

        let kinds = parameter_kinds(&mut conn, &sql, &params).await?;
        let result = bind_params(sqlx::query(&sql), &params, &kinds)?
            .execute(&mut *conn)
            .await
            .map_err(|e| EntityError::execution(&statement.sql, e))?;

        // lastval() is per session, so it must run on the connection that inserted
        let last_insert_id = if statement.kind == StatementKind::Insert {
            sqlx::query_scalar::<_, i64>("SELECT lastval()")
                .fetch_one(&mut *conn)
                .await
                .ok()
        } else {
            None
        };

        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, EntityError> {
        let (sql, params) = to_positional(statement)?;
        let mut conn = self.pool.acquire().await.map_err(EntityError::connection)?;

        let kinds = parameter_kinds(&mut conn, &sql, &params).await?;
        let rows = bind_params(sqlx::query(&sql), &params, &kinds)?
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| EntityError::execution(&statement.sql, e))?;

        rows.iter().map(decode_row).collect()
    }
}

/// Rewrite `:name` placeholders to `$n` and return the parameters in positional order.
///
/// Quoted text and `::` casts are copied untouched. A name used twice
/// reuses its position.
pub(crate) fn to_positional(
    statement: &Statement,
) -> Result<(String, Vec<&BoundParam>), EntityError> {
    let chars: Vec<char> = statement.sql.chars().collect();
    let mut sql = String::with_capacity(statement.sql.len());
    let mut ordered: Vec<&BoundParam> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                sql.push(c);
                i += 1;
                while i < chars.len() {
                    sql.push(chars[i]);
                    if chars[i] == c {
                        // doubled quote is an escape, not the end of the literal
                        if chars.get(i + 1) == Some(&c) {
                            sql.push(c);
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                    i += 1;
                }
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                sql.push_str("::");
                i += 2;
            }
            ':' if chars
                .get(i + 1)
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') =>
            {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
                {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();

                let param = statement.param(&name).ok_or_else(|| {
                    EntityError::validation(format!("No value bound for placeholder :{}", name))
                })?;

                if param.value.is_null() {
                    sql.push_str("NULL");
                } else {
                    let position = match ordered.iter().position(|p| p.name == name) {
                        Some(existing) => existing + 1,
                        None => {
                            ordered.push(param);
                            ordered.len()
                        }
                    };
                    sql.push('$');
                    sql.push_str(&position.to_string());
                }
                i = end;
            }
            _ => {
                sql.push(c);
                i += 1;
            }
        }
    }

    Ok((sql, ordered))
}

/// Ask the server which types it infers for the positional parameters.
///
/// Only needed when text values are bound: they may target uuid, timestamp
/// or json columns and must be sent as that type.
async fn parameter_kinds(
    conn: &mut PgConnection,
    sql: &str,
    params: &[&BoundParam],
) -> Result<Vec<ColumnKind>, EntityError> {
    if !params.iter().any(|p| matches!(p.value, Value::Text(_))) {
        return Ok(Vec::new());
    }

    let described = conn
        .describe(sql)
        .await
        .map_err(|e| EntityError::execution(sql, e))?;

    Ok(described
        .parameters()
        .and_then(|parameters| parameters.left())
        .map(|types| {
            types
                .iter()
                .map(|t| pg_type_to_column_kind(t.name()))
                .collect()
        })
        .unwrap_or_default())
}

fn bind_params<'q>(
    mut query: PgQuery<'q>,
    params: &[&BoundParam],
    kinds: &[ColumnKind],
) -> Result<PgQuery<'q>, EntityError> {
    for (index, param) in params.iter().enumerate() {
        query = match &param.value {
            Value::Bool(b) => query.bind(*b),
            Value::Int(i) => query.bind(*i),
            Value::Float(f) => query.bind(*f),
            Value::Text(text) => {
                let kind = kinds.get(index).copied().unwrap_or(ColumnKind::Text);
                bind_text(query, &param.name, text, kind)?
            }
            Value::Null => query.bind(None::<String>),
        };
    }
    Ok(query)
}

fn bind_text<'q>(
    query: PgQuery<'q>,
    name: &str,
    text: &str,
    kind: ColumnKind,
) -> Result<PgQuery<'q>, EntityError> {
    let invalid = |target: &str| {
        EntityError::validation(format!(
            "Parameter :{} is not a valid {}: '{}'",
            name, target, text
        ))
    };

    let query = match kind {
        ColumnKind::Bool => query.bind(text.trim().parse::<bool>().map_err(|_| invalid("boolean"))?),
        ColumnKind::SmallInt | ColumnKind::Integer | ColumnKind::BigInt => {
            query.bind(text.trim().parse::<i64>().map_err(|_| invalid("integer"))?)
        }
        ColumnKind::Real | ColumnKind::Double => {
            query.bind(text.trim().parse::<f64>().map_err(|_| invalid("float"))?)
        }
        ColumnKind::Uuid => query.bind(uuid::Uuid::parse_str(text).map_err(|_| invalid("uuid"))?),
        ColumnKind::TimestampTz => query.bind(
            chrono::DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|_| invalid("timestamp"))?,
        ),
        ColumnKind::Timestamp => query.bind(parse_naive_timestamp(text).ok_or_else(|| invalid("timestamp"))?),
        ColumnKind::Date => query.bind(
            chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| invalid("date"))?,
        ),
        ColumnKind::Json => query.bind(
            serde_json::from_str::<serde_json::Value>(text).map_err(|_| invalid("json document"))?,
        ),
        ColumnKind::Text | ColumnKind::Unsupported => query.bind(text.to_string()),
    };

    Ok(query)
}

fn parse_naive_timestamp(text: &str) -> Option<chrono::NaiveDateTime> {
    chrono::DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.naive_utc())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

fn decode_row(row: &PgRow) -> Result<Row, EntityError> {
    let mut decoded = Row::with_capacity(row.len());

    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, index, column.type_info().name())
            .map_err(|e| EntityError::decode(column.name(), e))?;
        decoded.push(column.name(), value);
    }

    Ok(decoded)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match pg_type_to_column_kind(type_name) {
        ColumnKind::Bool => Value::Bool(row.try_get::<bool, _>(index)?),
        ColumnKind::SmallInt => Value::Int(row.try_get::<i16, _>(index)?.into()),
        ColumnKind::Integer => Value::Int(row.try_get::<i32, _>(index)?.into()),
        ColumnKind::BigInt => Value::Int(row.try_get::<i64, _>(index)?),
        ColumnKind::Real => Value::Float(row.try_get::<f32, _>(index)?.into()),
        ColumnKind::Double => Value::Float(row.try_get::<f64, _>(index)?),
        ColumnKind::Text => Value::Text(row.try_get::<String, _>(index)?),
        ColumnKind::Uuid => Value::Text(row.try_get::<uuid::Uuid, _>(index)?.to_string()),
        ColumnKind::Timestamp => Value::Text(
            row.try_get::<chrono::NaiveDateTime, _>(index)?
                .and_utc()
                .to_rfc3339(),
        ),
        ColumnKind::TimestampTz => Value::Text(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(index)?
                .to_rfc3339(),
        ),
        ColumnKind::Date => Value::Text(row.try_get::<chrono::NaiveDate, _>(index)?.to_string()),
        ColumnKind::Json => Value::Text(row.try_get::<serde_json::Value, _>(index)?.to_string()),
        ColumnKind::Unsupported => {
            return Err(sqlx::Error::Decode(
                format!("unsupported column type {}", type_name).into(),
            ))
        }
    };

    Ok(value)
}
