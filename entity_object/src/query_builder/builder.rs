//! Chained query state
//!
//! A [`Query`] holds four independent clauses. Every builder call consumes
//! the query and returns it with one clause replaced; every terminal
//! operation consumes it for good.

use crate::database::Database;
use crate::driver::{BoundParam, Statement, StatementKind};
use crate::errors::EntityError;
use crate::query_builder::filter::Condition;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::traits::Entity;
use std::marker::PhantomData;
use type_mapping::FromValue;

/// Query over the table of entity `T`
///
/// ```rust,ignore
/// let adults = User::select()
///     .filter(("age", ">=", 18))
///     .order("name", SortOrder::Asc)
///     .limit(10)
///     .fetch(&db)
///     .await?;
/// ```
pub struct Query<T> {
    /// Table to project from, set by `select`
    pub(crate) projection: Option<String>,
    pub(crate) predicate: Option<Condition>,
    pub(crate) order: Option<(String, SortOrder)>,
    pub(crate) limit: u64,
    _entity: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("projection", &self.projection)
            .field("predicate", &self.predicate)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<T: Entity> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Query<T> {
    /// An idle query: no projection, so fetching it yields nothing
    pub fn new() -> Self {
        Self {
            projection: None,
            predicate: None,
            order: None,
            limit: 0,
            _entity: PhantomData,
        }
    }

    /// Project every column of the entity's table
    pub fn select(mut self) -> Self {
        self.projection = Some(T::table_name().to_string());
        self
    }

    /// Set the predicate, replacing any previous one
    ///
    /// Accepts `("field", value)`, `("field", "operator", value)` or a raw
    /// SQL fragment. Raw fragments are not escaped.
    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.predicate = Some(condition.into());
        self
    }

    pub fn order(mut self, field: &str, direction: SortOrder) -> Self {
        self.order = Some((field.to_string(), direction));
        self
    }

    /// Cap the number of rows; 0 means unbounded
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_projecting(&self) -> bool {
        self.projection.is_some()
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    fn compiled_predicate(&self) -> Result<Option<(String, Vec<BoundParam>)>, EntityError> {
        self.predicate.as_ref().map(Condition::to_sql).transpose()
    }

    /// Compile the SELECT statement, or `None` when nothing is projected
    pub fn to_statement(&self) -> Result<Option<Statement>, EntityError> {
        let Some(projection) = &self.projection else {
            return Ok(None);
        };

        let projection = SqlGenerator::projection(projection)?;
        let (predicate, params) = self.compiled_predicate()?.unzip();
        let sql = SqlGenerator::select(
            &projection,
            predicate.as_deref(),
            self.order.as_ref().map(|(field, dir)| (field.as_str(), *dir)),
            self.limit,
        )?;

        Ok(Some(
            Statement::new(StatementKind::Select, sql).with_params(params.unwrap_or_default()),
        ))
    }

    /// Compile the COUNT statement; projection, ordering and limit are ignored
    pub fn to_count_statement(&self) -> Result<Statement, EntityError> {
        let (predicate, params) = self.compiled_predicate()?.unzip();
        let sql = SqlGenerator::count(T::table_name(), predicate.as_deref())?;

        Ok(Statement::new(StatementKind::Count, sql).with_params(params.unwrap_or_default()))
    }

    /// Compile the predicate-scoped DELETE, or `None` without a predicate
    pub(crate) fn to_delete_statement(&self) -> Result<Option<Statement>, EntityError> {
        let Some((predicate, params)) = self.compiled_predicate()? else {
            return Ok(None);
        };
        let sql = SqlGenerator::delete_where(T::table_name(), &predicate)?;

        Ok(Some(
            Statement::new(StatementKind::Delete, sql).with_params(params),
        ))
    }

    /// Execute and materialize every row
    pub async fn fetch(self, db: &Database) -> Result<Vec<T>, EntityError> {
        let Some(statement) = self.to_statement()? else {
            tracing::trace!("[SELECT] Table: {}, no projection", T::table_name());
            return Ok(Vec::new());
        };

        tracing::debug!("[SELECT] Table: {}", T::table_name());
        tracing::debug!("[SELECT] SQL: {}", statement.sql);

        let rows = db.get().await?.fetch_all(&statement).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and materialize the first row, if any
    pub async fn first(self, db: &Database) -> Result<Option<T>, EntityError> {
        let Some(statement) = self.to_statement()? else {
            tracing::trace!("[SELECT] Table: {}, no projection", T::table_name());
            return Ok(None);
        };

        tracing::debug!("[SELECT] Table: {}", T::table_name());
        tracing::debug!("[SELECT] SQL: {}", statement.sql);

        let rows = db.get().await?.fetch_all(&statement).await?;
        rows.first().map(T::from_row).transpose()
    }

    pub async fn count(self, db: &Database) -> Result<i64, EntityError> {
        let statement = self.to_count_statement()?;

        tracing::debug!("[COUNT] Table: {}", T::table_name());
        tracing::debug!("[COUNT] SQL: {}", statement.sql);

        let rows = db.get().await?.fetch_all(&statement).await?;
        let total = rows
            .first()
            .and_then(|row| row.get("total"))
            .cloned()
            .ok_or_else(|| EntityError::MissingColumn("total".to_string()))?;

        i64::from_value(total).map_err(|e| EntityError::decode("total", e))
    }

    pub async fn exists(self, db: &Database) -> Result<bool, EntityError> {
        Ok(self.count(db).await? > 0)
    }
}
