//! CRUD execution for mapped entities

use crate::binding::{attribute_bindings, bind_values};
use crate::database::Database;
use crate::driver::{BoundParam, ExecResult, Statement, StatementKind};
use crate::errors::EntityError;
use crate::query_builder::sql_generation::{SqlGenerator, ID_PLACEHOLDER};
use crate::query_builder::Query;
use crate::traits::Entity;
use async_trait::async_trait;
use hook_system::HookPoint;
use type_mapping::{ParamType, Value};

/// Insert, update, delete and query entry points for every [`Entity`]
///
/// Each write runs the matching before-hook, executes one statement and then
/// runs the after-hook, all in the same call.
#[async_trait]
pub trait ActiveRecord: Entity {
    /// An idle query on this entity's table
    fn query() -> Query<Self> {
        Query::new()
    }

    /// A projecting query on this entity's table
    fn select() -> Query<Self> {
        Query::new().select()
    }

    /// Insert the attribute fields and store the generated id in the primary key
    async fn insert(&mut self, db: &Database) -> Result<ExecResult, EntityError>;

    /// Write every attribute field to the row identified by the primary key
    async fn update(&mut self, db: &Database) -> Result<ExecResult, EntityError>;

    /// Delete the row identified by the primary key
    async fn delete(&mut self, db: &Database) -> Result<ExecResult, EntityError>;

    /// Delete the rows matched by `scope`'s predicate instead of by primary key.
    ///
    /// When `scope` has a predicate it wins over the primary key, even if the
    /// predicate matches other rows. Without one this behaves like `delete`.
    async fn delete_matching(
        &mut self,
        db: &Database,
        scope: Query<Self>,
    ) -> Result<ExecResult, EntityError>;
}

fn id_param<T: Entity>(entity: &T) -> BoundParam {
    BoundParam::typed(ID_PLACEHOLDER, entity.primary_key_value(), ParamType::Int)
}

fn insert_statement<T: Entity>(entity: &T) -> Result<Statement, EntityError> {
    let sql = SqlGenerator::insert(T::table_name(), T::attribute_fields())?;
    let params = bind_values(entity, &attribute_bindings::<T>())?;
    Ok(Statement::new(StatementKind::Insert, sql).with_params(params))
}

fn update_statement<T: Entity>(entity: &T) -> Result<Statement, EntityError> {
    let sql = SqlGenerator::update(
        T::table_name(),
        T::attribute_fields(),
        T::primary_key_field(),
    )?;
    let mut params = bind_values(entity, &attribute_bindings::<T>())?;
    params.push(id_param(entity));
    Ok(Statement::new(StatementKind::Update, sql).with_params(params))
}

fn delete_statement<T: Entity>(entity: &T) -> Result<Statement, EntityError> {
    let sql = SqlGenerator::delete_by_id(T::table_name(), T::primary_key_field())?;
    Ok(Statement::new(StatementKind::Delete, sql).bind(id_param(entity)))
}

async fn execute_logged<T: Entity>(
    db: &Database,
    statement: &Statement,
) -> Result<ExecResult, EntityError> {
    let tag = statement.kind.as_str();
    tracing::debug!("[{}] Table: {}", tag, T::table_name());
    tracing::debug!("[{}] SQL: {}", tag, statement.sql);
    tracing::debug!("[{}] Params count: {}", tag, statement.params.len());

    let result = db.get().await?.execute(statement).await?;
    tracing::debug!("[{}] Rows affected: {}", tag, result.rows_affected);
    Ok(result)
}

#[async_trait]
impl<T: Entity> ActiveRecord for T {
    async fn insert(&mut self, db: &Database) -> Result<ExecResult, EntityError> {
        db.run_hooks(HookPoint::BeforeInsert, self);

        let statement = insert_statement(self)?;
        let result = execute_logged::<T>(db, &statement).await?;

        match result.last_insert_id {
            Some(id) => {
                if let Err(e) = self.set_field_value(T::primary_key_field(), Value::Int(id)) {
                    tracing::warn!(
                        "[INSERT] Table: {}, insert id {} not assigned to primary key: {}",
                        T::table_name(),
                        id,
                        e
                    );
                }
            }
            None => tracing::warn!(
                "[INSERT] Table: {}, driver reported no insert id, primary key left unchanged",
                T::table_name()
            ),
        }

        db.run_hooks(HookPoint::AfterInsert, self);
        Ok(result)
    }

    async fn update(&mut self, db: &Database) -> Result<ExecResult, EntityError> {
        db.run_hooks(HookPoint::BeforeUpdate, self);

        let statement = update_statement(self)?;
        let result = execute_logged::<T>(db, &statement).await?;

        db.run_hooks(HookPoint::AfterUpdate, self);
        Ok(result)
    }

    async fn delete(&mut self, db: &Database) -> Result<ExecResult, EntityError> {
        db.run_hooks(HookPoint::BeforeDelete, self);

        let statement = delete_statement(self)?;
        let result = execute_logged::<T>(db, &statement).await?;

        db.run_hooks(HookPoint::AfterDelete, self);
        Ok(result)
    }

    async fn delete_matching(
        &mut self,
        db: &Database,
        scope: Query<Self>,
    ) -> Result<ExecResult, EntityError> {
        db.run_hooks(HookPoint::BeforeDelete, self);

        if scope.has_predicate() {
            tracing::debug!(
                "[DELETE] Table: {}, scope predicate replaces the primary key",
                T::table_name()
            );
        }
        let statement = match scope.to_delete_statement()? {
            Some(scoped) => scoped,
            None => delete_statement(self)?,
        };
        let result = execute_logged::<T>(db, &statement).await?;

        db.run_hooks(HookPoint::AfterDelete, self);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::query_builder::SortOrder;
    use crate::testing::{user_row, MockDriver, Token, User};
    use futures::FutureExt;
    use hook_system::HookSet;
    use std::sync::{Arc, Mutex};

    fn ana() -> User {
        User {
            id: 0,
            name: "Ana".to_string(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_generated_id() {
        let driver = Arc::new(MockDriver::new().with_result(ExecResult {
            rows_affected: 1,
            last_insert_id: Some(42),
        }));
        let db = Database::with_driver(driver.clone());
        let mut user = ana();

        user.insert(&db).await.unwrap();

        assert_eq!(user.id, 42);
        let statements = driver.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind, StatementKind::Insert);
        assert_eq!(
            statements[0].sql,
            "INSERT INTO users (name, age) VALUES (:name, :age);"
        );
        assert_eq!(statements[0].params.len(), 2);
        assert_eq!(statements[0].param("age").map(|p| p.param_type), Some(ParamType::Int));
    }

    #[tokio::test]
    async fn test_insert_without_reported_id_keeps_primary_key() {
        let driver = Arc::new(MockDriver::new());
        let db = Database::with_driver(driver.clone());
        let mut user = User { id: 5, ..ana() };

        user.insert(&db).await.unwrap();
        assert_eq!(user.id, 5);
    }

    #[tokio::test]
    async fn test_insert_id_is_not_forced_into_text_primary_key() {
        let driver = Arc::new(MockDriver::new().with_result(ExecResult {
            rows_affected: 1,
            last_insert_id: Some(7),
        }));
        let mut db = Database::with_driver(driver.clone());
        let after = Arc::new(Mutex::new(0));
        let counter = after.clone();
        db.register_hooks(HookSet::<Token>::new().after_insert(move |_| *counter.lock().unwrap() += 1));
        let mut token = Token {
            code: "abc-123".to_string(),
            label: "invite".to_string(),
        };

        let result = token.insert(&db).await.unwrap();

        assert_eq!(result.last_insert_id, Some(7));
        assert_eq!(token.code, "abc-123");
        assert_eq!(driver.statements().len(), 1);
        assert_eq!(*after.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_binds_id_as_integer() {
        let driver = Arc::new(MockDriver::new());
        let db = Database::with_driver(driver.clone());
        let mut user = User { id: 3, ..ana() };

        user.update(&db).await.unwrap();

        let statement = &driver.statements()[0];
        assert_eq!(
            statement.sql,
            "UPDATE users SET name = :name, age = :age WHERE id = :id;"
        );
        let id = statement.param("id").unwrap();
        assert_eq!(id.value, Value::Int(3));
        assert_eq!(id.param_type, ParamType::Int);
    }

    #[tokio::test]
    async fn test_delete_by_primary_key() {
        let driver = Arc::new(MockDriver::new());
        let db = Database::with_driver(driver.clone());
        let mut user = User { id: 9, ..ana() };

        user.delete(&db).await.unwrap();

        let statement = &driver.statements()[0];
        assert_eq!(statement.kind, StatementKind::Delete);
        assert_eq!(statement.sql, "DELETE FROM users WHERE id = :id;");
        assert_eq!(statement.param("id").map(|p| p.value.clone()), Some(Value::Int(9)));
    }

    #[tokio::test]
    async fn test_delete_matching_predicate_wins_over_primary_key() {
        let driver = Arc::new(MockDriver::new());
        let db = Database::with_driver(driver.clone());
        let mut user = User { id: 9, ..ana() };

        user.delete_matching(&db, User::query().filter(("age", "<", 18)))
            .await
            .unwrap();
        user.delete_matching(&db, User::query().order("name", SortOrder::Asc))
            .await
            .unwrap();

        assert_eq!(
            driver.sql(),
            [
                "DELETE FROM users WHERE age < :where_value;",
                "DELETE FROM users WHERE id = :id;",
            ]
        );
        assert!(driver.statements()[0].param("id").is_none());
    }

    #[tokio::test]
    async fn test_hooks_wrap_each_write() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut db = Database::with_driver(Arc::new(MockDriver::new()));

        let mut hooks = HookSet::<User>::new();
        for point in HookPoint::ALL {
            let calls = calls.clone();
            hooks = hooks.on(point, move |_user| calls.lock().unwrap().push(point));
        }
        db.register_hooks(hooks);

        let mut user = ana();
        user.insert(&db).await.unwrap();
        user.update(&db).await.unwrap();
        user.delete(&db).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), HookPoint::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_before_hook_changes_are_bound() {
        let driver = Arc::new(MockDriver::new());
        let mut db = Database::with_driver(driver.clone());
        db.register_hooks(HookSet::<User>::new().before_insert(|u| u.name = u.name.to_uppercase()));

        let mut user = ana();
        user.insert(&db).await.unwrap();

        assert_eq!(user.name, "ANA");
        assert_eq!(
            driver.statements()[0].param("name").map(|p| p.value.clone()),
            Some(Value::from("ANA"))
        );
    }

    #[tokio::test]
    async fn test_connection_failure_skips_after_hook() {
        let config = crate::testing::test_config();
        let connector: crate::database::Connector = Arc::new(|_config: config::DatabaseConfig| {
            async { Err::<Arc<dyn Driver>, _>(EntityError::Connection("refused".to_string())) }
                .boxed()
        });
        let mut db = Database::with_connector(config, connector);
        let after = Arc::new(Mutex::new(0));
        let counter = after.clone();
        db.register_hooks(HookSet::<User>::new().after_insert(move |_| *counter.lock().unwrap() += 1));

        let mut user = ana();
        assert!(matches!(user.insert(&db).await, Err(EntityError::Connection(_))));
        assert_eq!(*after.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_select_shortcut_then_update_round_trip() {
        let driver = Arc::new(MockDriver::new().with_rows(vec![user_row(4, "Bo", 20)]));
        let db = Database::with_driver(driver.clone());

        let mut user = User::select().filter(("id", 4)).first(&db).await.unwrap().unwrap();
        user.age = 21;
        user.update(&db).await.unwrap();

        let update = &driver.statements()[1];
        assert_eq!(update.param("age").map(|p| p.value.clone()), Some(Value::Int(21)));
        assert_eq!(update.param("id").map(|p| p.value.clone()), Some(Value::Int(4)));
    }
}
