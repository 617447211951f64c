//! Query builder tests

#[cfg(test)]
mod tests {
    use crate::database::Database;
    use crate::driver::{Row, StatementKind};
    use crate::errors::EntityError;
    use crate::query_builder::{Condition, Query, QueryOperator, SortOrder, SqlGenerator};
    use crate::testing::{user_row, MockDriver, User};
    use crate::traits::ActiveRecord;
    use std::sync::Arc;
    use type_mapping::{ParamType, Value};

    fn database(driver: &Arc<MockDriver>) -> Database {
        Database::with_driver(driver.clone())
    }

    // ========================================
    // Conditions
    // ========================================

    #[test]
    fn test_pair_condition_is_parameterized() {
        let (sql, params) = Condition::from(("name", "'; DROP TABLE users; --"))
            .to_sql()
            .unwrap();

        assert_eq!(sql, "name = :where_value");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "where_value");
        assert_eq!(params[0].value, Value::from("'; DROP TABLE users; --"));
        assert_eq!(params[0].param_type, ParamType::Str);
    }

    #[test]
    fn test_triple_condition_operators() {
        let cases = [
            (">=", "age >= :where_value"),
            ("<>", "age != :where_value"),
            ("not   like", "age NOT LIKE :where_value"),
            ("ilike", "age ILIKE :where_value"),
        ];

        for (operator, expected) in cases {
            let (sql, _) = Condition::from(("age", operator, 18)).to_sql().unwrap();
            assert_eq!(sql, expected, "operator {}", operator);
        }
    }

    #[test]
    fn test_null_comparisons() {
        let (sql, params) = Condition::from(("name", Value::Null)).to_sql().unwrap();
        assert_eq!(sql, "name IS NULL");
        assert!(params.is_empty());

        let (sql, _) = Condition::from(("name", "!=", None::<String>))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "name IS NOT NULL");

        assert!(Condition::from(("age", ">", Value::Null)).to_sql().is_err());
    }

    #[test]
    fn test_is_and_is_not_with_null() {
        let (sql, params) = Condition::compare("deleted_at", "IS", Value::Null)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "deleted_at IS NULL");
        assert!(params.is_empty());

        let (sql, params) = Condition::compare("deleted_at", "is  not", Value::Null)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "deleted_at IS NOT NULL");
        assert!(params.is_empty());

        let with_value = Condition::compare("deleted_at", "IS", 5).to_sql();
        assert!(matches!(with_value, Err(EntityError::Validation(_))));
    }

    #[test]
    fn test_invalid_field_and_operator_rejected() {
        let bad_field = Condition::from(("age; DROP TABLE users", 1)).to_sql();
        assert!(matches!(bad_field, Err(EntityError::Validation(_))));

        let bad_operator = Condition::from(("age", "IN", 1)).to_sql();
        assert!(matches!(bad_operator, Err(EntityError::Validation(_))));
    }

    #[test]
    fn test_raw_condition_is_verbatim() {
        let (sql, params) = Condition::from("age > 18 AND name <> ''").to_sql().unwrap();
        assert_eq!(sql, "age > 18 AND name <> ''");
        assert!(params.is_empty());
    }

    #[test]
    fn test_operator_parsing() {
        assert_eq!("=".parse::<QueryOperator>().unwrap(), QueryOperator::Eq);
        assert_eq!("like".parse::<QueryOperator>().unwrap(), QueryOperator::Like);
        assert!("==".parse::<QueryOperator>().is_err());
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    // ========================================
    // SQL generation
    // ========================================

    #[test]
    fn test_write_statements() {
        assert_eq!(
            SqlGenerator::insert("users", &["name", "age"]).unwrap(),
            "INSERT INTO users (name, age) VALUES (:name, :age);"
        );
        assert_eq!(
            SqlGenerator::update("users", &["name", "age"], "id").unwrap(),
            "UPDATE users SET name = :name, age = :age WHERE id = :id;"
        );
        assert_eq!(
            SqlGenerator::delete_by_id("users", "id").unwrap(),
            "DELETE FROM users WHERE id = :id;"
        );
        assert_eq!(
            SqlGenerator::delete_where("users", "age < :where_value").unwrap(),
            "DELETE FROM users WHERE age < :where_value;"
        );
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        assert!(SqlGenerator::insert("users", &["name", "bad name"]).is_err());
        assert!(SqlGenerator::projection("select").is_err());
        assert!(SqlGenerator::count("", None).is_err());
    }

    // ========================================
    // Query state
    // ========================================

    #[test]
    fn test_idle_query_compiles_to_nothing() {
        let query = User::query().filter(("name", "Ana")).limit(3);
        assert!(!query.is_projecting());
        assert!(query.has_predicate());
        assert!(query.to_statement().unwrap().is_none());
        assert!(!User::select().has_predicate());
    }

    #[test]
    fn test_select_statement_clauses() {
        let statement = User::select()
            .filter(("age", ">", 18))
            .order("name", SortOrder::Desc)
            .limit(5)
            .to_statement()
            .unwrap()
            .unwrap();

        assert_eq!(statement.kind, StatementKind::Select);
        assert_eq!(
            statement.sql,
            "SELECT * FROM users WHERE age > :where_value ORDER BY name DESC LIMIT 5;"
        );
        assert_eq!(statement.params[0].value, Value::Int(18));
    }

    #[test]
    fn test_later_calls_overwrite_clauses() {
        let statement = Query::<User>::new()
            .limit(10)
            .filter(("name", "Ana"))
            .select()
            .filter(("age", 30))
            .order("age", SortOrder::Asc)
            .order("name", SortOrder::Desc)
            .limit(0)
            .to_statement()
            .unwrap()
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT * FROM users WHERE age = :where_value ORDER BY name DESC;"
        );
    }

    #[test]
    fn test_plain_select() {
        let statement = User::select().to_statement().unwrap().unwrap();
        assert_eq!(statement.sql, "SELECT * FROM users;");
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_count_ignores_order_and_limit() {
        let statement = User::select()
            .filter(("age", 30))
            .order("name", SortOrder::Asc)
            .limit(1)
            .to_count_statement()
            .unwrap();

        assert_eq!(statement.kind, StatementKind::Count);
        assert_eq!(
            statement.sql,
            "SELECT COUNT(*) AS total FROM users WHERE age = :where_value;"
        );
    }

    #[test]
    fn test_invalid_order_field_fails_compilation() {
        let result = User::select().order("name; --", SortOrder::Asc).to_statement();
        assert!(matches!(result, Err(EntityError::Validation(_))));
    }

    // ========================================
    // Execution against the recording driver
    // ========================================

    #[tokio::test]
    async fn test_fetch_without_projection_does_not_connect() {
        let driver = Arc::new(MockDriver::new().with_rows(vec![user_row(1, "Ana", 30)]));
        let db = database(&driver);

        assert!(User::query().fetch(&db).await.unwrap().is_empty());
        assert!(User::query().first(&db).await.unwrap().is_none());
        assert!(driver.statements().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_materializes_rows() {
        let driver = Arc::new(
            MockDriver::new().with_rows(vec![user_row(1, "Ana", 30), user_row(2, "Bo", 41)]),
        );
        let db = database(&driver);

        let users = User::select().fetch(&db).await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Bo");
        assert_eq!(users[1].age, 41);
        assert_eq!(driver.sql(), ["SELECT * FROM users;"]);
    }

    #[tokio::test]
    async fn test_first_returns_first_row_without_implicit_limit() {
        let driver = Arc::new(
            MockDriver::new().with_rows(vec![user_row(7, "Cy", 22), user_row(8, "Di", 23)]),
        );
        let db = database(&driver);

        let user = User::select()
            .filter(("id", 7))
            .first(&db)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(driver.sql(), ["SELECT * FROM users WHERE id = :where_value;"]);
    }

    #[tokio::test]
    async fn test_count_and_exists() {
        let driver = Arc::new(
            MockDriver::new()
                .with_rows(vec![Row::new().with("total", 3)])
                .with_rows(vec![Row::new().with("total", 0)]),
        );
        let db = database(&driver);

        assert_eq!(User::select().count(&db).await.unwrap(), 3);
        assert!(!User::select().filter(("age", 99)).exists(&db).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_without_total_column() {
        let driver = Arc::new(MockDriver::new().with_rows(vec![Row::new().with("n", 3)]));
        let db = database(&driver);

        let err = User::select().count(&db).await.unwrap_err();
        assert!(matches!(err, EntityError::MissingColumn(_)));
    }

    #[tokio::test]
    async fn test_decode_failure_propagates() {
        let driver = Arc::new(
            MockDriver::new().with_rows(vec![Row::new().with("id", 1).with("age", "old")]),
        );
        let db = database(&driver);

        let err = User::select().fetch(&db).await.unwrap_err();
        assert!(matches!(err, EntityError::Decode { .. }));
    }
}
