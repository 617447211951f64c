//! SQL text generation
//!
//! Every statement uses named `:placeholders` and ends with a semicolon.
//! Identifiers are validated before they are interpolated.

use crate::errors::EntityError;
use crate::query_builder::ordering::SortOrder;
use crate::validation::{ValidatedFieldName, ValidatedTableName};

/// Placeholder name used for the primary key in UPDATE and DELETE
pub const ID_PLACEHOLDER: &str = "id";

pub struct SqlGenerator;

impl SqlGenerator {
    fn validated_fields(fields: &[&str]) -> Result<Vec<ValidatedFieldName>, EntityError> {
        fields
            .iter()
            .map(|field| ValidatedFieldName::new(field).map_err(EntityError::from))
            .collect()
    }

    /// `SELECT * FROM table`
    pub fn projection(table: &str) -> Result<String, EntityError> {
        let table = ValidatedTableName::new(table)?;
        Ok(format!("SELECT * FROM {}", table))
    }

    /// `INSERT INTO t (a, b) VALUES (:a, :b);`
    pub fn insert(table: &str, attributes: &[&str]) -> Result<String, EntityError> {
        let table = ValidatedTableName::new(table)?;
        let fields = Self::validated_fields(attributes)?;

        let columns = fields
            .iter()
            .map(ValidatedFieldName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = fields
            .iter()
            .map(|f| format!(":{}", f))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table, columns, placeholders
        ))
    }

    /// `UPDATE t SET a = :a, b = :b WHERE pk = :id;`
    pub fn update(
        table: &str,
        attributes: &[&str],
        primary_key: &str,
    ) -> Result<String, EntityError> {
        let table = ValidatedTableName::new(table)?;
        let primary_key = ValidatedFieldName::new(primary_key)?;
        let fields = Self::validated_fields(attributes)?;

        let assignments = fields
            .iter()
            .map(|f| format!("{} = :{}", f, f))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "UPDATE {} SET {} WHERE {} = :{};",
            table, assignments, primary_key, ID_PLACEHOLDER
        ))
    }

    /// `DELETE FROM t WHERE pk = :id;`
    pub fn delete_by_id(table: &str, primary_key: &str) -> Result<String, EntityError> {
        let table = ValidatedTableName::new(table)?;
        let primary_key = ValidatedFieldName::new(primary_key)?;

        Ok(format!(
            "DELETE FROM {} WHERE {} = :{};",
            table, primary_key, ID_PLACEHOLDER
        ))
    }

    /// `DELETE FROM t WHERE <predicate>;`
    pub fn delete_where(table: &str, predicate: &str) -> Result<String, EntityError> {
        let table = ValidatedTableName::new(table)?;
        Ok(format!("DELETE FROM {} WHERE {};", table, predicate))
    }

    /// Append the optional WHERE, ORDER BY and LIMIT clauses to a projection
    pub fn select(
        projection: &str,
        predicate: Option<&str>,
        order: Option<(&str, SortOrder)>,
        limit: u64,
    ) -> Result<String, EntityError> {
        let mut sql = String::from(projection);

        if let Some(predicate) = predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }

        if let Some((field, direction)) = order {
            let field = ValidatedFieldName::new(field)?;
            sql.push_str(&format!(" ORDER BY {} {}", field, direction.to_sql()));
        }

        if limit > 0 {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql.push(';');
        Ok(sql)
    }

    /// `SELECT COUNT(*) AS total FROM t [WHERE p];`
    pub fn count(table: &str, predicate: Option<&str>) -> Result<String, EntityError> {
        let table = ValidatedTableName::new(table)?;
        let mut sql = format!("SELECT COUNT(*) AS total FROM {}", table);

        if let Some(predicate) = predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }

        sql.push(';');
        Ok(sql)
    }
}
