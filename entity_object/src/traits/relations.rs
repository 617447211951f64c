//! Relationship resolution
//!
//! Relationships are not declared up front. Each call names the related type
//! and the key columns, and issues its queries through [`ActiveRecord`].

use crate::database::Database;
use crate::errors::EntityError;
use crate::traits::{ActiveRecord, Entity};
use async_trait::async_trait;
use type_mapping::Value;

fn key_value<T: Entity>(entity: &T, field: &str) -> Result<Value, EntityError> {
    entity
        .field_value(field)
        .ok_or_else(|| EntityError::unknown_field(T::table_name(), field))
}

fn ensure_field<T: Entity>(field: &str) -> Result<(), EntityError> {
    if field == T::primary_key_field() || T::attribute_fields().contains(&field) {
        Ok(())
    } else {
        Err(EntityError::unknown_field(T::table_name(), field))
    }
}

#[async_trait]
pub trait Relations: Entity {
    /// The `R` whose `foreign_key` column holds this entity's primary key
    async fn has_one<R: Entity>(
        &self,
        db: &Database,
        foreign_key: &str,
    ) -> Result<Option<R>, EntityError>;

    /// The `R` whose `their_primary_key` equals this entity's `foreign_key` field
    async fn belongs_to<R: Entity>(
        &self,
        db: &Database,
        foreign_key: &str,
        their_primary_key: &str,
    ) -> Result<Option<R>, EntityError>;

    /// Every `R` whose `foreign_key` column holds this entity's primary key
    async fn has_many<R: Entity>(
        &self,
        db: &Database,
        foreign_key: &str,
    ) -> Result<Vec<R>, EntityError>;

    /// Every `R` linked to this entity through association rows of `A`.
    ///
    /// Reads all `A` where `key_to_self` equals this entity's primary key,
    /// then for each of them (in order) all `R` where `target_primary_key`
    /// equals the row's `key_to_target`. One query is issued per
    /// association row.
    async fn belongs_to_association<R: Entity, A: Entity>(
        &self,
        db: &Database,
        target_primary_key: &str,
        key_to_self: &str,
        key_to_target: &str,
    ) -> Result<Vec<R>, EntityError>;
}

#[async_trait]
impl<T: Entity> Relations for T {
    async fn has_one<R: Entity>(
        &self,
        db: &Database,
        foreign_key: &str,
    ) -> Result<Option<R>, EntityError> {
        ensure_field::<R>(foreign_key)?;
        let id = self.primary_key_value();
        if id.is_null() {
            return Ok(None);
        }

        R::select().filter((foreign_key, id)).first(db).await
    }

    async fn belongs_to<R: Entity>(
        &self,
        db: &Database,
        foreign_key: &str,
        their_primary_key: &str,
    ) -> Result<Option<R>, EntityError> {
        ensure_field::<R>(their_primary_key)?;
        let key = key_value(self, foreign_key)?;
        if key.is_null() {
            return Ok(None);
        }

        R::select().filter((their_primary_key, key)).first(db).await
    }

    async fn has_many<R: Entity>(
        &self,
        db: &Database,
        foreign_key: &str,
    ) -> Result<Vec<R>, EntityError> {
        ensure_field::<R>(foreign_key)?;
        let id = self.primary_key_value();
        if id.is_null() {
            return Ok(Vec::new());
        }

        R::select().filter((foreign_key, id)).fetch(db).await
    }

    async fn belongs_to_association<R: Entity, A: Entity>(
        &self,
        db: &Database,
        target_primary_key: &str,
        key_to_self: &str,
        key_to_target: &str,
    ) -> Result<Vec<R>, EntityError> {
        ensure_field::<A>(key_to_self)?;
        ensure_field::<A>(key_to_target)?;
        ensure_field::<R>(target_primary_key)?;

        let id = self.primary_key_value();
        if id.is_null() {
            return Ok(Vec::new());
        }

        let links: Vec<A> = A::select().filter((key_to_self, id)).fetch(db).await?;
        tracing::debug!(
            "[ASSOCIATION] {} -> {} via {}: {} links",
            T::table_name(),
            R::table_name(),
            A::table_name(),
            links.len()
        );

        let mut related = Vec::new();
        for link in &links {
            let target = key_value(link, key_to_target)?;
            if target.is_null() {
                continue;
            }
            let mut rows: Vec<R> = R::select()
                .filter((target_primary_key, target))
                .fetch(db)
                .await?;
            related.append(&mut rows);
        }

        Ok(related)
    }
}
