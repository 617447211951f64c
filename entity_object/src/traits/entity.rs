//! Mapped entity metadata
//!
//! This module defines the trait every mapped struct implements, normally
//! through `#[derive(Entity)]` or the `#[model]` attribute.

use crate::driver::Row;
use crate::errors::EntityError;
use std::fmt::Debug;
use type_mapping::Value;

/// A struct that represents one row of one table
///
/// The derive generates a name-keyed accessor table, so the mapper can read
/// and write fields by column name without runtime reflection.
///
/// ```rust,ignore
/// use accessor::prelude::*;
///
/// #[model]
/// #[table(name = "users")]
/// pub struct User {
///     #[primary_key]
///     pub id: i64,
///     pub name: String,
///     pub age: i32,
/// }
/// ```
pub trait Entity: Default + Debug + Send + Sync + 'static {
    /// Backing table name
    fn table_name() -> &'static str;

    /// Identity column name
    fn primary_key_field() -> &'static str;

    /// Mapped columns in declaration order, excluding the primary key
    fn attribute_fields() -> &'static [&'static str];

    /// Read a mapped field by column name
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Write a mapped field by column name, converting the value to the field type
    fn set_field_value(&mut self, field: &str, value: Value) -> Result<(), EntityError>;

    fn primary_key_value(&self) -> Value {
        self.field_value(Self::primary_key_field())
            .unwrap_or_default()
    }

    /// Build an instance from a result row
    ///
    /// Starts from `Default` and assigns each column to the same-named field.
    /// Columns with no matching field are ignored.
    fn from_row(row: &Row) -> Result<Self, EntityError> {
        let mut entity = Self::default();

        for (column, value) in row.iter() {
            match entity.set_field_value(column, value.clone()) {
                Ok(()) => {}
                Err(EntityError::UnknownField { .. }) => {
                    tracing::trace!(
                        "[MATERIALIZE] Table: {}, skipping unmapped column: {}",
                        Self::table_name(),
                        column
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(entity)
    }
}
