//! Parameter binding from entity fields

use crate::driver::BoundParam;
use crate::errors::EntityError;
use crate::traits::Entity;
use type_mapping::Value;

/// One attribute to bind: the placeholder name defaults to the attribute
/// name and the value defaults to the entity's current field value.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub field: String,
    pub description: Option<String>,
    pub value: Option<Value>,
}

impl Binding {
    pub fn field(field: &str) -> Self {
        Self {
            field: field.to_string(),
            description: None,
            value: None,
        }
    }

    /// Bind under a different placeholder name
    pub fn described_as(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Bind an explicit value instead of the field's current value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.field)
    }
}

/// Resolve bindings against an entity, inferring each parameter type from its value
pub fn bind_values<T: Entity>(
    entity: &T,
    bindings: &[Binding],
) -> Result<Vec<BoundParam>, EntityError> {
    bindings
        .iter()
        .map(|binding| {
            let value = match &binding.value {
                Some(value) => value.clone(),
                None => entity
                    .field_value(&binding.field)
                    .ok_or_else(|| EntityError::unknown_field(T::table_name(), &binding.field))?,
            };
            Ok(BoundParam::new(binding.placeholder(), value))
        })
        .collect()
}

/// Bindings for every attribute field of `T`, in declaration order
pub fn attribute_bindings<T: Entity>() -> Vec<Binding> {
    T::attribute_fields()
        .iter()
        .map(|field| Binding::field(field))
        .collect()
}
