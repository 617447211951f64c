//! Procedural macros for mapped entities
//!
//! This crate provides the `#[model]` macro and the `Entity` derive, which
//! generate the table metadata and field accessor table for a struct.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod entity_generation;
mod model_macro;
mod parsing;

use entity_generation::generate_entity_impl;
use model_macro::model_attribute;
use parsing::{parse_field_attributes, parse_table_attributes};

/// Derive macro for the Entity trait
///
/// Every named field is mapped to the same-named column unless marked
/// `#[field(skip)]`; `#[field(column = "...")]` maps it to another column.
/// Exactly one field carries `#[primary_key]`. Generated code refers to the
/// `entity_object` crate, which the accessor prelude brings into scope.
///
/// ```rust,ignore
/// #[derive(Debug, Default, Entity)]
/// #[table(name = "users")]
/// pub struct User {
///     #[primary_key]
///     pub id: i64,
///     pub name: String,
///     pub age: i32,
///     #[field(skip)]
///     pub display_cache: Option<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(table, primary_key, field))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    generate_entity_impl(&input.ident, &input.generics, &table_info, &field_info).into()
}

/// Convenience attribute macro that adds all necessary derives for a mapped entity
///
/// Expands to `#[derive(Debug, Clone, Default, Entity)]` on the struct.
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
