//! Code generation for the `Entity` implementation
//!
//! Emits the static table metadata and the name-keyed field accessor table.

use crate::parsing::{FieldInfo, TableInfo};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

pub fn generate_entity_impl(
    name: &Ident,
    generics: &Generics,
    table_info: &TableInfo,
    field_info: &FieldInfo,
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let table_name = &table_info.name;
    let primary_key = &field_info.primary_key.column;
    let attribute_columns: Vec<&String> =
        field_info.attributes.iter().map(|f| &f.column).collect();

    let columns: Vec<&String> = field_info.all_fields().map(|f| &f.column).collect();
    let idents: Vec<&Ident> = field_info.all_fields().map(|f| &f.ident).collect();

    quote! {
        impl #impl_generics entity_object::Entity for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }

            fn primary_key_field() -> &'static str {
                #primary_key
            }

            fn attribute_fields() -> &'static [&'static str] {
                &[#(#attribute_columns),*]
            }

            fn field_value(&self, field: &str) -> ::core::option::Option<entity_object::Value> {
                match field {
                    #(
                        #columns => ::core::option::Option::Some(
                            entity_object::Value::from(::core::clone::Clone::clone(&self.#idents))
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field_value(
                &mut self,
                field: &str,
                value: entity_object::Value,
            ) -> ::core::result::Result<(), entity_object::EntityError> {
                match field {
                    #(
                        #columns => {
                            self.#idents = entity_object::FromValue::from_value(value)
                                .map_err(|e| entity_object::EntityError::decode(field, e))?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err(
                        entity_object::EntityError::unknown_field(
                            <Self as entity_object::Entity>::table_name(),
                            field,
                        )
                    ),
                }
            }
        }
    }
}
