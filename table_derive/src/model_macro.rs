use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput};

/// Convenience attribute macro that adds all necessary derives for a mapped entity
///
/// Usage:
/// ```rust,ignore
/// use table_derive::model;
///
/// #[model]
/// #[table(name = "users")]
/// pub struct User {
///     #[primary_key]
///     pub id: i64,
///     pub name: String,
/// }
/// ```
pub fn model_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    if !matches!(input.data, Data::Struct(_)) {
        return syn::Error::new_spanned(&input.ident, "model can only be used on structs")
            .to_compile_error()
            .into();
    }

    let expanded = quote! {
        #[derive(Debug, Clone, Default, Entity)]
        #input
    };

    TokenStream::from(expanded)
}
