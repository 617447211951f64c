//! Parsing utilities for table and field attributes
//!
//! This module handles the parsing of `#[table]`, `#[primary_key]` and
//! `#[field]` attributes and validation of table and column names.

use syn::ext::IdentExt;
use syn::{Attribute, Data, Error, Fields, Ident, LitStr, Result};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Validation logic that mirrors entity_object::validation
/// This keeps compile-time validation in line with runtime validation
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!(
            "Name '{}' is a reserved SQL keyword; identifiers are not quoted, so a column with this name cannot be mapped. Rename the column or exclude the field with #[field(skip)]",
            name
        ));
    }

    Ok(())
}

/// Check if a name is a reserved SQL keyword
/// This mirrors the list in entity_object::validation
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "INNER", "LEFT",
        "RIGHT", "FULL", "OUTER", "ON", "AS", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE",
        "CASE", "WHEN", "THEN", "ELSE", "END", "IF", "EXISTS", "IN", "LIKE", "ILIKE",
        "BETWEEN", "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION", "ALL",
        "DISTINCT", "CREATE", "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "PRIMARY",
        "FOREIGN", "REFERENCES", "UNIQUE", "CHECK", "DEFAULT", "CONSTRAINT", "COLUMN",
        "RETURNING", "USING", "INTO", "VALUES", "SET",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
}

/// One mapped struct field
#[derive(Debug)]
pub struct MappedField {
    pub ident: Ident,
    pub column: String,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub primary_key: MappedField,
    /// Mapped non-key fields in declaration order
    pub attributes: Vec<MappedField>,
}

impl FieldInfo {
    /// Primary key first, then attributes
    pub fn all_fields(&self) -> impl Iterator<Item = &MappedField> {
        std::iter::once(&self.primary_key).chain(self.attributes.iter())
    }
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name: Option<LitStr> = None;

    for attr in attrs {
        if attr.path().is_ident("table") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    table_name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported table attribute, expected `name = \"...\"`"))
                }
            })?;
        }
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    validate_table_name_syn(&table_name.value(), table_name.span())?;

    Ok(TableInfo {
        name: table_name.value(),
    })
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    column: Option<LitStr>,
}

fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if attr.path().is_ident("field") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("column") {
                    options.column = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported field attribute, expected `skip` or `column = \"...\"`"))
                }
            })?;
        }
    }

    Ok(options)
}

fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

pub fn parse_field_attributes(data: &Data) -> Result<FieldInfo> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity can only be derived for structs",
        ));
    };

    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity requires a struct with named fields",
        ));
    };

    let mut primary_key: Option<MappedField> = None;
    let mut attributes = Vec::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let options = parse_field_options(&field.attrs)?;
        let is_primary_key = has_attribute(&field.attrs, "primary_key");

        if options.skip {
            if is_primary_key {
                return Err(Error::new(
                    ident.span(),
                    "the primary key field cannot be skipped",
                ));
            }
            continue;
        }

        let column = match &options.column {
            Some(lit) => {
                validate_column_name_syn(&lit.value(), lit.span())?;
                lit.value()
            }
            None => {
                let name = ident.unraw().to_string();
                validate_column_name_syn(&name, ident.span())?;
                name
            }
        };

        if attributes
            .iter()
            .chain(primary_key.iter())
            .any(|existing: &MappedField| existing.column == column)
        {
            return Err(Error::new(
                ident.span(),
                format!("column '{}' is mapped more than once", column),
            ));
        }

        let mapped = MappedField { ident, column };

        if is_primary_key {
            if primary_key.is_some() {
                return Err(Error::new(
                    mapped.ident.span(),
                    "only one field can be marked #[primary_key]",
                ));
            }
            primary_key = Some(mapped);
        } else {
            attributes.push(mapped);
        }
    }

    let primary_key = primary_key.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "a #[primary_key] field is required",
        )
    })?;

    Ok(FieldInfo {
        primary_key,
        attributes,
    })
}
