//! Derive macro projecting structs into where-conditions.
//!
//! This crate provides `#[derive(Where)]`, which implements
//! `quarry_core::WhereFields` so a struct can be passed wherever a condition
//! map is accepted. Fields keep their declaration order.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Meta};

/// Derives `WhereFields` for a struct with named fields.
///
/// # Attributes
///
/// - `#[condition(params)]` - Marks the struct as a parameter object: fields
///   that are `None` are left out of the condition
///
/// # Field Attributes
///
/// - `#[condition(name = "key")]` - Uses `key` instead of the field name. The
///   key may carry an operator (`"age >"`, `"name like"`)
/// - `#[condition(skip)]` - Leaves the field out of the condition
///
/// Every included field must implement `Clone` and `quarry_core::ToSqlValue`.
#[proc_macro_derive(Where, attributes(condition))]
pub fn derive_where(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_where_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_where_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let params = parse_struct_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Where derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Where derive only supports structs",
            ));
        }
    };

    let mut entries: Vec<TokenStream2> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let key = attrs.name.unwrap_or_else(|| {
            let name = field_name.to_string();
            name.strip_prefix("r#").map_or(name.clone(), str::to_string)
        });
        entries.push(quote! {
            (
                ::std::string::String::from(#key),
                ::quarry_core::ToSqlValue::to_sql_value(
                    ::std::clone::Clone::clone(&self.#field_name)
                ),
            )
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::quarry_core::WhereFields for #struct_name #ty_generics #where_clause {
            const PARAMS: bool = #params;

            fn where_fields(
                &self,
            ) -> ::std::vec::Vec<(::std::string::String, ::quarry_core::SqlValue)> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

struct FieldAttrs {
    name: Option<String>,
    skip: bool,
}

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut params = false;
    for attr in attrs {
        if !attr.path().is_ident("condition") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("params") {
                params = true;
                Ok(())
            } else {
                Err(meta.error("expected `params`"))
            }
        })?;
    }
    Ok(params)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs {
        name: None,
        skip: false,
    };

    for attr in attrs {
        if !attr.path().is_ident("condition") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                result.name = Some(value.value());
            } else {
                return Err(meta.error("expected `name = \"...\"` or `skip`"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
