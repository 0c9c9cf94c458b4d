//! Parsing utilities for the `EnvFlag` derive macro.

use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, Meta};

mod literals;
mod type_utils;

use literals::{lit_default, lit_str};
pub(crate) use type_utils::{FieldKind, classify};

/// Struct-level attributes recognised by `#[derive(EnvFlag)]`.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[envflag(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `envflag::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(EnvFlag)]`.
///
/// - `name` replaces the canonical name accumulated from parent fields; an
///   empty string skips the field.
/// - `usage` sets the flag's help text. Without it the first paragraph of
///   the field's doc comment is used.
/// - `default` supplies the value used when the environment has none.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldAttrs {
    pub name: Option<String>,
    pub usage: Option<String>,
    pub default: Option<String>,
}

/// Iterate all `#[envflag(...)]` attributes once and apply a callback.
fn parse_envflag<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("envflag")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown_key(meta: &syn::meta::ParseNestedMeta) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| String::from("<path>"), ToString::to_string);
    meta.error(format!("unknown envflag attribute `{key}`"))
}

/// Extracts `#[envflag(...)]` metadata applied to a struct.
///
/// Only `crate` is recognised; any other key is rejected.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs, syn::Error> {
    let mut out = StructAttrs::default();
    parse_envflag(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            return Ok(());
        }
        Err(unknown_key(meta))
    })?;
    Ok(out)
}

/// Parses field-level `#[envflag(...)]` attributes.
///
/// Recognised keys are `name`, `usage` and `default`. When `usage` is absent
/// the first paragraph of the field's doc comment stands in for it.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs, syn::Error> {
    let mut out = FieldAttrs::default();
    parse_envflag(attrs, |meta| {
        let Some(ident) = meta.path.get_ident() else {
            return Err(unknown_key(meta));
        };
        match ident.to_string().as_str() {
            "name" => out.name = Some(lit_str(meta, "name")?.value()),
            "usage" => out.usage = Some(lit_str(meta, "usage")?.value()),
            "default" => out.default = Some(lit_default(meta, "default")?),
            _ => return Err(unknown_key(meta)),
        }
        Ok(())
    })?;
    if out.usage.is_none() {
        out.usage = doc_summary(attrs);
    }
    Ok(out)
}

/// First paragraph of the doc comment in `attrs`, joined into one line.
fn doc_summary(attrs: &[Attribute]) -> Option<String> {
    let lines = attrs.iter().filter_map(|attr| {
        if !attr.path().is_ident("doc") {
            return None;
        }
        let Meta::NameValue(nv) = &attr.meta else {
            return None;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &nv.value
        else {
            return None;
        };
        Some(s.value())
    });

    let mut words: Vec<String> = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if words.is_empty() {
                continue;
            }
            break;
        }
        words.push(trimmed.to_owned());
    }
    (!words.is_empty()).then(|| words.join(" "))
}

/// Gathers information from the user-provided type.
///
/// The returned tuple contains the struct-level attributes and, for structs
/// with named fields, each field paired with its parsed attributes. Any other
/// shape yields `None` and is reported when the type is loaded.
pub(crate) fn parse_input(
    input: &DeriveInput,
) -> Result<(StructAttrs, Option<Vec<(syn::Field, FieldAttrs)>>), syn::Error> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let Data::Struct(data) = &input.data else {
        return Ok((struct_attrs, None));
    };
    let Fields::Named(named) = &data.fields else {
        return Ok((struct_attrs, None));
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for f in &named.named {
        fields.push((f.clone(), parse_field_attrs(&f.attrs)?));
    }
    Ok((struct_attrs, Some(fields)))
}
