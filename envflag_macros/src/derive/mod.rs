//! Expansion of `#[derive(EnvFlag)]`.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::DeriveInput;

mod generate;
mod parse;
#[cfg(test)]
mod tests;

/// Expands the derive for `input`.
///
/// Attribute errors are reported at compile time. A type that is not a
/// struct with named fields still gets an implementation, which fails with
/// `NotAStruct` when loaded.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let (struct_attrs, fields) = parse::parse_input(input)?;
    let krate = runtime_path(struct_attrs.crate_path.as_ref());
    let calls = fields.map(|record| {
        record
            .iter()
            .filter_map(|(field, attrs)| generate::field_call(&krate, field, attrs))
            .collect::<Vec<_>>()
    });
    Ok(generate::schema_impl(input, &krate, calls.as_deref()))
}

/// Path that generated code uses to reach the runtime crate.
///
/// `#[envflag(crate = "...")]` lets a caller that renamed or re-exported the
/// dependency point the expansion at it.
fn runtime_path(alias: Option<&syn::Path>) -> TokenStream {
    alias.map_or_else(|| quote! { ::envflag }, ToTokens::to_token_stream)
}
