//! Code generation for the `Schema` implementation.

use heck::ToUpperCamelCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Visibility};

use super::parse::{FieldAttrs, FieldKind, classify};

/// Builds the `envflag::Field` metadata expression for one field.
fn field_meta(krate: &TokenStream, ident: &syn::Ident, attrs: &FieldAttrs) -> TokenStream {
    let segment = ident.unraw().to_string().to_upper_camel_case();
    let mut meta = quote! { #krate::Field::new(#segment) };
    if let Some(name) = &attrs.name {
        meta = quote! { #meta.with_name(#name) };
    }
    if let Some(usage) = &attrs.usage {
        meta = quote! { #meta.with_usage(#usage) };
    }
    if let Some(default) = &attrs.default {
        meta = quote! { #meta.with_default(#default) };
    }
    meta
}

/// Emits the walker call for one visible field.
///
/// Any visibility qualifier (`pub`, `pub(crate)`, `pub(super)`) makes a field
/// settable; fields without one yield nothing.
pub(crate) fn field_call(
    krate: &TokenStream,
    field: &syn::Field,
    attrs: &FieldAttrs,
) -> Option<TokenStream> {
    if matches!(field.vis, Visibility::Inherited) {
        return None;
    }
    let ident = field.ident.as_ref()?;
    let meta = field_meta(krate, ident, attrs);
    let call = match classify(&field.ty) {
        FieldKind::Leaf => quote! { walker.leaf(&mut self.#ident, &#meta, prefix)?; },
        FieldKind::Nested => quote! { walker.nested(&mut self.#ident, &#meta, prefix)?; },
        FieldKind::Optional => quote! { walker.optional(&mut self.#ident, &#meta, prefix)?; },
        FieldKind::Unsupported(type_name) => {
            quote! { walker.unsupported(&#meta, #type_name, prefix)?; }
        }
    };
    Some(call)
}

/// Emits the `Schema` impl.
///
/// `field_calls` is `None` when the input is not a struct with named fields, in
/// which case the generated `walk` reports `NotAStruct`.
pub(crate) fn schema_impl(
    input: &DeriveInput,
    krate: &TokenStream,
    field_calls: Option<&[TokenStream]>,
) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match field_calls {
        Some(calls) if !calls.is_empty() => quote! {
            #( #calls )*
            ::core::result::Result::Ok(())
        },
        Some(_) => quote! {
            let _ = (walker, prefix);
            ::core::result::Result::Ok(())
        },
        None => quote! {
            let _ = (walker, prefix);
            ::core::result::Result::Err(#krate::EnvFlagError::NotAStruct {
                type_name: ::core::any::type_name::<Self>(),
            })
        },
    };

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Schema for #ident #ty_generics #where_clause {
            fn walk<'__envflag>(
                &'__envflag mut self,
                walker: &mut #krate::Walker<'__envflag>,
                prefix: &str,
            ) -> ::core::result::Result<(), #krate::EnvFlagError> {
                #body
            }
        }
    }
}
