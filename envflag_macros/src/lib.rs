//! Procedural macros for `envflag`.
//!
//! `#[derive(EnvFlag)]` implements `envflag::Schema` for a struct with named
//! fields. Each field with a visibility qualifier (`pub`, `pub(crate)` and so
//! on) becomes one call on the walker, chosen from the field's type:
//!
//! - `String`, `bool`, integers up to 64 bits, `f32`, `f64`,
//!   `std::time::Duration` and `Vec<String>` are bound as leaves;
//! - `Option<T>` of a record is allocated and walked;
//! - any other path type is walked as a nested record;
//! - everything else is reported as unsupported when loaded.
//!
//! Field identifiers are converted to `UpperCamelCase` so the segments of a
//! nested path keep their word boundaries when concatenated.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `envflag::Schema`.
///
/// Field attributes, all optional:
///
/// - `#[envflag(name = "...")]` replaces the accumulated canonical name; an
///   empty string skips the field.
/// - `#[envflag(usage = "...")]` sets the flag's help text (defaults to the
///   first paragraph of the field's doc comment).
/// - `#[envflag(default = ...)]` supplies a string, number or boolean used
///   when the environment has no value.
///
/// Struct attribute: `#[envflag(crate = "path")]` points generated code at a
/// renamed dependency.
#[proc_macro_derive(EnvFlag, attributes(envflag))]
pub fn derive_env_flag(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as DeriveInput);
    derive::expand(&derive_input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
