//! Unit tests for the generated `Schema` implementation.

use super::expand;
use anyhow::{Result, anyhow, ensure};
use quote::quote;
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

fn expand_to_string(input: &DeriveInput) -> Result<String> {
    expand(input)
        .map(|tokens| tokens.to_string())
        .map_err(|err| anyhow!(err))
}

#[test]
fn emits_one_walker_call_per_public_field() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Config {
            pub host: String,
            #[envflag(name = "PG", usage = "database")]
            pub pg_config: PgConfig,
            pub replica: Option<PgConfig>,
            pub ratio: i128,
            private: String,
        }
    };
    let generated = expand_to_string(&input)?;
    let expected_calls = [
        quote! { walker.leaf(&mut self.host, &::envflag::Field::new("Host"), prefix)?; },
        quote! {
            walker.nested(
                &mut self.pg_config,
                &::envflag::Field::new("PgConfig").with_name("PG").with_usage("database"),
                prefix
            )?;
        },
        quote! { walker.optional(&mut self.replica, &::envflag::Field::new("Replica"), prefix)?; },
        quote! { walker.unsupported(&::envflag::Field::new("Ratio"), "i128", prefix)?; },
    ];
    for call in expected_calls {
        let text = call.to_string();
        ensure!(generated.contains(&text), "missing `{text}` in {generated}");
    }
    ensure!(
        !generated.contains("self . private"),
        "private fields must not be walked: {generated}"
    );
    Ok(())
}

#[rstest]
#[case::crate_visible(quote! { pub(crate) })]
#[case::parent_visible(quote! { pub(super) })]
#[case::path_visible(quote! { pub(in crate::settings) })]
fn restricted_visibility_still_binds(#[case] vis: proc_macro2::TokenStream) -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Config {
            #vis level: u8,
            hidden: u8,
        }
    };
    let generated = expand_to_string(&input)?;
    let call = quote! { walker.leaf(&mut self.level, &::envflag::Field::new("Level"), prefix)?; }
        .to_string();
    ensure!(generated.contains(&call), "missing `{call}` in {generated}");
    ensure!(
        !generated.contains("self . hidden"),
        "fields without a visibility qualifier must not be walked: {generated}"
    );
    Ok(())
}

#[test]
fn raw_identifiers_lose_their_prefix() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Config {
            pub r#type: String,
        }
    };
    let generated = expand_to_string(&input)?;
    ensure!(
        generated.contains("Field :: new (\"Type\")"),
        "unexpected segment in {generated}"
    );
    Ok(())
}

#[rstest]
#[case(parse_quote!(enum Mode { Fast, Slow }))]
#[case(parse_quote!(struct Pair(u8, u8);))]
#[case(parse_quote!(struct Unit;))]
fn non_records_report_not_a_struct(#[case] input: DeriveInput) -> Result<()> {
    let generated = expand_to_string(&input)?;
    ensure!(
        generated.contains("NotAStruct"),
        "expected NotAStruct in {generated}"
    );
    Ok(())
}

#[test]
fn honours_crate_override_and_generics() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[envflag(crate = "renamed")]
        struct Wrapper<T: Default> {
            pub inner: T,
        }
    };
    let generated = expand_to_string(&input)?;
    let header = quote! { impl<T: Default> renamed::Schema for Wrapper<T> }.to_string();
    ensure!(generated.contains(&header), "missing `{header}` in {generated}");
    ensure!(!generated.contains("envflag ::"), "default path leaked: {generated}");
    Ok(())
}

#[rstest]
#[case::absolute(None, ":: envflag :: Schema")]
#[case::vendored(Some("vendored :: envflag"), "vendored :: envflag :: Schema")]
#[case::leading_colons(Some(":: cfg_bind"), ":: cfg_bind :: Schema")]
fn schema_trait_follows_the_runtime_path(
    #[case] alias: Option<&str>,
    #[case] trait_path: &str,
) -> Result<()> {
    let mut input: DeriveInput = parse_quote! {
        struct Config {
            pub port: u16,
        }
    };
    if let Some(path) = alias {
        input.attrs.push(parse_quote! { #[envflag(crate = #path)] });
    }
    let generated = expand_to_string(&input)?;
    ensure!(
        generated.contains(&format!("impl {trait_path} for Config")),
        "expected `{trait_path}` impl in {generated}"
    );
    Ok(())
}

#[test]
fn attribute_errors_abort_expansion() {
    let input: DeriveInput = parse_quote! {
        struct Config {
            #[envflag(default = some_value)]
            pub port: u16,
        }
    };
    assert!(expand(&input).is_err());
}
