//! Error reporting for unsupported schemas and malformed values.

use anyhow::{Result, anyhow, ensure};
use envflag::{CoerceError, EnvFlag, EnvFlagError, Options, Schema};
use rstest::rstest;

#[derive(Debug, Default, PartialEq, EnvFlag)]
struct WithChar {
    pub letter: char,
}

#[derive(Debug, Default, PartialEq, EnvFlag)]
struct WithNumberList {
    pub ports: Vec<u32>,
}

#[derive(Debug, Default, PartialEq, EnvFlag)]
struct WithOptionalLeaf {
    pub retries: Option<u8>,
}

#[derive(Debug, Default, EnvFlag)]
struct WithSkippedChar {
    pub host: String,
    #[envflag(name = "")]
    pub letter: char,
}

fn empty_options() -> Options<'static> {
    Options::default()
        .with_env(Vec::<String>::new())
        .with_args(Vec::<String>::new())
}

fn expect_unsupported(
    result: Result<(), EnvFlagError>,
    expected_name: &str,
    expected_type: &str,
) -> Result<()> {
    match result {
        Err(EnvFlagError::Unsupported { name, type_name }) => {
            ensure!(name == expected_name, "unexpected field name {name}");
            ensure!(type_name == expected_type, "unexpected type {type_name}");
            Ok(())
        }
        other => Err(anyhow!("expected Unsupported, got {other:?}")),
    }
}

#[test]
fn char_fields_are_unsupported() -> Result<()> {
    let result = WithChar::load_with(empty_options()).map(drop);
    expect_unsupported(result, "Letter", "char")
}

#[test]
fn lists_of_numbers_are_unsupported() -> Result<()> {
    let result = WithNumberList::load_with(empty_options()).map(drop);
    expect_unsupported(result, "Ports", "Vec<u32>")
}

#[test]
fn optional_leaves_are_unsupported() -> Result<()> {
    let result = WithOptionalLeaf::load_with(empty_options()).map(drop);
    expect_unsupported(result, "Retries", "Option<u8>")
}

#[test]
fn unsupported_message_names_the_type() -> Result<()> {
    let err = WithChar::load_with(empty_options())
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    let message = err.to_string();
    ensure!(
        message.contains("don't know how to convert char"),
        "unexpected message {message}"
    );
    Ok(())
}

#[test]
fn skipped_fields_may_have_unsupported_types() -> Result<()> {
    let cfg = WithSkippedChar::load_with(
        Options::default()
            .with_env(["HOST=db", "LETTER=x"])
            .with_args(Vec::<String>::new()),
    )
    .map_err(|err| anyhow!(err))?;
    ensure!(cfg.host == "db", "unexpected host {}", cfg.host);
    ensure!(cfg.letter == char::default(), "letter should stay untouched");
    Ok(())
}

#[derive(Debug, Default, EnvFlag)]
enum Mode {
    #[default]
    Fast,
}

#[test]
fn enums_are_not_structs() -> Result<()> {
    match Mode::load_with(empty_options()) {
        Err(EnvFlagError::NotAStruct { type_name }) => {
            ensure!(type_name.ends_with("Mode"), "unexpected type {type_name}");
            Ok(())
        }
        other => Err(anyhow!("expected NotAStruct, got {other:?}")),
    }
}

#[derive(Debug, Default, EnvFlag)]
struct Typed {
    pub port: u16,
    pub ratio: f64,
    pub enabled: bool,
    pub timeout: std::time::Duration,
}

#[rstest]
#[case("PORT=http", "PORT")]
#[case("PORT=70000", "PORT")]
#[case("PORT=-1", "PORT")]
#[case("RATIO=half", "RATIO")]
#[case("ENABLED=yes", "ENABLED")]
#[case("TIMEOUT=5", "TIMEOUT")]
#[case("TIMEOUT=-5s", "TIMEOUT")]
fn malformed_env_values_name_their_key(#[case] entry: &str, #[case] expected_key: &str) -> Result<()> {
    let result = Typed::load_with(
        Options::default()
            .with_env([entry])
            .with_args(Vec::<String>::new()),
    );
    match result {
        Err(EnvFlagError::InvalidEnvValue { key, .. }) => {
            ensure!(key == expected_key, "unexpected key {key}");
            Ok(())
        }
        other => Err(anyhow!("expected InvalidEnvValue, got {other:?}")),
    }
}

#[test]
fn out_of_range_values_report_the_destination_type() -> Result<()> {
    let result = Typed::load_with(
        Options::default()
            .with_env(["PORT=70000"])
            .with_args(Vec::<String>::new()),
    );
    match result {
        Err(EnvFlagError::InvalidEnvValue {
            type_name, source, ..
        }) => {
            ensure!(type_name == "u16", "unexpected type {type_name}");
            ensure!(
                source == CoerceError::OutOfRange { type_name: "u16" },
                "unexpected source {source:?}"
            );
            Ok(())
        }
        other => Err(anyhow!("expected InvalidEnvValue, got {other:?}")),
    }
}

#[rstest]
#[case(&["--port", "http"], "port", "http")]
#[case(&["--ratio=1.2.3"], "ratio", "1.2.3")]
#[case(&["--enabled=maybe"], "enabled", "maybe")]
#[case(&["--timeout", "10x"], "timeout", "10x")]
fn malformed_flag_values_name_their_flag(
    #[case] args: &[&str],
    #[case] expected_flag: &str,
    #[case] expected_value: &str,
) -> Result<()> {
    let result = Typed::load_with(
        Options::default()
            .with_env(Vec::<String>::new())
            .with_args(args.iter().copied()),
    );
    match result {
        Err(EnvFlagError::InvalidFlagValue { flag, value, .. }) => {
            ensure!(flag == expected_flag, "unexpected flag {flag}");
            ensure!(value == expected_value, "unexpected value {value}");
            Ok(())
        }
        other => Err(anyhow!("expected InvalidFlagValue, got {other:?}")),
    }
}

#[test]
fn env_values_are_validated_even_when_overridden() -> Result<()> {
    let cfg = Typed::load_with(
        Options::default()
            .with_env(["PORT=http"])
            .with_args(["--port", "8080"]),
    );
    ensure!(
        matches!(cfg, Err(EnvFlagError::InvalidEnvValue { .. })),
        "unexpected result {cfg:?}"
    );
    Ok(())
}

#[test]
fn help_requests_surface_as_cli_errors() -> Result<()> {
    let err = Typed::load_with(
        Options::default()
            .with_env(Vec::<String>::new())
            .with_args(["--help"]),
    )
    .err()
    .ok_or_else(|| anyhow!("expected a help error"))?;
    ensure!(
        err.cli_kind() == Some(clap::error::ErrorKind::DisplayHelp),
        "unexpected error {err:?}"
    );
    Ok(())
}

#[test]
fn known_flags_without_a_value_fail() -> Result<()> {
    let err = Typed::load_with(
        Options::default()
            .with_env(Vec::<String>::new())
            .with_args(["--port"]),
    )
    .err()
    .ok_or_else(|| anyhow!("expected a parse error"))?;
    ensure!(
        matches!(err, EnvFlagError::CliParsing(_)),
        "unexpected error {err:?}"
    );
    Ok(())
}
