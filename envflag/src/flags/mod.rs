//! Flag registry shared between the schema walker and the caller.
//!
//! [`FlagSet`] owns the `clap::Command` that leaf fields register their
//! flags on. Callers may add their own arguments before or after a load and
//! read them back through [`FlagSet::matches`] once parsing has run.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::error::EnvFlagError;
use crate::value::{Kind, Value};

mod tokens;

/// Registry of command-line flags backed by a `clap::Command`.
///
/// ```rust
/// use clap::{Arg, ArgAction};
/// use envflag::FlagSet;
///
/// # fn main() -> Result<(), envflag::EnvFlagError> {
/// let mut flags = FlagSet::new("demo");
/// flags.arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue));
/// let matches = flags.parse_tokens(&[String::from("--verbose")])?;
/// assert!(matches.get_flag("verbose"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FlagSet {
    command: Command,
    matches: Option<ArgMatches>,
}

impl FlagSet {
    /// Creates an empty registry for a program called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_command(Command::new(name.into()))
    }

    /// Wraps an existing command, keeping its arguments and settings.
    ///
    /// Tokens handed to [`FlagSet::parse_tokens`] never include the program
    /// name, so the command is switched to `no_binary_name` mode.
    #[must_use]
    pub fn from_command(command: Command) -> Self {
        Self {
            command: command.no_binary_name(true),
            matches: None,
        }
    }

    /// Registers a caller-owned argument alongside the schema's flags.
    ///
    /// An argument named `help` or `version` (or using `-h`/`-V`) replaces
    /// the flag `clap` would otherwise generate under that name.
    pub fn arg(&mut self, arg: Arg) -> &mut Self {
        let mut command = std::mem::take(&mut self.command);
        if shadows_builtin(&arg, "help", 'h') {
            tracing::debug!(id = %arg.get_id(), "argument replaces the built-in help flag");
            command = command.disable_help_flag(true);
        }
        if shadows_builtin(&arg, "version", 'V') {
            tracing::debug!(id = %arg.get_id(), "argument replaces the built-in version flag");
            command = command.disable_version_flag(true);
        }
        self.command = command.arg(arg);
        self
    }

    /// The underlying command with every flag registered so far.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Renders the help text for every registered flag.
    #[must_use]
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Result of the most recent parse, if any.
    #[must_use]
    pub const fn matches(&self) -> Option<&ArgMatches> {
        self.matches.as_ref()
    }

    /// Parses `tokens` against the registered flags.
    ///
    /// Unknown flags and stray positional tokens are discarded first unless
    /// the command declares positional arguments. Parsing works on a copy of
    /// the command, so flags may still be added afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFlagError::CliParsing`] when `clap` rejects the tokens,
    /// including `--help` requests.
    pub fn parse_tokens(&mut self, tokens: &[String]) -> Result<&ArgMatches, EnvFlagError> {
        let retained = tokens::retain_known(&self.command, tokens);
        if retained.len() != tokens.len() {
            tracing::debug!(
                ignored = tokens.len().saturating_sub(retained.len()),
                "ignored unknown command-line tokens"
            );
        }
        let matches = self.command.clone().try_get_matches_from(retained)?;
        Ok(self.matches.insert(matches))
    }
}

fn shadows_builtin(arg: &Arg, name: &str, short: char) -> bool {
    arg.get_id().as_str() == name
        || arg.get_long() == Some(name)
        || arg.get_short() == Some(short)
}

/// Builds the flag definition for a leaf field.
///
/// `default` is the value the field holds after the environment pass and is
/// advertised in help output unless it is the zero value.
pub(crate) fn leaf_arg(flag: &str, kind: Kind, default: &Value, usage: Option<&str>) -> Arg {
    let mut arg = Arg::new(flag.to_owned())
        .long(flag.to_owned())
        .value_parser(value_parser!(String))
        .action(ArgAction::Append);
    arg = match kind {
        Kind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        Kind::Text
        | Kind::Int
        | Kind::UInt
        | Kind::Float32
        | Kind::Float64
        | Kind::Duration
        | Kind::TextList => arg.num_args(1).allow_hyphen_values(true),
    };
    if let Some(help) = usage {
        arg = arg.help(help.to_owned());
    }
    if !default.is_zero() {
        arg = arg.default_value(default.to_string());
    }
    arg
}

/// Every value given for `id` on the command line, in order.
///
/// Returns `None` when the flag was absent, so defaults registered with
/// `clap` never count as command-line input.
pub(crate) fn command_line_values(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    let values = matches.try_get_many::<String>(id).ok().flatten()?;
    Some(values.cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| (*t).to_owned()).collect()
    }

    fn registry() -> FlagSet {
        let mut flags = FlagSet::new("test");
        flags
            .arg(leaf_arg("int", Kind::Int, &Value::Int(0), Some("an integer")))
            .arg(leaf_arg("debug", Kind::Bool, &Value::Bool(false), None))
            .arg(leaf_arg("tags", Kind::TextList, &Value::TextList(Vec::new()), None));
        flags
    }

    #[rstest]
    #[case(&["--int", "-910"], Some(vec!["-910"]))]
    #[case(&["--int=7", "--int=8"], Some(vec!["7", "8"]))]
    #[case(&[], None)]
    fn collects_command_line_values(
        #[case] raw: &[&str],
        #[case] expected: Option<Vec<&str>>,
    ) -> Result<()> {
        let mut flags = registry();
        let matches = flags
            .parse_tokens(&tokens(raw))
            .map_err(|err| anyhow!(err))?;
        let got = command_line_values(matches, "int");
        let want = expected.map(|v| tokens(&v));
        ensure!(got == want, "expected {want:?}, got {got:?}");
        Ok(())
    }

    #[rstest]
    #[case(&["--debug"], vec!["true"])]
    #[case(&["--debug=false"], vec!["false"])]
    fn boolean_flags_take_an_optional_attached_value(
        #[case] raw: &[&str],
        #[case] expected: Vec<&str>,
    ) -> Result<()> {
        let mut flags = registry();
        let matches = flags
            .parse_tokens(&tokens(raw))
            .map_err(|err| anyhow!(err))?;
        let got = command_line_values(matches, "debug");
        ensure!(got == Some(tokens(&expected)), "unexpected {got:?}");
        Ok(())
    }

    #[test]
    fn registered_defaults_are_not_command_line_values() -> Result<()> {
        let mut flags = FlagSet::new("test");
        flags.arg(leaf_arg(
            "host",
            Kind::Text,
            &Value::Text(String::from("localhost")),
            None,
        ));
        let matches = flags.parse_tokens(&[]).map_err(|err| anyhow!(err))?;
        ensure!(
            matches.get_one::<String>("host").map(String::as_str) == Some("localhost"),
            "default should be registered with clap"
        );
        ensure!(
            command_line_values(matches, "host").is_none(),
            "default must not count as command-line input"
        );
        Ok(())
    }

    #[test]
    fn help_lists_usage_and_non_zero_defaults() {
        let mut flags = FlagSet::new("test");
        flags
            .arg(leaf_arg(
                "port",
                Kind::Int,
                &Value::Int(5432),
                Some("port of the database"),
            ))
            .arg(leaf_arg("user", Kind::Text, &Value::Text(String::new()), None));
        let help = flags.render_help();
        assert!(help.contains("--port"), "{help}");
        assert!(help.contains("port of the database"), "{help}");
        assert!(help.contains("[default: 5432]"), "{help}");
        assert!(help.contains("--user"), "{help}");
    }

    #[test]
    fn unknown_tokens_do_not_fail_the_parse() -> Result<()> {
        let mut flags = registry();
        let matches = flags
            .parse_tokens(&tokens(&["positional", "--other", "value", "--int", "3"]))
            .map_err(|err| anyhow!(err))?;
        let got = command_line_values(matches, "int");
        ensure!(got == Some(tokens(&["3"])), "unexpected {got:?}");
        Ok(())
    }

    #[test]
    fn missing_value_for_known_flag_fails() {
        let mut flags = registry();
        let err = flags.parse_tokens(&tokens(&["--int"]));
        assert!(matches!(err, Err(EnvFlagError::CliParsing(_))));
    }

    #[test]
    fn help_requests_surface_as_display_help() {
        let mut flags = registry();
        let kind = flags
            .parse_tokens(&tokens(&["--help"]))
            .err()
            .and_then(|err| err.cli_kind());
        assert_eq!(kind, Some(clap::error::ErrorKind::DisplayHelp));
    }

    #[rstest]
    #[case("help")]
    #[case("version")]
    fn fields_may_take_over_builtin_flag_names(#[case] name: &str) -> Result<()> {
        let mut flags = FlagSet::from_command(Command::new("test").version("1.0"));
        flags
            .arg(leaf_arg(name, Kind::Text, &Value::Text(String::new()), None))
            .arg(leaf_arg("port", Kind::UInt, &Value::UInt(0), None));
        let flag = format!("--{name}");
        let matches = flags
            .parse_tokens(&tokens(&["--port", "1", flag.as_str(), "text"]))
            .map_err(|err| anyhow!(err))?;
        let got = command_line_values(matches, name);
        ensure!(got == Some(tokens(&["text"])), "unexpected {got:?}");
        Ok(())
    }

    #[test]
    fn help_is_rendered_without_the_builtin_flag() {
        let mut flags = FlagSet::new("test");
        flags.arg(leaf_arg("help", Kind::Bool, &Value::Bool(false), Some("show topics")));
        let help = flags.render_help();
        assert!(help.contains("show topics"), "{help}");
        assert!(!help.contains("Print help"), "{help}");
    }

    #[test]
    fn flags_can_be_added_after_a_parse() -> Result<()> {
        let mut flags = registry();
        flags.parse_tokens(&[]).map_err(|err| anyhow!(err))?;
        flags.arg(leaf_arg("late", Kind::Text, &Value::Text(String::new()), None));
        let matches = flags
            .parse_tokens(&tokens(&["--late", "x"]))
            .map_err(|err| anyhow!(err))?;
        let got = command_line_values(matches, "late");
        ensure!(got == Some(tokens(&["x"])), "unexpected {got:?}");
        ensure!(flags.matches().is_some(), "last parse should be kept");
        Ok(())
    }
}
