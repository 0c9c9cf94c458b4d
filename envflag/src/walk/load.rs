//! Entry points that run a full load against a schema.

use super::{Schema, Walker};
use crate::env::{EnvTable, normalize_prefix};
use crate::error::EnvFlagError;
use crate::flags::FlagSet;

/// Inputs for a single [`load`] call.
///
/// Every setting is optional: the process environment, the process arguments
/// (without the program name), no prefix and a private flag registry are used
/// when nothing is supplied.
///
/// ```rust
/// use envflag::{FlagSet, Options};
///
/// let mut flags = FlagSet::new("demo");
/// let options = Options::default()
///     .with_env(["APP_HOST=db"])
///     .with_args(["--port", "5433"])
///     .with_prefix("APP")
///     .with_flag_set(&mut flags);
/// # let _ = options;
/// ```
#[derive(Debug, Default)]
pub struct Options<'f> {
    args: Option<Vec<String>>,
    env: Option<Vec<String>>,
    prefix: Option<String>,
    flag_set: Option<&'f mut FlagSet>,
}

impl<'f> Options<'f> {
    /// Uses `args` instead of the process arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Uses the `KEY=VALUE` strings in `env` instead of the process
    /// environment.
    #[must_use]
    pub fn with_env<I, S>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = Some(env.into_iter().map(Into::into).collect());
        self
    }

    /// Strips `prefix` (with or without a trailing `_`) from environment
    /// keys before lookup.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Registers flags on `flag_set` instead of a private registry.
    ///
    /// The registry keeps the flags and the parse result after the load, so
    /// the caller can render help or read its own arguments.
    #[must_use]
    pub fn with_flag_set(mut self, flag_set: &'f mut FlagSet) -> Self {
        self.flag_set = Some(flag_set);
        self
    }
}

/// Populates `target` from the environment and command line.
///
/// Values resolve with command-line flags first, then environment variables,
/// then declared defaults, then the zero value of the field's type.
///
/// # Errors
///
/// Returns an [`EnvFlagError`] when a value fails to convert, a field type is
/// unsupported, the schema is not a struct, or `clap` rejects the arguments.
/// Fields written before the failure keep their values.
///
/// # Examples
///
/// ```rust
/// use envflag::{EnvFlag, Options, load};
///
/// #[derive(Debug, Default, EnvFlag)]
/// struct Settings {
///     pub host: String,
///     pub port: u16,
/// }
///
/// # fn main() -> Result<(), envflag::EnvFlagError> {
/// let mut settings = Settings::default();
/// load(
///     &mut settings,
///     Options::default()
///         .with_env(["HOST=db", "PORT=5432"])
///         .with_args(["--port=5433"]),
/// )?;
/// assert_eq!(settings.host, "db");
/// assert_eq!(settings.port, 5433);
/// # Ok(())
/// # }
/// ```
pub fn load<T: Schema + ?Sized>(target: &mut T, options: Options<'_>) -> Result<(), EnvFlagError> {
    let Options {
        args,
        env,
        prefix,
        flag_set,
    } = options;

    let normalized = prefix.as_deref().and_then(normalize_prefix);
    let entries = env.unwrap_or_else(process_env);
    let table = EnvTable::from_entries(&entries, normalized.as_deref());
    let tokens = args.unwrap_or_else(process_args);

    let mut private = FlagSet::new(program_name::<T>());
    let flags = flag_set.unwrap_or(&mut private);

    let mut walker = Walker::new(table);
    target.walk(&mut walker, "")?;
    walker.finish(flags, &tokens)
}

/// Populates `target` from the process environment and arguments.
///
/// # Errors
///
/// See [`load`].
pub fn load_default<T: Schema + ?Sized>(target: &mut T) -> Result<(), EnvFlagError> {
    load(target, Options::default())
}

fn process_env() -> Vec<String> {
    std::env::vars_os()
        .filter_map(|(key, value)| {
            let key_text = key.into_string().ok()?;
            let value_text = value.into_string().ok()?;
            Some(format!("{key_text}={value_text}"))
        })
        .collect()
}

fn process_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Unqualified name of `T`, used as the program name in help output.
fn program_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}
