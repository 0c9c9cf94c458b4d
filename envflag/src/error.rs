//! Error types produced while binding configuration.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::duration::DurationError;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvFlagError {
    /// The loaded type, or a nested field reached while walking it, is not a
    /// struct with named fields.
    #[error("`{type_name}` is not a struct with named fields")]
    NotAStruct {
        /// Fully qualified name of the offending type.
        type_name: &'static str,
    },

    /// An environment value, or a declared default standing in for one,
    /// could not be converted to the field's type.
    #[error("invalid value {value:?} for environment variable `{key}` ({type_name}): {source}")]
    InvalidEnvValue {
        /// Environment key consulted for the field.
        key: String,
        /// Raw text that failed to convert.
        value: String,
        /// Rust type of the destination field.
        type_name: &'static str,
        /// Underlying conversion failure.
        #[source]
        source: CoerceError,
    },

    /// A command-line value could not be converted to the field's type.
    #[error("invalid value {value:?} for flag `--{flag}` ({type_name}): {source}")]
    InvalidFlagValue {
        /// Flag name without the leading dashes.
        flag: String,
        /// Raw text that failed to convert.
        value: String,
        /// Rust type of the destination field.
        type_name: &'static str,
        /// Underlying conversion failure.
        #[source]
        source: CoerceError,
    },

    /// The field's type has no string conversion.
    #[error("don't know how to convert {type_name} (field `{name}`)")]
    Unsupported {
        /// Canonical name of the field.
        name: String,
        /// Rust type of the field as written in the schema.
        type_name: &'static str,
    },

    /// Error parsing command-line arguments.
    #[error("Failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),
}

impl EnvFlagError {
    /// Returns the `clap` error kind when the failure came from the
    /// command-line parser.
    ///
    /// Useful for telling `--help` requests apart from genuine syntax errors.
    ///
    /// ```rust
    /// use envflag::{EnvFlagError, FlagSet};
    ///
    /// let mut flags = FlagSet::new("demo");
    /// let err = flags.parse_tokens(&[String::from("--help")]).unwrap_err();
    /// assert_eq!(err.cli_kind(), Some(clap::error::ErrorKind::DisplayHelp));
    /// ```
    #[must_use]
    pub fn cli_kind(&self) -> Option<clap::error::ErrorKind> {
        match self {
            Self::CliParsing(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<clap::Error> for EnvFlagError {
    fn from(err: clap::Error) -> Self {
        Self::CliParsing(Box::new(err))
    }
}

/// Reasons a raw string fails to become a typed leaf value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoerceError {
    /// Malformed integer text.
    #[error(transparent)]
    Int(#[from] ParseIntError),

    /// Malformed floating-point text.
    #[error(transparent)]
    Float(#[from] ParseFloatError),

    /// Text outside the accepted boolean spellings.
    #[error("expected a boolean such as `true`, `false`, `1` or `0`")]
    Bool,

    /// Malformed or out-of-range duration literal.
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// Well-formed number that does not fit the destination width.
    #[error("value out of range for `{type_name}`")]
    OutOfRange {
        /// Destination type.
        type_name: &'static str,
    },

    /// A value of one kind was offered to a field of another.
    #[error("expected a {expected} value, found {found}")]
    KindMismatch {
        /// Kind the destination accepts.
        expected: &'static str,
        /// Kind that was supplied.
        found: &'static str,
    },
}
