//! Typed leaf values and the string conversions shared by the environment
//! and command-line paths.
//!
//! Every raw string, whether it came from the environment, a declared
//! default, or the command line, is first converted into a [`Value`] for the
//! destination's [`Kind`] and only then narrowed into the field's concrete
//! type through [`Leaf::from_value`].

use std::fmt;
use std::time::Duration;

use crate::duration::{format_duration, parse_duration};
use crate::error::CoerceError;

mod leaf;

pub use leaf::Leaf;

/// Conversion target of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Free text.
    Text,
    /// Signed decimal integer.
    Int,
    /// Unsigned decimal integer.
    UInt,
    /// Floating-point number parsed at single precision.
    Float32,
    /// Floating-point number parsed at double precision.
    Float64,
    /// Boolean literal.
    Bool,
    /// Duration literal such as `5m` or `1h30m`.
    Duration,
    /// Comma-separated list of text items.
    TextList,
}

impl Kind {
    /// Short human-readable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "integer",
            Self::UInt => "unsigned integer",
            Self::Float32 | Self::Float64 => "float",
            Self::Bool => "boolean",
            Self::Duration => "duration",
            Self::TextList => "text list",
        }
    }
}

/// A coerced leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free text.
    Text(String),
    /// Signed integer, widened to 64 bits.
    Int(i64),
    /// Unsigned integer, widened to 64 bits.
    UInt(u64),
    /// Floating-point number, widened to 64 bits.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Non-negative duration.
    Duration(Duration),
    /// Ordered list of text items.
    TextList(Vec<String>),
}

impl Value {
    /// Name of the kind this value carries, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => Kind::Text.name(),
            Self::Int(_) => Kind::Int.name(),
            Self::UInt(_) => Kind::UInt.name(),
            Self::Float(_) => Kind::Float64.name(),
            Self::Bool(_) => Kind::Bool.name(),
            Self::Duration(_) => Kind::Duration.name(),
            Self::TextList(_) => Kind::TextList.name(),
        }
    }

    /// Whether the value equals the zero value of its kind.
    ///
    /// Zero values are not advertised as flag defaults in help output.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Int(v) => *v == 0,
            Self::UInt(v) => *v == 0,
            Self::Float(v) => v.to_bits() == 0,
            Self::Bool(v) => !*v,
            Self::Duration(v) => v.is_zero(),
            Self::TextList(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Duration(v) => f.write_str(&format_duration(*v)),
            Self::TextList(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Converts `raw` into a [`Value`] of the requested `kind`.
///
/// Empty input yields the zero value of every kind.
///
/// # Errors
///
/// Returns a [`CoerceError`] when `raw` is malformed for `kind`.
///
/// # Examples
///
/// ```rust
/// use envflag::value::{Kind, Value, coerce};
///
/// # fn main() -> Result<(), envflag::CoerceError> {
/// assert_eq!(coerce("-910", Kind::Int)?, Value::Int(-910));
/// assert_eq!(coerce("", Kind::Bool)?, Value::Bool(false));
/// assert_eq!(
///     coerce("a,b", Kind::TextList)?,
///     Value::TextList(vec!["a".into(), "b".into()])
/// );
/// # Ok(())
/// # }
/// ```
pub fn coerce(raw: &str, kind: Kind) -> Result<Value, CoerceError> {
    if raw.is_empty() {
        return Ok(zero(kind));
    }
    Ok(match kind {
        Kind::Text => Value::Text(raw.to_owned()),
        Kind::Int => Value::Int(raw.parse()?),
        Kind::UInt => Value::UInt(raw.parse()?),
        Kind::Float32 => Value::Float(f64::from(raw.parse::<f32>()?)),
        Kind::Float64 => Value::Float(raw.parse()?),
        Kind::Bool => Value::Bool(parse_bool(raw)?),
        Kind::Duration => Value::Duration(parse_duration(raw)?),
        Kind::TextList => Value::TextList(split_list(raw)),
    })
}

/// Converts every command-line occurrence of a flag into one [`Value`].
///
/// Lists split each occurrence on commas and concatenate the results, so
/// `--tag=a,b --tag=c` yields `[a, b, c]`. Every other kind takes the last
/// occurrence.
pub(crate) fn coerce_occurrences(
    occurrences: &[String],
    kind: Kind,
) -> Result<Value, CoerceError> {
    match kind {
        Kind::TextList => Ok(Value::TextList(
            occurrences
                .iter()
                .map(String::as_str)
                .flat_map(split_list)
                .collect(),
        )),
        Kind::Text
        | Kind::Int
        | Kind::UInt
        | Kind::Float32
        | Kind::Float64
        | Kind::Bool
        | Kind::Duration => coerce(
            occurrences.last().map_or("", String::as_str),
            kind,
        ),
    }
}

fn zero(kind: Kind) -> Value {
    match kind {
        Kind::Text => Value::Text(String::new()),
        Kind::Int => Value::Int(0),
        Kind::UInt => Value::UInt(0),
        Kind::Float32 | Kind::Float64 => Value::Float(0.0),
        Kind::Bool => Value::Bool(false),
        Kind::Duration => Value::Duration(Duration::ZERO),
        Kind::TextList => Value::TextList(Vec::new()),
    }
}

fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::Bool),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_owned).collect()
}
