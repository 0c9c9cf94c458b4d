//! Field types that can be bound to an environment key and a flag.

use std::time::Duration;

use super::{Kind, Value};
use crate::error::CoerceError;

/// A field type with a string conversion.
///
/// Implemented for `String`, `bool`, every signed and unsigned integer up to
/// 64 bits, `f32`, `f64`, [`Duration`] and `Vec<String>`. The derive macro
/// binds fields of these types as leaves; other types are either recursed
/// into as nested records or rejected as unsupported.
pub trait Leaf: Sized {
    /// Conversion target used for raw text destined for this type.
    const KIND: Kind;

    /// Type name reported in diagnostics.
    const TYPE_NAME: &'static str;

    /// Narrows a coerced value into this type.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError::OutOfRange`] when the value does not fit and
    /// [`CoerceError::KindMismatch`] when `value` is of another kind.
    fn from_value(value: Value) -> Result<Self, CoerceError>;
}

fn mismatch(expected: Kind, found: &Value) -> CoerceError {
    CoerceError::KindMismatch {
        expected: expected.name(),
        found: found.kind_name(),
    }
}

macro_rules! integer_leaf {
    ($variant:ident => $($ty:ty),+ $(,)?) => {$(
        impl Leaf for $ty {
            const KIND: Kind = Kind::$variant;
            const TYPE_NAME: &'static str = stringify!($ty);

            fn from_value(value: Value) -> Result<Self, CoerceError> {
                match value {
                    Value::$variant(v) => Self::try_from(v).map_err(|_| CoerceError::OutOfRange {
                        type_name: Self::TYPE_NAME,
                    }),
                    other => Err(mismatch(Self::KIND, &other)),
                }
            }
        }
    )+};
}

integer_leaf!(Int => i8, i16, i32, i64, isize);
integer_leaf!(UInt => u8, u16, u32, u64, usize);

impl Leaf for String {
    const KIND: Kind = Kind::Text;
    const TYPE_NAME: &'static str = "String";

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Text(text) => Ok(text),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl Leaf for bool {
    const KIND: Kind = Kind::Bool;
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl Leaf for f32 {
    const KIND: Kind = Kind::Float32;
    const TYPE_NAME: &'static str = "f32";

    #[expect(
        clippy::cast_possible_truncation,
        reason = "single-precision kinds are parsed as f32 before widening"
    )]
    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Float(v) => Ok(v as Self),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl Leaf for f64 {
    const KIND: Kind = Kind::Float64;
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl Leaf for Duration {
    const KIND: Kind = Kind::Duration;
    const TYPE_NAME: &'static str = "Duration";

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::Duration(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl Leaf for Vec<String> {
    const KIND: Kind = Kind::TextList;
    const TYPE_NAME: &'static str = "Vec<String>";

    fn from_value(value: Value) -> Result<Self, CoerceError> {
        match value {
            Value::TextList(items) => Ok(items),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}
