//! Type introspection helpers.
//!
//! Field types are classified by inspecting the last segment of their path,
//! so `Duration` and `std::time::Duration` are treated alike. The check is
//! shallow: only `Vec<T>` and `Option<T>` look at their argument.

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

/// Types with a string conversion in `envflag::Leaf`.
const LEAF_TYPES: &[&str] = &[
    "String", "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    "f32", "f64", "Duration",
];

/// Path types that can be neither converted nor walked.
const UNSUPPORTED_TYPES: &[&str] = &[
    "char",
    "i128",
    "u128",
    "str",
    "HashMap",
    "BTreeMap",
    "HashSet",
    "BTreeSet",
    "VecDeque",
    "LinkedList",
    "BinaryHeap",
    "Box",
    "Rc",
    "Arc",
    "Cell",
    "RefCell",
    "PathBuf",
    "OsString",
];

/// How the derive binds a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Converted from text and bound to a flag.
    Leaf,
    /// A record walked in place.
    Nested,
    /// `Option<Record>`, allocated before walking.
    Optional,
    /// Reported at load time; carries the type as written.
    Unsupported(String),
}

/// Extract the first type argument from a `PathArguments` container.
fn extract_first_type_argument(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    let first = angle_args.args.first()?;
    let GenericArgument::Type(inner) = first else {
        return None;
    };
    Some(inner)
}

/// Strips invisible groups and parentheses produced by macro expansion.
fn peel(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => peel(&group.elem),
        Type::Paren(paren) => peel(&paren.elem),
        other => other,
    }
}

/// Returns the generic parameter if `ty` is the provided wrapper.
fn type_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(p) = peel(ty) else {
        return None;
    };
    let last = p.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    extract_first_type_argument(&last.arguments)
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Option")
}

/// Extracts the element type `T` if `ty` is `Vec<T>`.
pub(crate) fn vec_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Vec")
}

/// Last path segment of `ty` when it has no generic arguments.
fn bare_name(ty: &Type) -> Option<String> {
    let Type::Path(p) = peel(ty) else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let last = p.path.segments.last()?;
    last.arguments
        .is_none()
        .then(|| last.ident.to_string())
}

fn is_string(ty: &Type) -> bool {
    bare_name(ty).as_deref() == Some("String")
}

/// Classifies a field type.
pub(crate) fn classify(ty: &Type) -> FieldKind {
    if let Some(element) = vec_inner(ty) {
        return if is_string(element) {
            FieldKind::Leaf
        } else {
            FieldKind::Unsupported(type_label(ty))
        };
    }
    if let Some(inner) = option_inner(ty) {
        return match classify(inner) {
            FieldKind::Nested => FieldKind::Optional,
            FieldKind::Leaf | FieldKind::Optional | FieldKind::Unsupported(_) => {
                FieldKind::Unsupported(type_label(ty))
            }
        };
    }
    let Type::Path(p) = peel(ty) else {
        return FieldKind::Unsupported(type_label(ty));
    };
    let Some(last) = p.path.segments.last() else {
        return FieldKind::Unsupported(type_label(ty));
    };
    let name = last.ident.to_string();
    if UNSUPPORTED_TYPES.contains(&name.as_str()) {
        return FieldKind::Unsupported(type_label(ty));
    }
    if LEAF_TYPES.contains(&name.as_str()) && last.arguments.is_none() {
        return FieldKind::Leaf;
    }
    FieldKind::Nested
}

/// Renders `ty` the way it is usually written, for diagnostics.
///
/// Token spacing is removed except between two word characters, so
/// `Vec < u32 >` becomes `Vec<u32>` while `& 'static str` becomes
/// `&'static str`.
pub(crate) fn type_label(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut previous: Option<char> = None;
    while let Some(c) = chars.next() {
        if c == ' ' {
            let next = chars.peek().copied();
            if previous.is_some_and(is_word_char) && next.is_some_and(is_word_char) {
                out.push(' ');
            }
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
