//! Literal parsing helpers for derive attributes.

use syn::{Expr, ExprLit, ExprUnary, Lit, LitStr, UnOp};

/// Parses a string literal from a `key = "..."` attribute entry.
pub(crate) fn lit_str(meta: &syn::meta::ParseNestedMeta, key: &str) -> Result<LitStr, syn::Error> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(
            other.span(),
            format!("{key} must be a string"),
        )),
    }
}

/// Parses a default value written as a string, number or boolean literal and
/// returns its textual form.
///
/// Numbers may carry a leading minus sign; type suffixes are dropped, so
/// `default = 5u16` yields `"5"`.
///
/// ```rust,ignore
/// // `#[envflag(default = -1.5)]`
/// assert_eq!(lit_default(meta, "default")?, "-1.5");
/// ```
pub(crate) fn lit_default(meta: &syn::meta::ParseNestedMeta, key: &str) -> Result<String, syn::Error> {
    let expr = meta.value()?.parse::<Expr>()?;
    default_text(&expr).ok_or_else(|| {
        syn::Error::new_spanned(
            &expr,
            format!("{key} must be a string, number or boolean literal"),
        )
    })
}

fn default_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(s) => Some(s.value()),
            Lit::Bool(b) => Some(b.value.to_string()),
            Lit::Int(_) | Lit::Float(_) => number_text(lit),
            _ => None,
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: operand,
            ..
        }) => match operand.as_ref() {
            Expr::Lit(ExprLit { lit, .. }) => number_text(lit).map(|digits| format!("-{digits}")),
            _ => None,
        },
        _ => None,
    }
}

fn number_text(lit: &Lit) -> Option<String> {
    match lit {
        Lit::Int(i) => Some(i.base10_digits().to_owned()),
        Lit::Float(f) => Some(f.base10_digits().to_owned()),
        _ => None,
    }
}
