//! Environment lookup table built once per load.

use std::collections::HashMap;

/// Normalizes an environment prefix to the `PREFIX_` form stripped from keys.
///
/// A trailing underscore is optional on input. Empty prefixes (including a
/// lone `_`) mean "no prefix".
///
/// ```rust
/// use envflag::normalize_prefix;
///
/// assert_eq!(normalize_prefix("APP").as_deref(), Some("APP_"));
/// assert_eq!(normalize_prefix("APP_").as_deref(), Some("APP_"));
/// assert_eq!(normalize_prefix(""), None);
/// ```
#[must_use]
pub fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_end_matches('_');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{trimmed}_"))
}

/// Mapping from environment key to raw value.
///
/// Keys carrying the load prefix are stored with the prefix removed; keys
/// without it are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvTable {
    entries: HashMap<String, String>,
}

impl EnvTable {
    /// Builds a table from ordered `KEY=VALUE` entries.
    ///
    /// Only the first `=` separates key from value. Entries without `=` are
    /// ignored and later entries overwrite earlier ones with the same key.
    /// `prefix` should already be normalized with [`normalize_prefix`].
    ///
    /// ```rust
    /// use envflag::EnvTable;
    ///
    /// let table = EnvTable::from_entries(["APP_HOST=db", "PATH=/bin", "A=b=c"], Some("APP_"));
    /// assert_eq!(table.lookup("HOST"), "db");
    /// assert_eq!(table.lookup("PATH"), "/bin");
    /// assert_eq!(table.lookup("A"), "b=c");
    /// assert_eq!(table.lookup("MISSING"), "");
    /// ```
    #[must_use]
    pub fn from_entries<I, S>(entries: I, prefix: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = HashMap::new();
        for entry in entries {
            let Some((key, value)) = entry.as_ref().split_once('=') else {
                continue;
            };
            let stripped = prefix.and_then(|p| key.strip_prefix(p)).unwrap_or(key);
            table.insert(stripped.to_owned(), value.to_owned());
        }
        tracing::debug!(entries = table.len(), prefix = ?prefix, "built environment table");
        Self { entries: table }
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns `true` when the value was inserted.
    pub fn seed(&mut self, key: &str, value: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        true
    }

    /// Raw value for `key`, or the empty string when absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Raw value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of keys in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
