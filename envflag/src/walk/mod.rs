//! Schema traversal and value resolution.
//!
//! A [`Schema`] enumerates its fields by calling back into a [`Walker`]. The
//! walker resolves each field's canonical name, writes the environment (or
//! declared default) value into leaf fields, and records a flag bound to the
//! same storage. Once the walk completes the flags are parsed and any value
//! given on the command line overwrites what the environment provided.

use crate::env::EnvTable;
use crate::error::{CoerceError, EnvFlagError};
use crate::flags::{self, FlagSet};
use crate::name::{to_kebab_case, to_upper_snake_case};
use crate::value::{Kind, Leaf, Value, coerce, coerce_occurrences};

mod load;

pub use load::{Options, load, load_default};

/// A configuration record whose fields can be bound to the environment and
/// command line.
///
/// Implementations are generated by `#[derive(EnvFlag)]`; writing one by
/// hand means calling the matching [`Walker`] method once per field, in
/// declaration order.
pub trait Schema {
    /// Visits every field of `self`, prefixing canonical names with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFlagError::NotAStruct`] when the implementing type is not
    /// a struct with named fields, and propagates errors from the walker.
    fn walk<'a>(&'a mut self, walker: &mut Walker<'a>, prefix: &str) -> Result<(), EnvFlagError>;

    /// Builds a record from its [`Default`] value and loads it with `options`.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`load`].
    fn load_with(options: Options<'_>) -> Result<Self, EnvFlagError>
    where
        Self: Sized + Default,
    {
        let mut target = Self::default();
        load(&mut target, options)?;
        Ok(target)
    }

    /// Builds a record from the process environment and arguments.
    ///
    /// # Errors
    ///
    /// Returns any error produced by [`load`].
    fn load() -> Result<Self, EnvFlagError>
    where
        Self: Sized + Default,
    {
        Self::load_with(Options::default())
    }
}

/// Per-field metadata emitted by the derive macro.
///
/// ```rust
/// use envflag::Field;
///
/// let field = Field::new("Host").with_usage("database host");
/// assert_eq!(field.canonical_name("Pg").as_deref(), Some("PgHost"));
/// assert_eq!(Field::new("Pg").with_name("PG").canonical_name("Outer").as_deref(), Some("PG"));
/// assert_eq!(Field::new("Hidden").with_name("").canonical_name(""), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    ident: &'static str,
    name: Option<&'static str>,
    usage: Option<&'static str>,
    default: Option<&'static str>,
}

impl Field {
    /// Describes a field whose identifier, in `UpperCamelCase`, is `ident`.
    #[must_use]
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            name: None,
            usage: None,
            default: None,
        }
    }

    /// Replaces the accumulated canonical name with `name`. An empty name
    /// skips the field.
    #[must_use]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the help text shown for the field's flag.
    #[must_use]
    pub const fn with_usage(mut self, usage: &'static str) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Sets the value used when the environment has no entry for the field.
    #[must_use]
    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// The field's identifier segment.
    #[must_use]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    /// Help text, if any.
    #[must_use]
    pub const fn usage(&self) -> Option<&'static str> {
        self.usage
    }

    /// Declared default, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&'static str> {
        self.default
    }

    /// Canonical name of the field below `prefix`, or `None` when the field
    /// is skipped.
    #[must_use]
    pub fn canonical_name(&self, prefix: &str) -> Option<String> {
        match self.name {
            Some("") => None,
            Some(name) => Some(name.to_owned()),
            None => Some(format!("{prefix}{}", self.ident)),
        }
    }
}

/// Type-erased storage of a bound leaf field.
trait Slot {
    fn kind(&self) -> Kind;
    fn type_name(&self) -> &'static str;
    fn store(&mut self, value: Value) -> Result<(), CoerceError>;
}

impl<L: Leaf> Slot for L {
    fn kind(&self) -> Kind {
        L::KIND
    }

    fn type_name(&self) -> &'static str {
        L::TYPE_NAME
    }

    fn store(&mut self, value: Value) -> Result<(), CoerceError> {
        *self = L::from_value(value)?;
        Ok(())
    }
}

struct Binding<'a> {
    flag: String,
    slot: &'a mut dyn Slot,
}

/// Visitor handed to [`Schema::walk`].
///
/// Holds the environment table for the current load and the bindings from
/// flag names to leaf fields discovered so far.
pub struct Walker<'a> {
    env: EnvTable,
    pending: Vec<clap::Arg>,
    bindings: Vec<Binding<'a>>,
}

impl<'a> Walker<'a> {
    pub(crate) const fn new(env: EnvTable) -> Self {
        Self {
            env,
            pending: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Binds a leaf field.
    ///
    /// The environment value (or declared default) is written into `target`
    /// straight away and a flag named after the field is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFlagError::InvalidEnvValue`] when the environment text
    /// does not convert to `L`.
    pub fn leaf<L: Leaf + 'a>(
        &mut self,
        target: &'a mut L,
        field: &Field,
        prefix: &str,
    ) -> Result<(), EnvFlagError> {
        let Some(name) = self.begin(field, prefix) else {
            return Ok(());
        };
        let key = to_upper_snake_case(&name);
        let raw = self.env.lookup(&key);
        let invalid = |source| EnvFlagError::InvalidEnvValue {
            key: key.clone(),
            value: raw.to_owned(),
            type_name: L::TYPE_NAME,
            source,
        };
        let value = coerce(raw, L::KIND).map_err(invalid)?;
        *target = L::from_value(value.clone()).map_err(invalid)?;

        let flag = to_kebab_case(&name);
        tracing::trace!(flag = %flag, key = %key, "registering flag");
        self.pending
            .push(flags::leaf_arg(&flag, L::KIND, &value, field.usage()));
        self.bindings.push(Binding { flag, slot: target });
        Ok(())
    }

    /// Recurses into a nested record, using the field's canonical name as the
    /// prefix of its children.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested walk.
    pub fn nested<S: Schema>(
        &mut self,
        target: &'a mut S,
        field: &Field,
        prefix: &str,
    ) -> Result<(), EnvFlagError> {
        let Some(name) = self.begin(field, prefix) else {
            return Ok(());
        };
        target.walk(self, &name)
    }

    /// Recurses into an optional nested record, allocating its default value
    /// first when absent.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested walk.
    pub fn optional<S: Schema + Default>(
        &mut self,
        target: &'a mut Option<S>,
        field: &Field,
        prefix: &str,
    ) -> Result<(), EnvFlagError> {
        let Some(name) = self.begin(field, prefix) else {
            return Ok(());
        };
        target.get_or_insert_with(S::default).walk(self, &name)
    }

    /// Reports a field whose type has no string conversion.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFlagError::Unsupported`] unless the field is skipped by
    /// an empty name override.
    pub fn unsupported(
        &mut self,
        field: &Field,
        type_name: &'static str,
        prefix: &str,
    ) -> Result<(), EnvFlagError> {
        match self.begin(field, prefix) {
            Some(name) => Err(EnvFlagError::Unsupported { name, type_name }),
            None => Ok(()),
        }
    }

    /// Resolves the canonical name and seeds a declared default.
    fn begin(&mut self, field: &Field, prefix: &str) -> Option<String> {
        let Some(name) = field.canonical_name(prefix) else {
            tracing::debug!(field = field.ident(), "skipping field with empty name override");
            return None;
        };
        if let Some(default) = field.default_value() {
            let key = to_upper_snake_case(&name);
            if self.env.seed(&key, default) {
                tracing::debug!(key = %key, default, "seeded default value");
            }
        }
        Some(name)
    }

    /// Registers the recorded flags, parses `tokens` and applies every value
    /// given on the command line.
    pub(crate) fn finish(self, flag_set: &mut FlagSet, tokens: &[String]) -> Result<(), EnvFlagError> {
        for arg in self.pending {
            flag_set.arg(arg);
        }
        let matches = flag_set.parse_tokens(tokens)?;

        let mut overrides = 0_usize;
        let total = self.bindings.len();
        for Binding { flag, slot } in self.bindings {
            let Some(values) = flags::command_line_values(matches, &flag) else {
                continue;
            };
            let type_name = slot.type_name();
            coerce_occurrences(&values, slot.kind())
                .and_then(|value| slot.store(value))
                .map_err(|source| EnvFlagError::InvalidFlagValue {
                    flag: flag.clone(),
                    value: values.last().cloned().unwrap_or_default(),
                    type_name,
                    source,
                })?;
            tracing::trace!(flag = %flag, "applied command-line value");
            overrides = overrides.saturating_add(1);
        }
        tracing::debug!(flags = total, overrides, "configuration loaded");
        Ok(())
    }
}
