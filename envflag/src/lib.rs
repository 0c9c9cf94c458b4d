//! Bind a nested configuration struct to environment variables and
//! command-line flags.
//!
//! Derive [`EnvFlag`] on a struct with named fields and call [`load`] (or
//! [`Schema::load`]). Every leaf field gets a canonical name built from the
//! path of field identifiers leading to it, an `UPPER_SNAKE_CASE`
//! environment key and a `kebab-case` flag. Values resolve in this order:
//!
//! 1. the command-line flag,
//! 2. the environment variable,
//! 3. the field's declared default,
//! 4. the zero value of the field's type.
//!
//! ```rust
//! use std::time::Duration;
//! use envflag::{EnvFlag, Options, Schema};
//!
//! #[derive(Debug, Default, EnvFlag)]
//! struct Settings {
//!     pub host: String,
//!     #[envflag(name = "PG")]
//!     pub database: Database,
//! }
//!
//! #[derive(Debug, Default, EnvFlag)]
//! struct Database {
//!     #[envflag(default = "5432")]
//!     pub port: u16,
//!     /// Give up connecting after this long.
//!     #[envflag(name = "connection-timeout")]
//!     pub timeout: Duration,
//! }
//!
//! # fn main() -> Result<(), envflag::EnvFlagError> {
//! let settings = Settings::load_with(
//!     Options::default()
//!         .with_env(["HOST=db.internal", "CONNECTION_TIMEOUT=5s"])
//!         .with_args(["--pg-port", "6432"]),
//! )?;
//! assert_eq!(settings.host, "db.internal");
//! assert_eq!(settings.database.port, 6432);
//! assert_eq!(settings.database.timeout, Duration::from_secs(5));
//! # Ok(())
//! # }
//! ```

pub use envflag_macros::EnvFlag;

pub mod duration;
mod env;
mod error;
mod flags;
pub mod name;
pub mod value;
mod walk;

pub use env::{EnvTable, normalize_prefix};
pub use error::{CoerceError, EnvFlagError};
pub use flags::FlagSet;
pub use value::{Kind, Leaf, Value};
pub use walk::{Field, Options, Schema, Walker, load, load_default};
