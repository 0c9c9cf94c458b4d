//! Loads a service configuration with a nested Postgres section.
//!
//! Try it with:
//!
//! ```sh
//! PG_HOST=db.internal cargo run -p envflag --example postgres -- --pg-port 6543 --verbose
//! cargo run -p envflag --example postgres -- --help
//! ```

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction};
use clap::error::ErrorKind;
use envflag::{EnvFlag, FlagSet, Options, Schema};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, EnvFlag)]
struct PgConfig {
    #[envflag(default = "localhost")]
    pub host: String,
    #[envflag(default = 5432)]
    pub port: u16,
    /// Postgres username.
    pub username: String,
    pub password: String,
    #[envflag(name = "connection-timeout", default = "10s")]
    pub timeout: Duration,
}

#[derive(Debug, Default, EnvFlag)]
struct Settings {
    /// Address the service listens on.
    pub host: String,
    pub port: u16,
    #[envflag(name = "PG")]
    pub pg_config: PgConfig,
}

fn verbose_flags() -> FlagSet {
    let mut flags = FlagSet::new("postgres");
    flags.arg(
        Arg::new("verbose")
            .long("verbose")
            .help("Print the loaded settings")
            .action(ArgAction::SetTrue),
    );
    flags
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut flags = verbose_flags();
    let mut stdout = io::stdout().lock();
    let settings = match Settings::load_with(Options::default().with_flag_set(&mut flags)) {
        Ok(settings) => settings,
        Err(err) if err.cli_kind() == Some(ErrorKind::DisplayHelp) => {
            writeln!(stdout, "{}", flags.render_help()).context("write help")?;
            return Ok(());
        }
        Err(err) => return Err(err).context("load settings"),
    };

    let verbose = flags.matches().is_some_and(|m| m.get_flag("verbose"));
    if verbose {
        writeln!(stdout, "{settings:#?}").context("write settings")?;
    } else {
        writeln!(
            stdout,
            "connecting to {}:{} as {:?}",
            settings.pg_config.host, settings.pg_config.port, settings.pg_config.username
        )
        .context("write summary")?;
    }
    Ok(())
}
