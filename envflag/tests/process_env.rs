//! Loading against the real process environment.

use anyhow::{Result, anyhow, ensure};
use envflag::{EnvFlag, Options, Schema, load};

#[derive(Debug, Default, EnvFlag)]
struct System {
    pub path: String,
}

#[test]
fn reads_the_process_environment_by_default() -> Result<()> {
    let expected = std::env::var("PATH").unwrap_or_default();
    let system = System::load_with(Options::default().with_args(Vec::<String>::new()))
        .map_err(|err| anyhow!(err))?;
    ensure!(system.path == expected, "expected {expected:?}, got {:?}", system.path);
    Ok(())
}

#[test]
fn free_function_loads_into_an_existing_value() -> Result<()> {
    let mut system = System {
        path: String::from("unchanged"),
    };
    load(
        &mut system,
        Options::default()
            .with_env(Vec::<String>::new())
            .with_args(Vec::<String>::new()),
    )
    .map_err(|err| anyhow!(err))?;
    ensure!(system.path.is_empty(), "absent values reset to the zero value");
    Ok(())
}
