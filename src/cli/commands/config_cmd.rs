//! config command - Show the resolved configuration.

use std::path::Path;

use anyhow::Result;

use crate::core::config::Config;
use crate::engine::Context;

/// Print the resolved configuration with defaults applied.
pub fn config(ctx: &Context, json: bool, config_path: Option<&Path>) -> Result<()> {
    let workspace = ctx.workspace()?;
    let config = Config::load(&workspace, config_path)?;

    if let Some(path) = &config.path {
        eprintln!("# loaded from {}", path.display());
    } else {
        eprintln!("# built-in defaults (no {} found)", crate::core::config::CONFIG_FILE);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&config.pipeline)?);
    } else {
        println!("{}", toml::to_string_pretty(&config.pipeline)?);
    }
    Ok(())
}
