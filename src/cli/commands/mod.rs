//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves the workspace and loads the configuration
//! 2. Calls the engine for planning and (for `run`) execution
//! 3. Formats and displays output
//!
//! Handlers do NOT spawn pipeline processes directly.

mod completion;
mod config_cmd;
mod plan_cmd;
mod run;

pub use completion::completion;
pub use config_cmd::config;
pub use plan_cmd::plan;
pub use run::run;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::core::flags::EnvFlags;
use crate::engine::plan::Plan;
use crate::engine::{planner, Context};

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Run { dry_run, config } => run(ctx, dry_run, config.as_deref()),
        Command::Plan { json, config } => plan(ctx, json, config.as_deref()),
        Command::Config { json, config } => config_cmd::config(ctx, json, config.as_deref()),
        Command::Completion { shell } => completion(shell),
    }
}

/// Resolve workspace, configuration, environment flags, and plan.
///
/// Shared by `run` and `plan` so a preview always matches what would
/// execute.
pub(crate) fn resolve(
    ctx: &Context,
    config_path: Option<&Path>,
) -> Result<(PathBuf, Config, EnvFlags, Plan)> {
    let workspace = ctx.workspace()?;
    let config = Config::load(&workspace, config_path)?;
    let flags = EnvFlags::from_env();
    let plan = planner::build_plan(&flags, &config.pipeline)?;
    Ok((workspace, config, flags, plan))
}
