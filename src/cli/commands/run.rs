//! run command - Execute the pipeline.

use std::path::Path;

use anyhow::Result;

use crate::engine::exec::Executor;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};

/// Execute the pipeline for the current workspace.
///
/// With `dry_run`, the derived plan is printed and nothing executes.
pub fn run(ctx: &Context, dry_run: bool, config_path: Option<&Path>) -> Result<()> {
    let (workspace, config, flags, plan) = super::resolve(ctx, config_path)?;
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    output::debug(
        format!(
            "workspace {}, flags {:?}, config from {:?}",
            workspace.display(),
            flags,
            config.path
        ),
        verbosity,
    );

    if dry_run {
        output::print(plan.preview(), verbosity);
        return Ok(());
    }

    let executor = Executor::new(workspace, &config.pipeline, verbosity);
    let report = executor.execute(&plan)?;

    output::print(
        format!(
            "{} pipeline finished: {} steps",
            report.command,
            report.steps.len()
        ),
        verbosity,
    );
    Ok(())
}
