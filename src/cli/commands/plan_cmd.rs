//! plan command - Preview the derived plan.

use std::path::Path;

use anyhow::Result;

use crate::engine::Context;

/// Print the plan the current flags and configuration would produce.
///
/// The preview is rendered from the same plan `run` would execute, so it
/// is exact, including the branch selection and step order.
pub fn plan(ctx: &Context, json: bool, config_path: Option<&Path>) -> Result<()> {
    let (_, _, _, plan) = super::resolve(ctx, config_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", plan.preview());
    }
    Ok(())
}
