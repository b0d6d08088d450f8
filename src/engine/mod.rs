//! engine
//!
//! Plan derivation and execution.
//!
//! # Lifecycle
//!
//! Every run follows the same lifecycle:
//!
//! 1. **Plan** - [`planner::build_plan`] derives a [`plan::Plan`] from the
//!    environment flags and the workspace configuration. Planning is pure:
//!    no I/O, no process spawning.
//! 2. **Execute** - [`exec::Executor`] runs the plan's steps strictly in
//!    order, echoing each command and aborting on the first failure. The
//!    executor is the only component that spawns processes.
//!
//! The split keeps the branch-selection logic testable without an
//! interpreter installed, and makes `plan`/`--dry-run` previews exact: the
//! preview is rendered from the same data the executor consumes.

pub mod exec;
pub mod lock;
pub mod plan;
pub mod planner;

use std::path::PathBuf;

/// Execution context derived from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Run as if started in this directory.
    pub cwd: Option<PathBuf>,
    /// Minimal output.
    pub quiet: bool,
    /// Verbose diagnostics.
    pub debug: bool,
}

impl Context {
    /// Resolve the workspace root for this invocation.
    pub fn workspace(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir(),
        }
    }
}
