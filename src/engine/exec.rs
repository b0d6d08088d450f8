//! engine::exec
//!
//! The single sequential executor.
//!
//! # Executor Contract
//!
//! The executor MUST:
//! 1. Acquire the workspace lock before running any step
//! 2. Run steps strictly in plan order, one at a time
//! 3. Echo every external command before spawning it
//! 4. Stop at the first failing step and surface its exit code
//! 5. Write the run report whether the run succeeded or failed
//!
//! # Invariants
//!
//! - Only the executor spawns pipeline processes
//! - No retries, no recovery, no partial-success semantics
//! - A skipped step (coverage upload on an excluded interpreter build) is
//!   not a failure
//!
//! # Example
//!
//! ```ignore
//! use gantry::engine::exec::Executor;
//!
//! let executor = Executor::new(workspace, &config, verbosity);
//! let report = executor.execute(&plan)?;
//! println!("{} steps ran", report.steps.len());
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use thiserror::Error;

use crate::core::config::schema::PipelineConfig;
use crate::core::report::{RunReport, StepOutcome, StepRecord};
use crate::python::{Python, PythonError};
use crate::ui::output::{self, Verbosity};
use crate::vcs::{self, VcsError};

use super::lock::{LockError, RunLock};
use super::plan::{Plan, PlanStep};

/// Name of the scratch directory tests run from.
///
/// Running pytest from here (instead of the workspace root) keeps the
/// source tree off `sys.path`, so the suite exercises the installed copy.
const SCRATCH_DIR: &str = "empty";

/// Errors from execution.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Failed to acquire the workspace lock.
    #[error("failed to acquire lock: {0}")]
    Lock(#[from] LockError),

    /// A pipeline step exited non-zero.
    #[error("step failed: {description} (exit {code})")]
    StepFailed {
        /// Description of the failing step
        description: String,
        /// The child's exit code
        code: i32,
    },

    /// An external command could not be spawned at all.
    #[error("failed to launch '{program}': {source}")]
    SpawnFailed {
        /// The executable that failed to start
        program: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The sdist build produced no archive to install.
    #[error("no source distribution found in {dist_dir}")]
    SdistMissing {
        /// The directory that was searched
        dist_dir: PathBuf,
    },

    /// Revision lookup failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Interpreter query failed.
    #[error(transparent)]
    Python(#[from] PythonError),

    /// The plan was not executable as ordered.
    #[error("internal error: {0}")]
    Internal(String),

    /// Filesystem error while preparing or reporting a run.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecuteError {
    /// Exit code the overall process should terminate with.
    ///
    /// A failing step propagates the child's exit code; every other error
    /// maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecuteError::StepFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Result of one step, before fail-fast policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepStatus {
    outcome: StepOutcome,
    exit_code: Option<i32>,
}

impl StepStatus {
    fn succeeded() -> Self {
        Self {
            outcome: StepOutcome::Succeeded,
            exit_code: Some(0),
        }
    }

    fn failed(code: i32) -> Self {
        Self {
            outcome: StepOutcome::Failed,
            exit_code: Some(code),
        }
    }

    fn skipped() -> Self {
        Self {
            outcome: StepOutcome::Skipped,
            exit_code: None,
        }
    }
}

/// The sequential pipeline executor.
pub struct Executor<'a> {
    workspace: PathBuf,
    config: &'a PipelineConfig,
    python: Python,
    verbosity: Verbosity,
}

impl<'a> Executor<'a> {
    /// Create an executor for a workspace.
    pub fn new(workspace: PathBuf, config: &'a PipelineConfig, verbosity: Verbosity) -> Self {
        let python = Python::new(config.python.clone());
        Self {
            workspace,
            config,
            python,
            verbosity,
        }
    }

    /// Execute a plan to completion or first failure.
    ///
    /// The run report is written to the configured report path in both
    /// cases. On failure the report ends at the failing step.
    pub fn execute(&self, plan: &Plan) -> Result<RunReport, ExecuteError> {
        let _lock = RunLock::acquire(&self.workspace)?;

        let mut report = RunReport::new(plan.command.clone(), plan.digest());
        let mut install_dir: Option<PathBuf> = None;

        output::debug(
            format!("run {} ({} steps)", report.run_id, plan.step_count()),
            self.verbosity,
        );

        for step in &plan.steps {
            let started = Instant::now();
            let result = self.run_step(step, &mut install_dir);
            let duration_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(status) => {
                    report.record(StepRecord {
                        description: step.description(),
                        outcome: status.outcome,
                        exit_code: status.exit_code,
                        duration_ms,
                    });
                    if status.outcome == StepOutcome::Failed {
                        // Best effort: the step failure must not be masked by
                        // a report write error, or the wrong exit code leaks
                        let _ = self.try_finish_report(&mut report, false);
                        return Err(ExecuteError::StepFailed {
                            description: step.description(),
                            code: status.exit_code.unwrap_or(1),
                        });
                    }
                }
                Err(err) => {
                    report.record(StepRecord {
                        description: step.description(),
                        outcome: StepOutcome::Failed,
                        exit_code: None,
                        duration_ms,
                    });
                    // Best effort: the original error is what matters
                    let _ = self.try_finish_report(&mut report, false);
                    return Err(err);
                }
            }
        }

        self.try_finish_report(&mut report, true)?;
        Ok(report)
    }

    fn try_finish_report(&self, report: &mut RunReport, success: bool) -> std::io::Result<()> {
        report.finish(success);
        let path = self.workspace.join(&self.config.report_path);
        report.write(&path)?;
        output::debug(format!("report written to {}", path.display()), self.verbosity);
        Ok(())
    }

    /// Run one step.
    fn run_step(
        &self,
        step: &PlanStep,
        install_dir: &mut Option<PathBuf>,
    ) -> Result<StepStatus, ExecuteError> {
        match step {
            PlanStep::PrintRevision => {
                let revision = vcs::head_revision(&self.workspace)?;
                output::print(revision, self.verbosity);
                Ok(StepStatus::succeeded())
            }

            PlanStep::PrintInterpreterInfo => {
                let info = self.python.interpreter_info(&self.workspace)?;
                output::print(&info.version, self.verbosity);
                output::print(
                    format!("pointer width: {} bits", info.pointer_width),
                    self.verbosity,
                );
                Ok(StepStatus::succeeded())
            }

            PlanStep::Exec { program, args, .. } => {
                self.run_command(program, args, &self.workspace)
            }

            PlanStep::InstallSdist { dist_dir } => {
                let archive = self.newest_archive(&self.workspace.join(dist_dir))?;
                let args = vec![
                    "-m".to_string(),
                    "pip".to_string(),
                    "install".to_string(),
                    archive.to_string_lossy().into_owned(),
                ];
                self.run_command(self.python.exe(), &args, &self.workspace)
            }

            PlanStep::LocateInstallDir { package } => {
                let scratch = self.scratch_dir()?;
                let dir = self.python.module_dir(package, &scratch)?;
                output::print(
                    format!("installed package at {}", dir.display()),
                    self.verbosity,
                );
                *install_dir = Some(dir);
                Ok(StepStatus::succeeded())
            }

            PlanStep::RunTests {
                junit_path,
                coverage_config,
                faulthandler_timeout,
                run_slow,
                extra_args,
            } => {
                let installed = install_dir.clone().ok_or_else(|| {
                    ExecuteError::Internal(
                        "test step planned before the installed copy was located".to_string(),
                    )
                })?;
                let scratch = self.scratch_dir()?;

                let mut args = vec![
                    "-m".to_string(),
                    "pytest".to_string(),
                    "-W".to_string(),
                    "error".to_string(),
                    "-ra".to_string(),
                    format!("--junitxml={}", self.workspace.join(junit_path).display()),
                    format!("--cov={}", installed.display()),
                    format!(
                        "--cov-config={}",
                        self.workspace.join(coverage_config).display()
                    ),
                    format!("--faulthandler-timeout={}", faulthandler_timeout),
                ];
                if *run_slow {
                    args.push("--run-slow".to_string());
                }
                args.extend(extra_args.iter().cloned());
                args.push(installed.to_string_lossy().into_owned());

                self.run_command(self.python.exe(), &args, &scratch)
            }

            PlanStep::UploadCoverage {
                command,
                skip_versions,
            } => {
                let version = self.python.version_string(&self.workspace)?;
                if skip_versions.contains(&version) {
                    output::print(
                        format!("skipping coverage upload on interpreter '{}'", version),
                        self.verbosity,
                    );
                    return Ok(StepStatus::skipped());
                }
                // The suite ran from the scratch directory, so that is where
                // the coverage data file was written; the uploader must run
                // next to it.
                let scratch = self.scratch_dir()?;
                self.run_command(&command[0], &command[1..], &scratch)
            }
        }
    }

    /// Spawn an external command with the `+ ...` echo, inheriting stdio.
    fn run_command(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<StepStatus, ExecuteError> {
        output::trace(format_command(program, args), self.verbosity);

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|source| ExecuteError::SpawnFailed {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(StepStatus::succeeded())
        } else {
            // Terminated by signal leaves no code; report it as 1
            Ok(StepStatus::failed(status.code().unwrap_or(1)))
        }
    }

    /// Create (if needed) and return the scratch directory.
    fn scratch_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.workspace.join(SCRATCH_DIR);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Newest regular file in the dist directory.
    fn newest_archive(&self, dist_dir: &Path) -> Result<PathBuf, ExecuteError> {
        let missing = || ExecuteError::SdistMissing {
            dist_dir: dist_dir.to_path_buf(),
        };

        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        let entries = std::fs::read_dir(dist_dir).map_err(|_| missing())?;
        for entry in entries {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let modified = meta.modified()?;
            let better = match &newest {
                Some((best, _)) => modified > *best,
                None => true,
            };
            if better {
                newest = Some((modified, entry.path()));
            }
        }

        newest.map(|(_, path)| path).ok_or_else(missing)
    }
}

/// Render a command line the way a shell trace would.
///
/// Arguments containing whitespace are single-quoted so the echoed line is
/// unambiguous.
pub fn format_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![quote(program)];
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        format!("'{}'", arg)
    } else {
        arg.to_string()
    }
}
