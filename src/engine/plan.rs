//! engine::plan
//!
//! Deterministic pipeline plans.
//!
//! # Design
//!
//! Plans are the sole intermediate representation between flag resolution
//! and process execution.
//!
//! Plans are:
//! - **Deterministic**: Same flags and config always produce the same plan
//! - **Previewable**: Can be shown to the user before (or instead of) execution
//! - **Serializable**: `plan --json` emits them for other tooling
//! - **Typed**: Steps that need execution-time resolution carry their inputs
//!
//! # Invariants
//!
//! - The planner does not perform I/O
//! - Plans are pure data structures
//! - Steps execute strictly in order; there is no reordering or retry
//!
//! # Example
//!
//! ```
//! use gantry::engine::plan::{Plan, PlanStep};
//!
//! let plan = Plan::new("docs").with_step(PlanStep::PrintRevision);
//! assert!(!plan.is_empty());
//! assert!(plan.digest().starts_with("sha256:"));
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A typed plan step.
///
/// Most steps are plain external invocations ([`PlanStep::Exec`]). The
/// remaining variants need information that only exists at execution time:
/// the freshly built archive, the location of the installed package, or the
/// interpreter's version string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanStep {
    /// Print the revision identifier of the workspace.
    PrintRevision,

    /// Print the interpreter version string and pointer width.
    PrintInterpreterInfo,

    /// Run an external command from the workspace root.
    Exec {
        /// Executable name or path.
        program: String,
        /// Arguments, excluding the program itself.
        args: Vec<String>,
        /// Human-readable description of what the command does.
        description: String,
    },

    /// Install the package from the newest archive in the dist directory.
    ///
    /// Installing from the archive rather than the working tree is the
    /// point of the build step: it exercises the packaging manifests.
    InstallSdist {
        /// Directory the sdist build wrote into, relative to the workspace.
        dist_dir: PathBuf,
    },

    /// Locate the installed copy of the package by importing it from a
    /// scratch directory.
    LocateInstallDir {
        /// Import name of the package.
        package: String,
    },

    /// Run the test suite from a scratch directory against the installed
    /// copy, with warnings promoted to errors and coverage measured.
    RunTests {
        /// JUnit XML report path, relative to the workspace.
        junit_path: PathBuf,
        /// Coverage configuration file, relative to the workspace.
        coverage_config: PathBuf,
        /// Fault-handler timeout in seconds.
        faulthandler_timeout: u32,
        /// Opt in to slow tests.
        run_slow: bool,
        /// Extra pytest arguments.
        extra_args: Vec<String>,
    },

    /// Upload coverage results, unless the interpreter version string is on
    /// the exclusion list (known-broken builds), in which case the step is
    /// skipped and the pipeline continues.
    UploadCoverage {
        /// Full uploader argv.
        command: Vec<String>,
        /// Version strings for which the upload is skipped.
        skip_versions: Vec<String>,
    },
}

impl PlanStep {
    /// Get a human-readable description of this step.
    pub fn description(&self) -> String {
        match self {
            PlanStep::PrintRevision => "print workspace revision".to_string(),
            PlanStep::PrintInterpreterInfo => {
                "print interpreter version and pointer width".to_string()
            }
            PlanStep::Exec { description, .. } => description.clone(),
            PlanStep::InstallSdist { .. } => {
                "install package from source distribution".to_string()
            }
            PlanStep::LocateInstallDir { package } => {
                format!("locate installed copy of '{}'", package)
            }
            PlanStep::RunTests { .. } => "run test suite against installed copy".to_string(),
            PlanStep::UploadCoverage { .. } => "upload coverage report".to_string(),
        }
    }
}

/// A complete pipeline plan.
///
/// Contains everything the executor needs. Plans are immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Which branch this plan implements ("docs" or "tests").
    pub command: String,
    /// Ordered steps to execute.
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Create a new empty plan.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            steps: vec![],
        }
    }

    /// Add a step to the plan (builder pattern).
    pub fn with_step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Add multiple steps.
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = PlanStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Compute a digest of the plan for the run report.
    ///
    /// The digest is a SHA-256 hash of the canonical JSON serialization,
    /// so a report can be matched to the exact plan that produced it.
    pub fn digest(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }

    /// Generate a numbered preview string.
    pub fn preview(&self) -> String {
        if self.is_empty() {
            return format!("{}: no steps", self.command);
        }

        let mut lines = vec![format!("{}:", self.command)];
        for (i, step) in self.steps.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, step.description()));
        }
        lines.join("\n")
    }
}

/// Errors from plan generation.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A required configuration value is missing.
    #[error("missing required configuration: {0}")]
    MissingConfig(String),
}
