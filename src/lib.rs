//! Gantry - A fail-fast CI pipeline runner for Python packages
//!
//! Gantry is a single-binary tool that replaces the ad-hoc CI shell script
//! for a Python package: it builds a source distribution, installs it, and
//! then either builds the documentation or runs the test suite against the
//! installed copy, depending on environment flags.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Derives a plan from flags and config, then executes it
//! - [`core`] - Environment flags, configuration, run reports, domain types
//! - [`python`] - Single interface for all interpreter queries
//! - [`vcs`] - Revision lookup for the workspace
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! Gantry maintains the following invariants:
//!
//! 1. Exactly one of the two pipeline branches (docs or tests) is planned
//! 2. Plans are pure data; only the executor spawns processes
//! 3. Execution is strictly sequential and aborts on the first failing step
//! 4. The process exit code equals the first failing command's exit code

pub mod cli;
pub mod core;
pub mod engine;
pub mod python;
pub mod ui;
pub mod vcs;
