//! ui
//!
//! Output utilities.
//!
//! # Design
//!
//! All user-facing output goes through this module so that the `--quiet`
//! and `--debug` flags are honored consistently across commands.

pub mod output;
