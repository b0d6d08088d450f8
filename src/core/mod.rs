//! core
//!
//! Core domain types and state for Gantry.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RunId, UtcTimestamp
//! - [`flags`] - Environment flag map that selects the pipeline branch
//! - [`config`] - Configuration schema and loading
//! - [`report`] - Per-step run report written after execution
//!
//! # Design Principles
//!
//! - Flag truthiness is defined in exactly one place
//! - Schemas are strict: unknown configuration keys are rejected
//! - Reports are plain serializable data

pub mod config;
pub mod flags;
pub mod report;
pub mod types;
