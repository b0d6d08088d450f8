//! vcs
//!
//! Revision lookup for the workspace.
//!
//! The first pipeline step prints the revision being built so the CI log
//! is attributable to a commit. This module is the only place that touches
//! git2; everything else treats the revision as an opaque string.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from revision lookup.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The workspace is not inside a git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// The repository has no resolvable HEAD (e.g. no commits yet).
    #[error("failed to resolve HEAD: {0}")]
    Lookup(#[from] git2::Error),
}

/// Resolve the commit id of HEAD for the repository containing `workspace`.
pub fn head_revision(workspace: &Path) -> Result<String, VcsError> {
    let repo = git2::Repository::discover(workspace).map_err(|_| VcsError::NotARepo {
        path: workspace.to_path_buf(),
    })?;
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}
