//! python::interface
//!
//! Python interpreter queries via `-c` one-liners.
//!
//! This module provides the **single doorway** to interpreter
//! introspection. All queries run the configured executable with a small
//! `-c` program and capture stdout; errors are normalized into typed
//! failure categories.
//!
//! # Working directory
//!
//! Callers choose the working directory per query. This matters for
//! [`Python::module_dir`]: importing the package from the workspace root
//! would resolve to the source tree, not the installed copy, so that query
//! must run from a scratch directory outside the source tree.
//!
//! # Example
//!
//! ```ignore
//! use gantry::python::Python;
//! use std::path::Path;
//!
//! let python = Python::new("python");
//! let info = python.interpreter_info(Path::new("."))?;
//! println!("{} ({}-bit)", info.version, info.pointer_width);
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// `-c` program printing the interpreter version string on one line.
const VERSION_PROBE: &str = r"import sys; print(sys.version.replace('\n', ' '))";

/// `-c` program printing the pointer width in bits.
const POINTER_WIDTH_PROBE: &str = "import struct; print(struct.calcsize('P') * 8)";

/// Errors from interpreter queries.
#[derive(Debug, Error)]
pub enum PythonError {
    /// The interpreter executable could not be spawned.
    #[error("failed to launch '{program}': {source}")]
    LaunchFailed {
        /// The executable that failed to start
        program: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The interpreter ran but the query exited non-zero.
    #[error("interpreter query for {what} failed (exit {code}): {stderr}")]
    QueryFailed {
        /// What was being queried
        what: String,
        /// Exit code of the query
        code: i32,
        /// Captured stderr
        stderr: String,
    },

    /// The query succeeded but printed something unusable.
    #[error("unexpected interpreter output for {what}: {output:?}")]
    InvalidOutput {
        /// What was being queried
        what: String,
        /// The offending output
        output: String,
    },
}

/// Version string and pointer width of the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterInfo {
    /// Full `sys.version`, flattened to one line.
    pub version: String,
    /// Pointer width in bits (32 or 64).
    pub pointer_width: u32,
}

/// Handle to a Python interpreter executable.
#[derive(Debug, Clone)]
pub struct Python {
    exe: String,
}

impl Python {
    /// Create a handle for the given executable (name or path).
    pub fn new(exe: impl Into<String>) -> Self {
        Self { exe: exe.into() }
    }

    /// The configured executable.
    pub fn exe(&self) -> &str {
        &self.exe
    }

    /// Full version string of the interpreter, one line.
    pub fn version_string(&self, cwd: &Path) -> Result<String, PythonError> {
        self.query("version", VERSION_PROBE, cwd)
    }

    /// Pointer width of the interpreter in bits.
    pub fn pointer_width(&self, cwd: &Path) -> Result<u32, PythonError> {
        let output = self.query("pointer width", POINTER_WIDTH_PROBE, cwd)?;
        output
            .parse()
            .map_err(|_| PythonError::InvalidOutput {
                what: "pointer width".to_string(),
                output,
            })
    }

    /// Version string and pointer width together.
    pub fn interpreter_info(&self, cwd: &Path) -> Result<InterpreterInfo, PythonError> {
        Ok(InterpreterInfo {
            version: self.version_string(cwd)?,
            pointer_width: self.pointer_width(cwd)?,
        })
    }

    /// Directory of the installed copy of `package`.
    ///
    /// `cwd` must be outside the source tree, otherwise the import resolves
    /// to the working copy instead of the installed package.
    pub fn module_dir(&self, package: &str, cwd: &Path) -> Result<PathBuf, PythonError> {
        let probe = format!(
            "import os, {pkg}; print(os.path.dirname({pkg}.__file__))",
            pkg = package
        );
        let output = self.query("installed package directory", &probe, cwd)?;
        if output.is_empty() {
            return Err(PythonError::InvalidOutput {
                what: "installed package directory".to_string(),
                output,
            });
        }
        Ok(PathBuf::from(output))
    }

    /// Run a `-c` program and capture trimmed stdout.
    fn query(&self, what: &str, program: &str, cwd: &Path) -> Result<String, PythonError> {
        let output = Command::new(&self.exe)
            .arg("-c")
            .arg(program)
            .current_dir(cwd)
            .output()
            .map_err(|source| PythonError::LaunchFailed {
                program: self.exe.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PythonError::QueryFailed {
                what: what.to_string(),
                code: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Write a stub interpreter script that answers the probes.
    fn stub_python(dir: &Path, body: &str) -> String {
        let path = dir.join("python");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn version_and_pointer_width_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_python(
            dir.path(),
            r#"case "$2" in
  *sys.version*) echo "3.6.1 (stub build)" ;;
  *calcsize*) echo 64 ;;
  *) exit 2 ;;
esac"#,
        );

        let python = Python::new(exe);
        let info = python.interpreter_info(dir.path()).unwrap();
        assert_eq!(info.version, "3.6.1 (stub build)");
        assert_eq!(info.pointer_width, 64);
    }

    #[test]
    fn non_numeric_pointer_width_is_invalid_output() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_python(dir.path(), "echo not-a-number");

        let python = Python::new(exe);
        let err = python.pointer_width(dir.path()).unwrap_err();
        assert!(matches!(err, PythonError::InvalidOutput { .. }));
    }

    #[test]
    fn failing_query_carries_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_python(dir.path(), "echo 'No module named nope' >&2; exit 1");

        let python = Python::new(exe);
        let err = python.module_dir("nope", dir.path()).unwrap_err();
        match err {
            PythonError::QueryFailed { code, stderr, .. } => {
                assert_eq!(code, 1);
                assert!(stderr.contains("No module named"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_executable_is_launch_failed() {
        let dir = tempfile::tempdir().unwrap();
        let python = Python::new("/no/such/interpreter");
        let err = python.version_string(dir.path()).unwrap_err();
        assert!(matches!(err, PythonError::LaunchFailed { .. }));
    }

    #[test]
    fn module_dir_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = stub_python(dir.path(), "echo /site-packages/trio");

        let python = Python::new(exe);
        let found = python.module_dir("trio", dir.path()).unwrap();
        assert_eq!(found, PathBuf::from("/site-packages/trio"));
    }
}
