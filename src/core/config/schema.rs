//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Defaults
//!
//! Every key is optional; the defaults reproduce the conventional layout of
//! a Python package CI job (`dist/` for archives, `test-requirements.txt`,
//! `docs/source` → `docs/build`, `test-results.xml`, `.coveragerc`).
//!
//! # Validation
//!
//! Config values are validated after parsing so that a malformed
//! `gantry.toml` fails before any tool is invoked.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Pipeline configuration for one workspace.
///
/// # Example
///
/// ```toml
/// package = "trio"
/// python = "python"
///
/// [tests]
/// requirements = "test-requirements.txt"
/// run_slow = true
///
/// [coverage]
/// skip_versions = ["3.7.0a0 (nightly, known-broken)"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Import name of the package under test.
    ///
    /// Required for the test path (the installed copy is located by
    /// importing this name); the docs path works without it.
    pub package: Option<String>,

    /// Python interpreter executable.
    pub python: String,

    /// Where the JSON run report is written, relative to the workspace.
    pub report_path: PathBuf,

    /// Source distribution build settings.
    pub build: BuildConfig,

    /// Documentation path settings.
    pub docs: DocsConfig,

    /// Test path settings.
    pub tests: TestsConfig,

    /// Formatting check settings.
    pub formatting: FormattingConfig,

    /// Coverage upload settings.
    pub coverage: CoverageConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            package: None,
            python: "python".to_string(),
            report_path: PathBuf::from("gantry-report.json"),
            build: BuildConfig::default(),
            docs: DocsConfig::default(),
            tests: TestsConfig::default(),
            formatting: FormattingConfig::default(),
            coverage: CoverageConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.python.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "python interpreter must not be empty".to_string(),
            ));
        }

        if let Some(package) = &self.package {
            if !valid_import_name(package) {
                return Err(ConfigError::InvalidValue(format!(
                    "package '{}' is not a valid Python import name",
                    package
                )));
            }
        }

        self.build.validate()?;
        self.tests.validate()?;
        self.formatting.validate()?;
        self.coverage.validate()?;

        Ok(())
    }
}

/// Source distribution build settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory the build tool writes archives into.
    pub dist_dir: PathBuf,
    /// Archive format passed to `setup.py sdist --formats=`.
    pub sdist_format: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            sdist_format: "zip".to_string(),
        }
    }
}

impl BuildConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        const KNOWN_FORMATS: &[&str] = &["zip", "gztar", "bztar", "xztar", "tar"];
        if !KNOWN_FORMATS.contains(&self.sdist_format.as_str()) {
            return Err(ConfigError::InvalidValue(format!(
                "unknown sdist format '{}', must be one of: {}",
                self.sdist_format,
                KNOWN_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Documentation path settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Requirements file for the documentation toolchain.
    pub requirements: PathBuf,
    /// Sphinx source directory.
    pub source: PathBuf,
    /// Sphinx HTML output directory.
    pub build_dir: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            requirements: PathBuf::from("ci/rtd-requirements.txt"),
            source: PathBuf::from("docs/source"),
            build_dir: PathBuf::from("docs/build"),
        }
    }
}

/// Test path settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TestsConfig {
    /// Requirements file for test dependencies.
    pub requirements: PathBuf,
    /// JUnit XML report path, relative to the workspace.
    pub junit_path: PathBuf,
    /// Coverage configuration file, relative to the workspace.
    pub coverage_config: PathBuf,
    /// Seconds before the fault handler dumps tracebacks for a hung test.
    pub faulthandler_timeout: u32,
    /// Opt in to slow tests (`--run-slow`).
    pub run_slow: bool,
    /// Extra arguments appended to the pytest invocation.
    pub extra_args: Vec<String>,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            requirements: PathBuf::from("test-requirements.txt"),
            junit_path: PathBuf::from("test-results.xml"),
            coverage_config: PathBuf::from(".coveragerc"),
            faulthandler_timeout: 60,
            run_slow: true,
            extra_args: vec![],
        }
    }
}

impl TestsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.faulthandler_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "faulthandler_timeout must be greater than zero".to_string(),
            ));
        }
        if self.extra_args.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "tests.extra_args must not contain empty arguments".to_string(),
            ));
        }
        Ok(())
    }
}

/// Formatting check settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FormattingConfig {
    /// Full argv of the formatting check.
    ///
    /// Empty means the built-in default: `yapf -rpd setup.py <package>`.
    pub command: Vec<String>,
}

impl FormattingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.command.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "formatting.command must not contain empty arguments".to_string(),
            ));
        }
        Ok(())
    }
}

/// Coverage upload settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    /// Full argv of the coverage uploader.
    pub upload_command: Vec<String>,
    /// Interpreter version strings for which the upload is skipped.
    ///
    /// Compared by exact equality against the interpreter's reported
    /// version string. Used to exclude known-broken interpreter builds.
    pub skip_versions: Vec<String>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            upload_command: vec!["codecov".to_string()],
            skip_versions: vec![],
        }
    }
}

impl CoverageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.upload_command.is_empty() {
            return Err(ConfigError::InvalidValue(
                "coverage.upload_command must not be empty".to_string(),
            ));
        }
        if self.upload_command.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "coverage.upload_command must not contain empty arguments".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a string is a plausible Python import name.
///
/// One identifier: ASCII letters, digits, and underscores, not starting
/// with a digit. Dotted module paths are rejected; the pipeline imports a
/// top-level package.
pub fn valid_import_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
