//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Minimal output
//!
//! # Environment
//!
//! Branch selection is deliberately NOT a CLI flag: `CHECK_DOCS` and
//! `CHECK_FORMATTING` come from the environment, matching how CI systems
//! parameterize jobs.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gantry - A fail-fast CI pipeline runner for Python packages
#[derive(Parser, Debug)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gantry was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output (commands still run, the echo is suppressed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute the pipeline
    #[command(
        long_about = "Execute the pipeline.\n\n\
            Builds a source distribution, installs it, and then either builds \
            the documentation (CHECK_DOCS=1) or runs the test suite against \
            the installed copy. Execution is strictly sequential: the first \
            failing command aborts the run, and its exit code becomes the \
            process exit code.",
        after_help = "\
ENVIRONMENT:
    CHECK_DOCS=1          build documentation instead of running tests
    CHECK_FORMATTING=1    run the formatting check before the test suite

EXAMPLES:
    # Test path with formatting check
    CHECK_FORMATTING=1 gantry run

    # Documentation path
    CHECK_DOCS=1 gantry run

    # Show what would run, without running anything
    gantry run --dry-run"
    )]
    Run {
        /// Print the plan instead of executing it
        #[arg(long)]
        dry_run: bool,

        /// Use this config file instead of <workspace>/gantry.toml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Show the plan the current flags and config would produce
    Plan {
        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,

        /// Use this config file instead of <workspace>/gantry.toml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Show the resolved configuration
    Config {
        /// Emit the configuration as JSON
        #[arg(long)]
        json: bool,

        /// Use this config file instead of <workspace>/gantry.toml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
