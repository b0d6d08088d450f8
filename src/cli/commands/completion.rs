//! completion command - Shell completion script generation.
//!
//! The script is written to stdout so it can be piped straight into the
//! shell's completion directory or eval'd from a profile.

use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells, Generator};

use crate::cli::args::{Cli, Shell};

/// Generate a completion script for the requested shell.
pub fn completion(shell: Shell) -> Result<()> {
    match shell {
        Shell::Bash => emit(shells::Bash),
        Shell::Zsh => emit(shells::Zsh),
        Shell::Fish => emit(shells::Fish),
        Shell::PowerShell => emit(shells::PowerShell),
    }
    Ok(())
}

fn emit(generator: impl Generator) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(generator, &mut cmd, name, &mut io::stdout());
}
