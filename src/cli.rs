//! CLI interface for commit-policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::policy::CommitPolicy;

pub mod init;
pub mod show;
pub mod validate;

/// commit-policy: commit message lint policy toolkit.
#[derive(Parser)]
#[command(name = "commit-policy")]
#[command(about = "Commit message lint policy descriptor toolkit", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Validates a policy file.
    Validate(validate::ValidateCommand),
    /// Prints a policy to stdout.
    Show(show::ShowCommand),
    /// Writes a starter policy file.
    Init(init::InitCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Validate(validate_cmd) => validate_cmd.execute(),
            Commands::Show(show_cmd) => show_cmd.execute(),
            Commands::Init(init_cmd) => init_cmd.execute(),
        }
    }
}

/// Resolves the policy file to operate on: an explicit path if given,
/// otherwise discovery from the working directory.
pub(crate) fn resolve_policy_path(file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to determine working directory")?;
            Ok(CommitPolicy::discover(&cwd)?)
        }
    }
}
