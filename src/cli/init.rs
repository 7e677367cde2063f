//! Init command — writes a starter policy file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::policy::CommitPolicy;

/// Init command options.
#[derive(Parser)]
pub struct InitCommand {
    /// Where to write the policy file.
    #[arg(value_name = "PATH", default_value = ".commit-policy.yaml")]
    pub path: PathBuf,

    /// Overwrites an existing file.
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Executes the init command.
    pub fn execute(self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            );
        }

        CommitPolicy::default()
            .save_to_file(&self.path)
            .with_context(|| format!("Failed to write starter policy to {}", self.path.display()))?;

        println!("✅ Wrote starter policy to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_the_default_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".commit-policy.yaml");

        let cmd = InitCommand {
            path: path.clone(),
            force: false,
        };
        cmd.execute().unwrap();

        let written = CommitPolicy::load_from_file(&path).unwrap();
        assert_eq!(written, CommitPolicy::default());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".commit-policy.yaml");
        std::fs::write(&path, "formatter: custom\n").unwrap();

        let cmd = InitCommand {
            path: path.clone(),
            force: false,
        };
        assert!(cmd.execute().is_err());

        // The existing file is untouched.
        let kept = std::fs::read_to_string(&path).unwrap();
        assert_eq!(kept, "formatter: custom\n");

        let forced = InitCommand { path, force: true };
        forced.execute().unwrap();
    }
}
