//! Validate command — checks a policy file for shape and content errors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::policy::CommitPolicy;

/// Validate command options.
#[derive(Parser)]
pub struct ValidateCommand {
    /// Policy file to validate (discovered from the working directory when
    /// omitted).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Also resolves extends and reports the effective rule set.
    #[arg(long)]
    pub effective: bool,

    /// Only reports errors.
    #[arg(long)]
    pub quiet: bool,
}

impl ValidateCommand {
    /// Executes the validate command.
    pub fn execute(self) -> Result<()> {
        let path = super::resolve_policy_path(self.file)?;
        let policy = CommitPolicy::load_from_file(&path)
            .with_context(|| format!("Policy file {} failed validation", path.display()))?;

        if !self.quiet {
            let active = policy.rules.values().filter(|entry| entry.is_active()).count();
            println!("✓ {} is a valid policy", path.display());
            println!("  {} rules declared, {} active", policy.rules.len(), active);
        }

        if self.effective {
            let effective = policy
                .effective()
                .with_context(|| format!("Policy file {} failed extends resolution", path.display()))?;
            if !self.quiet {
                println!(
                    "✓ {} base(s) resolved into {} effective rules",
                    policy.extends.len(),
                    effective.rules.len()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn valid_file_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        CommitPolicy::default().save_to_file(&path).unwrap();

        let cmd = ValidateCommand {
            file: Some(path),
            effective: true,
            quiet: true,
        };
        assert!(cmd.execute().is_ok());
    }

    #[test]
    fn malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "rules:\n  header-max-length: [9, always, 72]\n").unwrap();

        let cmd = ValidateCommand {
            file: Some(path),
            effective: false,
            quiet: true,
        };
        assert!(cmd.execute().is_err());
    }

    #[test]
    fn unresolvable_extends_fails_only_with_effective() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "extends: [no-such-base]\n").unwrap();

        let shallow = ValidateCommand {
            file: Some(path.clone()),
            effective: false,
            quiet: true,
        };
        assert!(shallow.execute().is_ok());

        let deep = ValidateCommand {
            file: Some(path),
            effective: true,
            quiet: true,
        };
        assert!(deep.execute().is_err());
    }
}
