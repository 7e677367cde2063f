//! Show command — prints a policy to stdout.

use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::policy::{known_rule, CommitPolicy, Severity};

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Policy file to print (discovered from the working directory when
    /// omitted).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format: yaml (default), json.
    #[arg(long, default_value = "yaml")]
    pub format: String,

    /// Resolves extends before printing.
    #[arg(long)]
    pub effective: bool,

    /// Prints the built-in default policy instead of reading a file.
    #[arg(long)]
    pub defaults: bool,

    /// Prints the known-rule catalog with this policy's severities instead
    /// of the serialized policy.
    #[arg(long)]
    pub catalog: bool,
}

/// Output format for the show command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// YAML, the canonical on-disk form.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let Ok(format) = self.format.parse::<OutputFormat>() else {
            bail!("unsupported output format: {} (expected yaml or json)", self.format);
        };

        let mut policy = if self.defaults {
            CommitPolicy::default()
        } else {
            let path = super::resolve_policy_path(self.file)?;
            CommitPolicy::load_from_file(&path)?
        };

        if self.effective || self.catalog {
            policy = policy.effective()?;
        }

        if self.catalog {
            print_catalog(&policy);
            return Ok(());
        }

        let rendered = match format {
            OutputFormat::Yaml => policy.to_yaml()?,
            OutputFormat::Json => policy.to_json()?,
        };
        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }

        Ok(())
    }
}

/// Prints every declared rule with an ANSI-colored severity label and, when
/// the rule is known, its one-line effect.
fn print_catalog(policy: &CommitPolicy) {
    for (name, entry) in policy.rules.iter() {
        let about = known_rule(name).map_or("(not in the rule catalog)", |rule| rule.about);
        println!("{} {name:<26} {about}", severity_label(entry.severity));
    }
}

/// Returns an ANSI-colored severity label with fixed-width padding.
fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m   ",
        Severity::Warning => "\x1b[33mwarning\x1b[0m ",
        Severity::Disabled => "\x1b[90mdisabled\x1b[0m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("YAML".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("toml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Yaml);
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn defaults_flag_needs_no_file() {
        let cmd = ShowCommand {
            file: None,
            format: "json".to_string(),
            effective: true,
            defaults: true,
            catalog: false,
        };
        assert!(cmd.execute().is_ok());
    }

    #[test]
    fn unsupported_format_fails() {
        let cmd = ShowCommand {
            file: None,
            format: "toml".to_string(),
            effective: false,
            defaults: true,
            catalog: false,
        };
        assert!(cmd.execute().is_err());
    }

    #[test]
    fn catalog_covers_every_default_rule() {
        // Every rule in the default effective policy is in the known-rule
        // catalog, so the catalog view never prints the fallback text.
        let policy = CommitPolicy::default().effective().unwrap();
        for (name, _) in policy.rules.iter() {
            assert!(known_rule(name).is_some(), "{name} missing from catalog");
        }
    }
}
