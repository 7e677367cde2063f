//! Commit lint policy descriptor: data model, loading, validation, and
//! `extends` resolution.
//!
//! The descriptor is pure data consumed by an external rule-evaluation
//! engine. This module owns the configuration contract — exact wire field
//! names, the numeric severity encoding, and load-time shape validation —
//! but never checks a commit message against a rule itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod error;
pub mod extends;
pub mod ignores;
pub mod prompt;
pub mod rules;
pub mod severity;

pub use error::PolicyError;
pub use ignores::IgnorePredicate;
pub use prompt::PromptOverrides;
pub use rules::{known_rule, KnownRule, RuleEntry, RuleMap, RuleValue, ValueKind, KNOWN_RULES};
pub use severity::{Applicability, Severity};

/// File names probed during discovery, in precedence order.
pub const FILE_NAMES: &[&str] = &[
    ".commit-policy.yaml",
    ".commit-policy.yml",
    "commit-policy.yaml",
];

/// The commit lint policy descriptor.
///
/// Field names below are the wire contract: consuming engines match on them
/// literally, so the serialized form always uses exactly these keys.
///
/// ```
/// use commit_policy::CommitPolicy;
///
/// let policy = CommitPolicy::load_from_str(
///     "rules:\n  header-max-length: [2, always, 72]\n",
/// )
/// .unwrap();
/// assert_eq!(policy.rules.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitPolicy {
    /// Ordered list of named base rule sets merged underneath this policy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    /// Named reference to the output formatter used by the consuming engine.
    #[serde(default = "default_formatter")]
    pub formatter: String,

    /// Rule-name → enforcement tuple.
    #[serde(default)]
    pub rules: RuleMap,

    /// Ordered predicates exempting whole messages from rule evaluation.
    #[serde(
        default,
        rename = "ignorePredicates",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ignore_predicates: Vec<IgnorePredicate>,

    /// Whether the stock ignore set (merges, reverts, fixups, version bumps)
    /// applies on top of `ignorePredicates`.
    #[serde(default = "default_true", rename = "useDefaultIgnores")]
    pub use_default_ignores: bool,

    /// Shown to the user when the consuming engine rejects a message.
    #[serde(default = "default_help_url", rename = "helpUrl")]
    pub help_url: String,

    /// Cosmetic prompt text overrides.
    #[serde(
        default,
        rename = "promptOverrides",
        skip_serializing_if = "PromptOverrides::is_empty"
    )]
    pub prompt_overrides: PromptOverrides,
}

fn default_formatter() -> String {
    "default".to_string()
}

fn default_help_url() -> String {
    "https://github.com/conventional-changelog/commitlint/#what-is-commitlint".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CommitPolicy {
    /// The built-in policy: conventional base, sign-off required, 72-column
    /// headers, and the staged (disabled) rules kept for later enforcement.
    fn default() -> Self {
        use Applicability::{Always, Never};
        use Severity::{Disabled, Error};

        let mut rules = RuleMap::new();
        rules.insert("body-leading-blank", RuleEntry::new(Error, Always));
        rules.insert("footer-leading-blank", RuleEntry::new(Error, Always));
        rules.insert("header-full-stop", RuleEntry::valued(Error, Never, "."));
        rules.insert("header-max-length", RuleEntry::valued(Error, Always, 72u64));
        rules.insert("header-min-length", RuleEntry::valued(Error, Always, 1u64));
        rules.insert("subject-full-stop", RuleEntry::valued(Error, Never, "."));
        rules.insert(
            "signed-off-by",
            RuleEntry::valued(Error, Always, "Signed-off-by:"),
        );
        rules.insert(
            "trailer-exists",
            RuleEntry::valued(Error, Always, "Signed-off-by:"),
        );

        // Staged rules: declared at level 0 rather than removed, so the
        // intent to enforce them later stays visible.
        rules.insert(
            "body-max-line-length",
            RuleEntry::valued(Disabled, Always, 100u64),
        );
        rules.insert(
            "footer-max-line-length",
            RuleEntry::valued(Disabled, Always, 100u64),
        );
        rules.insert(
            "scope-case",
            RuleEntry::valued(Disabled, Always, "lower-case"),
        );
        rules.insert(
            "subject-case",
            RuleEntry::valued(
                Disabled,
                Never,
                RuleValue::tokens(["sentence-case", "start-case", "pascal-case", "upper-case"]),
            ),
        );
        rules.insert("subject-empty", RuleEntry::new(Disabled, Never));
        rules.insert(
            "type-case",
            RuleEntry::valued(Disabled, Always, "lower-case"),
        );
        rules.insert("type-empty", RuleEntry::new(Disabled, Never));
        rules.insert(
            "type-enum",
            RuleEntry::valued(
                Disabled,
                Always,
                RuleValue::tokens([
                    "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert",
                    "style", "test",
                ]),
            ),
        );

        let mut prompt_overrides = PromptOverrides::default();
        prompt_overrides.set("questions", "type", "Type of change being committed");
        prompt_overrides.set("questions", "scope", "Area of the code affected");
        prompt_overrides.set("questions", "subject", "Short imperative summary of the change");

        Self {
            extends: vec![extends::CONVENTIONAL.to_string()],
            formatter: default_formatter(),
            rules,
            ignore_predicates: vec![IgnorePredicate::EmptyMessage],
            use_default_ignores: true,
            help_url: default_help_url(),
            prompt_overrides,
        }
    }
}

impl CommitPolicy {
    /// Loads and validates a policy file, dispatching on its extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let policy = match extension_of(path) {
            Extension::Yaml => Self::load_from_str(&content)?,
            Extension::Json => Self::load_json_from_str(&content)?,
            Extension::Other => {
                return Err(PolicyError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        tracing::debug!("loaded policy from {}", path.display());
        Ok(policy)
    }

    /// Parses and validates a policy from YAML.
    pub fn load_from_str(content: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_yaml::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Parses and validates a policy from JSON.
    pub fn load_json_from_str(content: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Semantic checks past the serde shape.
    ///
    /// Token-set values must have no duplicates, declared values must match
    /// the kind the rule accepts, and custom ignore patterns must compile.
    /// Unknown rule names are kept with a warning; the consuming engine
    /// decides what to do with them.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (name, entry) in self.rules.iter() {
            match rules::known_rule(name) {
                Some(known) => known.check_value(entry.value.as_ref())?,
                None => tracing::warn!("unknown rule `{name}` kept as declared"),
            }

            if let Some(RuleValue::Tokens(tokens)) = &entry.value {
                let mut seen = std::collections::BTreeSet::new();
                for token in tokens {
                    if !seen.insert(token.as_str()) {
                        return Err(PolicyError::DuplicateToken {
                            rule: name.clone(),
                            token: token.clone(),
                        });
                    }
                }
            }
        }

        for predicate in &self.ignore_predicates {
            predicate.ensure_compiles()?;
        }

        Ok(())
    }

    /// Resolves `extends` into a self-contained policy.
    ///
    /// The result carries the merged rule mapping and an empty `extends`
    /// list; everything else is taken from this policy unchanged.
    pub fn effective(&self) -> Result<Self, PolicyError> {
        let rules = extends::resolve(&self.extends, &self.rules)?;
        Ok(Self {
            extends: Vec::new(),
            rules,
            ..self.clone()
        })
    }

    /// Whether a commit message is exempt from all rule evaluation.
    pub fn is_ignored(&self, message: &str) -> bool {
        self.ignore_predicates
            .iter()
            .any(|predicate| predicate.matches(message))
            || (self.use_default_ignores && ignores::matches_default_ignores(message))
    }

    /// Serializes to the canonical YAML form.
    pub fn to_yaml(&self) -> Result<String, PolicyError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the policy to a file, creating parent directories as needed.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PolicyError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| PolicyError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = match extension_of(path) {
            Extension::Yaml => self.to_yaml()?,
            Extension::Json => self.to_json()?,
            Extension::Other => {
                return Err(PolicyError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        fs::write(path, content).map_err(|source| PolicyError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds the nearest policy file: each ancestor of `start` is probed for
    /// the names in [`FILE_NAMES`], then the home directory is tried as a
    /// fallback.
    pub fn discover(start: &Path) -> Result<PathBuf, PolicyError> {
        for dir in start.ancestors() {
            for name in FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    tracing::debug!("discovered policy at {}", candidate.display());
                    return Ok(candidate);
                }
            }
        }

        if let Some(home) = dirs::home_dir() {
            let fallback = home.join(".commit-policy.yaml");
            if fallback.is_file() {
                tracing::debug!("using home policy at {}", fallback.display());
                return Ok(fallback);
            }
        }

        Err(PolicyError::NotFound {
            searched: start.to_path_buf(),
        })
    }
}

enum Extension {
    Yaml,
    Json,
    Other,
}

fn extension_of(path: &Path) -> Extension {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => Extension::Yaml,
        Some("json") => Extension::Json,
        _ => Extension::Other,
    }
}
