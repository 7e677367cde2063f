//! Ignore predicates exempting whole messages from rule evaluation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::PolicyError;

/// Wire name of the built-in empty-message predicate.
pub const EMPTY_MESSAGE: &str = "empty-message";

/// A predicate over the full commit message.
///
/// A message matched by any predicate in the policy is exempt from all rule
/// evaluation. Predicates are either named built-ins or custom regexes:
///
/// ```yaml
/// ignorePredicates:
///   - empty-message
///   - pattern: "^WIP\\b"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum IgnorePredicate {
    /// Matches the message that is exactly the empty string.
    EmptyMessage,
    /// Matches messages against a custom regex.
    Pattern(String),
}

impl IgnorePredicate {
    /// Evaluates the predicate against a full commit message.
    pub fn matches(&self, message: &str) -> bool {
        match self {
            IgnorePredicate::EmptyMessage => message.is_empty(),
            IgnorePredicate::Pattern(pattern) => {
                // Non-compiling patterns never match; validate() reports them
                // as load errors before evaluation ever happens.
                Regex::new(pattern).is_ok_and(|re| re.is_match(message))
            }
        }
    }

    /// Confirms a custom pattern compiles, at load time.
    pub fn ensure_compiles(&self) -> Result<(), PolicyError> {
        if let IgnorePredicate::Pattern(pattern) = self {
            Regex::new(pattern).map_err(|source| PolicyError::BadIgnorePattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PredicateRepr {
    Name(String),
    Pattern { pattern: String },
}

impl Serialize for IgnorePredicate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            IgnorePredicate::EmptyMessage => serializer.serialize_str(EMPTY_MESSAGE),
            IgnorePredicate::Pattern(pattern) => PredicateRepr::Pattern {
                pattern: pattern.clone(),
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for IgnorePredicate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PredicateRepr::deserialize(deserializer)? {
            PredicateRepr::Name(name) if name == EMPTY_MESSAGE => {
                Ok(IgnorePredicate::EmptyMessage)
            }
            PredicateRepr::Name(name) => Err(serde::de::Error::custom(format!(
                "unknown ignore predicate `{name}`"
            ))),
            PredicateRepr::Pattern { pattern } => Ok(IgnorePredicate::Pattern(pattern)),
        }
    }
}

/// The stock ignore set, applied when `useDefaultIgnores` is true.
///
/// Covers machine-generated messages that no structural rule should reject:
/// merges, reverts, autosquash markers, and version-bump subjects.
const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    r"(?m)^((Merge pull request)|(Merge (.*?) into (.*?)|(Merge branch (.*?)))(?:\r?\n)*$)",
    r"^(R|r)evert (.*)",
    r"^(fixup|squash|amend)!",
    r"^Merged (.*?)(in|into) (.*)",
    r"^Merged PR (.*): (.*)",
    r"^Merge remote-tracking branch (.*)",
    r"^Automatic merge(.*)",
    r"^Auto-merged (.*?) into (.*)",
    r"^v?\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?\s*$",
];

#[allow(clippy::expect_used)]
static DEFAULT_IGNORES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("built-in ignore pattern compiles"))
        .collect()
});

/// Whether the stock ignore set exempts the given message.
pub fn matches_default_ignores(message: &str) -> bool {
    DEFAULT_IGNORES.iter().any(|re| re.is_match(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_predicate_matches_only_empty() {
        let predicate = IgnorePredicate::EmptyMessage;
        assert!(predicate.matches(""));
        assert!(!predicate.matches(" "));
        assert!(!predicate.matches("feat: add widget"));
    }

    #[test]
    fn pattern_predicate_matches_regex() {
        let predicate = IgnorePredicate::Pattern(r"^WIP\b".to_string());
        assert!(predicate.matches("WIP: not ready"));
        assert!(!predicate.matches("feat: WIP handling"));
    }

    #[test]
    fn predicates_round_trip_through_yaml() {
        let predicates = vec![
            IgnorePredicate::EmptyMessage,
            IgnorePredicate::Pattern("^WIP".to_string()),
        ];
        let yaml = serde_yaml::to_string(&predicates).unwrap();
        let parsed: Vec<IgnorePredicate> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(predicates, parsed);
    }

    #[test]
    fn unknown_predicate_name_is_rejected() {
        assert!(serde_yaml::from_str::<IgnorePredicate>("merge-commits").is_err());
    }

    #[test]
    fn bad_pattern_fails_compile_check() {
        let predicate = IgnorePredicate::Pattern("(unclosed".to_string());
        assert!(predicate.ensure_compiles().is_err());
        assert!(!predicate.matches("anything"));
    }

    #[test]
    fn default_ignores_cover_generated_messages() {
        assert!(matches_default_ignores("Merge pull request #42 from fork/branch"));
        assert!(matches_default_ignores("Merge branch 'main' into feature"));
        assert!(matches_default_ignores("Revert \"feat: add widget\""));
        assert!(matches_default_ignores("fixup! feat: add widget"));
        assert!(matches_default_ignores("squash! feat: add widget"));
        assert!(matches_default_ignores("1.2.3"));
        assert!(matches_default_ignores("v2.0.0-rc.1"));
    }

    #[test]
    fn default_ignores_leave_ordinary_messages_alone() {
        assert!(!matches_default_ignores("feat: add widget"));
        assert!(!matches_default_ignores("update version to 1.2.3"));
        assert!(!matches_default_ignores(""));
    }
}
