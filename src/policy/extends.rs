//! Named base rule sets and `extends` resolution.

use super::error::PolicyError;
use super::rules::{RuleEntry, RuleMap, RuleValue};
use super::severity::{Applicability, Severity};

/// Name of the conventional-commit base rule set.
pub const CONVENTIONAL: &str = "conventional";

/// Looks up a built-in base rule set by name.
pub fn builtin_base(name: &str) -> Option<RuleMap> {
    match name {
        CONVENTIONAL => Some(conventional_rules()),
        _ => None,
    }
}

/// Resolves an ordered `extends` list underneath a policy's own rules.
///
/// Precedence: the policy's own entries win over every base; among bases,
/// the first-listed one wins. Unknown base names are load errors, matching
/// how consuming engines fail unresolvable references.
pub(crate) fn resolve(extends: &[String], own: &RuleMap) -> Result<RuleMap, PolicyError> {
    let mut merged = RuleMap::new();
    for name in extends {
        let base = builtin_base(name).ok_or_else(|| PolicyError::UnknownBase(name.clone()))?;
        for (rule, entry) in base {
            if !merged.contains(&rule) {
                merged.insert(rule, entry);
            }
        }
    }
    for (rule, entry) in own.iter() {
        merged.insert(rule.clone(), entry.clone());
    }
    Ok(merged)
}

/// The conventional-commit rule set.
fn conventional_rules() -> RuleMap {
    let mut rules = RuleMap::new();
    rules.insert(
        "body-leading-blank",
        RuleEntry::new(Severity::Warning, Applicability::Always),
    );
    rules.insert(
        "body-max-line-length",
        RuleEntry::valued(Severity::Error, Applicability::Always, 100u64),
    );
    rules.insert(
        "footer-leading-blank",
        RuleEntry::new(Severity::Warning, Applicability::Always),
    );
    rules.insert(
        "footer-max-line-length",
        RuleEntry::valued(Severity::Error, Applicability::Always, 100u64),
    );
    rules.insert(
        "header-max-length",
        RuleEntry::valued(Severity::Error, Applicability::Always, 100u64),
    );
    rules.insert(
        "header-trim",
        RuleEntry::new(Severity::Error, Applicability::Always),
    );
    rules.insert(
        "scope-case",
        RuleEntry::valued(Severity::Error, Applicability::Always, "lower-case"),
    );
    rules.insert(
        "subject-case",
        RuleEntry::valued(
            Severity::Error,
            Applicability::Never,
            RuleValue::tokens(["sentence-case", "start-case", "pascal-case", "upper-case"]),
        ),
    );
    rules.insert(
        "subject-empty",
        RuleEntry::new(Severity::Error, Applicability::Never),
    );
    rules.insert(
        "subject-full-stop",
        RuleEntry::valued(Severity::Error, Applicability::Never, "."),
    );
    rules.insert(
        "type-case",
        RuleEntry::valued(Severity::Error, Applicability::Always, "lower-case"),
    );
    rules.insert(
        "type-empty",
        RuleEntry::new(Severity::Error, Applicability::Never),
    );
    rules.insert(
        "type-enum",
        RuleEntry::valued(
            Severity::Error,
            Applicability::Always,
            RuleValue::tokens([
                "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert",
                "style", "test",
            ]),
        ),
    );
    rules
}
