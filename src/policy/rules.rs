//! Rule entries, the rule mapping, and the known-rule catalog.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::PolicyError;
use super::severity::{Applicability, Severity};

/// Rule-specific payload of an enforcement tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Numeric limit, e.g. a maximum header length.
    Limit(u64),
    /// Single token, e.g. a trailer prefix or a case name.
    Token(String),
    /// Set of accepted tokens, e.g. the commit types.
    Tokens(Vec<String>),
}

impl RuleValue {
    /// Builds a token-set value.
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleValue::Tokens(tokens.into_iter().map(Into::into).collect())
    }

    /// Human-readable name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RuleValue::Limit(_) => "a numeric limit",
            RuleValue::Token(_) => "a token",
            RuleValue::Tokens(_) => "a token set",
        }
    }
}

impl From<u64> for RuleValue {
    fn from(limit: u64) -> Self {
        RuleValue::Limit(limit)
    }
}

impl From<&str> for RuleValue {
    fn from(token: &str) -> Self {
        RuleValue::Token(token.to_string())
    }
}

/// One enforcement tuple: severity, applicability, and an optional value.
///
/// Wire form is a sequence: `[2, always, 72]`, `[2, never, "."]`, or the
/// short `[0]` for a disabled rule with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    /// Enforcement level.
    pub severity: Severity,
    /// Whether the condition must hold or must not hold.
    pub applicability: Applicability,
    /// Rule-specific payload, when the rule takes one.
    pub value: Option<RuleValue>,
}

impl RuleEntry {
    /// Entry with no rule-specific value.
    pub fn new(severity: Severity, applicability: Applicability) -> Self {
        Self {
            severity,
            applicability,
            value: None,
        }
    }

    /// Entry carrying a rule-specific value.
    pub fn valued(
        severity: Severity,
        applicability: Applicability,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            severity,
            applicability,
            value: Some(value.into()),
        }
    }

    /// Whether the consuming engine evaluates this entry at all.
    pub fn is_active(&self) -> bool {
        self.severity.is_active()
    }
}

impl Serialize for RuleEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.value.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.severity)?;
        seq.serialize_element(&self.applicability)?;
        if let Some(value) = &self.value {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = RuleEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [severity, applicability, value] sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<RuleEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let severity: Severity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let applicability: Applicability = seq.next_element()?.unwrap_or_default();
                let value: Option<RuleValue> = seq.next_element()?;
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(
                        "rule entry has more than three elements",
                    ));
                }
                Ok(RuleEntry {
                    severity,
                    applicability,
                    value,
                })
            }
        }

        deserializer.deserialize_seq(EntryVisitor)
    }
}

/// Rule-name → enforcement entry mapping.
///
/// Keys are unique; a policy file declaring the same rule twice is rejected
/// at load time. Iteration order is the sorted key order, which keeps
/// serialization deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleMap(BTreeMap<String, RuleEntry>);

impl RuleMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous entry for the same rule.
    pub fn insert(&mut self, name: impl Into<String>, entry: RuleEntry) -> Option<RuleEntry> {
        self.0.insert(name.into(), entry)
    }

    /// Looks up a rule by name.
    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.0.get(name)
    }

    /// Whether the mapping declares the given rule.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of declared rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in sorted rule-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuleEntry)> {
        self.0.iter()
    }

    /// Iterates entries alone, in sorted rule-name order.
    pub fn values(&self) -> impl Iterator<Item = &RuleEntry> {
        self.0.values()
    }
}

impl IntoIterator for RuleMap {
    type Item = (String, RuleEntry);
    type IntoIter = std::collections::btree_map::IntoIter<String, RuleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, RuleEntry)> for RuleMap {
    fn from_iter<T: IntoIterator<Item = (String, RuleEntry)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for RuleMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = RuleMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from rule name to enforcement entry")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RuleMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rules = BTreeMap::new();
                while let Some((name, entry)) = map.next_entry::<String, RuleEntry>()? {
                    if rules.insert(name.clone(), entry).is_some() {
                        return Err(de::Error::custom(format!(
                            "rule `{name}` is declared more than once"
                        )));
                    }
                }
                Ok(RuleMap(rules))
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// Kind of value a known rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Rule takes no value.
    None,
    /// Rule takes a numeric limit.
    Limit,
    /// Rule takes a single token.
    Token,
    /// Rule takes a set of tokens.
    Tokens,
    /// Rule takes either a single token or a set of tokens.
    TokenOrTokens,
}

impl ValueKind {
    /// Human-readable description, used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            ValueKind::None => "no value",
            ValueKind::Limit => "a numeric limit",
            ValueKind::Token => "a token",
            ValueKind::Tokens => "a token set",
            ValueKind::TokenOrTokens => "a token or token set",
        }
    }

    fn accepts(self, value: &RuleValue) -> bool {
        match self {
            ValueKind::None => false,
            ValueKind::Limit => matches!(value, RuleValue::Limit(_)),
            ValueKind::Token => matches!(value, RuleValue::Token(_)),
            ValueKind::Tokens => matches!(value, RuleValue::Tokens(_)),
            ValueKind::TokenOrTokens => {
                matches!(value, RuleValue::Token(_) | RuleValue::Tokens(_))
            }
        }
    }
}

/// Catalog entry for a rule the toolkit knows about.
#[derive(Debug, Clone, Copy)]
pub struct KnownRule {
    /// Rule name as matched literally by consuming engines.
    pub name: &'static str,
    /// Kind of value the rule accepts.
    pub value: ValueKind,
    /// One-line description of the rule's effect.
    pub about: &'static str,
}

impl KnownRule {
    /// Checks a declared value against the kind this rule accepts.
    ///
    /// A missing value is always fine; the consuming engine falls back to
    /// its own default.
    pub fn check_value(&self, value: Option<&RuleValue>) -> Result<(), PolicyError> {
        let Some(value) = value else { return Ok(()) };
        if self.value.accepts(value) {
            Ok(())
        } else {
            Err(PolicyError::ValueMismatch {
                rule: self.name.to_string(),
                expected: self.value.describe(),
                got: value.kind_name(),
            })
        }
    }
}

/// Every rule name the toolkit recognizes, with the value kind it accepts.
///
/// Unknown names are tolerated with a warning when a policy loads; the table
/// exists so declared values can be shape-checked and so the CLI can print a
/// catalog.
pub const KNOWN_RULES: &[KnownRule] = &[
    KnownRule { name: "body-case", value: ValueKind::TokenOrTokens, about: "body uses the configured case" },
    KnownRule { name: "body-empty", value: ValueKind::None, about: "body is empty" },
    KnownRule { name: "body-full-stop", value: ValueKind::Token, about: "body ends with the configured character" },
    KnownRule { name: "body-leading-blank", value: ValueKind::None, about: "body is separated from the header by a blank line" },
    KnownRule { name: "body-max-length", value: ValueKind::Limit, about: "body total length stays under the limit" },
    KnownRule { name: "body-max-line-length", value: ValueKind::Limit, about: "each body line stays under the limit" },
    KnownRule { name: "body-min-length", value: ValueKind::Limit, about: "body has at least the configured length" },
    KnownRule { name: "footer-empty", value: ValueKind::None, about: "footer is empty" },
    KnownRule { name: "footer-leading-blank", value: ValueKind::None, about: "footer is separated by a blank line" },
    KnownRule { name: "footer-max-length", value: ValueKind::Limit, about: "footer total length stays under the limit" },
    KnownRule { name: "footer-max-line-length", value: ValueKind::Limit, about: "each footer line stays under the limit" },
    KnownRule { name: "footer-min-length", value: ValueKind::Limit, about: "footer has at least the configured length" },
    KnownRule { name: "header-case", value: ValueKind::TokenOrTokens, about: "header uses the configured case" },
    KnownRule { name: "header-full-stop", value: ValueKind::Token, about: "header ends with the configured character" },
    KnownRule { name: "header-max-length", value: ValueKind::Limit, about: "header stays under the limit" },
    KnownRule { name: "header-min-length", value: ValueKind::Limit, about: "header has at least the configured length" },
    KnownRule { name: "header-trim", value: ValueKind::None, about: "header has no surrounding whitespace" },
    KnownRule { name: "references-empty", value: ValueKind::None, about: "message references an issue" },
    KnownRule { name: "scope-case", value: ValueKind::TokenOrTokens, about: "scope uses the configured case" },
    KnownRule { name: "scope-empty", value: ValueKind::None, about: "scope is empty" },
    KnownRule { name: "scope-enum", value: ValueKind::Tokens, about: "scope comes from the configured set" },
    KnownRule { name: "scope-max-length", value: ValueKind::Limit, about: "scope stays under the limit" },
    KnownRule { name: "scope-min-length", value: ValueKind::Limit, about: "scope has at least the configured length" },
    KnownRule { name: "signed-off-by", value: ValueKind::Token, about: "message carries the configured sign-off trailer" },
    KnownRule { name: "subject-case", value: ValueKind::TokenOrTokens, about: "subject uses the configured case" },
    KnownRule { name: "subject-empty", value: ValueKind::None, about: "subject is empty" },
    KnownRule { name: "subject-exclamation-mark", value: ValueKind::None, about: "subject has an exclamation mark before the separator" },
    KnownRule { name: "subject-full-stop", value: ValueKind::Token, about: "subject ends with the configured character" },
    KnownRule { name: "subject-max-length", value: ValueKind::Limit, about: "subject stays under the limit" },
    KnownRule { name: "subject-min-length", value: ValueKind::Limit, about: "subject has at least the configured length" },
    KnownRule { name: "trailer-exists", value: ValueKind::Token, about: "configured trailer line is present" },
    KnownRule { name: "type-case", value: ValueKind::TokenOrTokens, about: "type uses the configured case" },
    KnownRule { name: "type-empty", value: ValueKind::None, about: "type is empty" },
    KnownRule { name: "type-enum", value: ValueKind::Tokens, about: "type comes from the configured set" },
    KnownRule { name: "type-max-length", value: ValueKind::Limit, about: "type stays under the limit" },
    KnownRule { name: "type-min-length", value: ValueKind::Limit, about: "type has at least the configured length" },
];

/// Looks up a rule in the known-rule catalog.
pub fn known_rule(name: &str) -> Option<&'static KnownRule> {
    KNOWN_RULES.iter().find(|rule| rule.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_tuple_round_trips() {
        let entry: RuleEntry = serde_yaml::from_str("[2, always, 72]").unwrap();
        assert_eq!(
            entry,
            RuleEntry::valued(Severity::Error, Applicability::Always, 72u64)
        );
        let yaml = serde_yaml::to_string(&entry).unwrap();
        let again: RuleEntry = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(entry, again);
    }

    #[test]
    fn short_tuple_defaults_to_always() {
        let entry: RuleEntry = serde_yaml::from_str("[0]").unwrap();
        assert_eq!(entry.severity, Severity::Disabled);
        assert_eq!(entry.applicability, Applicability::Always);
        assert!(entry.value.is_none());
    }

    #[test]
    fn never_tuple_with_token_value() {
        let entry: RuleEntry = serde_yaml::from_str("[2, never, \".\"]").unwrap();
        assert_eq!(entry.applicability, Applicability::Never);
        assert_eq!(entry.value, Some(RuleValue::Token(".".to_string())));
    }

    #[test]
    fn token_set_value_parses() {
        let entry: RuleEntry = serde_yaml::from_str("[0, always, [feat, fix]]").unwrap();
        assert_eq!(entry.value, Some(RuleValue::tokens(["feat", "fix"])));
    }

    #[test]
    fn four_element_tuple_is_rejected() {
        assert!(serde_yaml::from_str::<RuleEntry>("[2, always, 72, extra]").is_err());
    }

    #[test]
    fn empty_tuple_is_rejected() {
        assert!(serde_yaml::from_str::<RuleEntry>("[]").is_err());
    }

    #[test]
    fn mapping_form_is_rejected() {
        assert!(serde_yaml::from_str::<RuleEntry>("severity: 2").is_err());
    }

    #[test]
    fn duplicate_rule_name_is_rejected() {
        let yaml = "header-max-length: [2, always, 72]\nheader-max-length: [0]\n";
        let result = serde_yaml::from_str::<RuleMap>(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn rule_map_iterates_sorted() {
        let mut rules = RuleMap::new();
        rules.insert("type-enum", RuleEntry::new(Severity::Disabled, Applicability::Always));
        rules.insert("body-leading-blank", RuleEntry::new(Severity::Error, Applicability::Always));
        let names: Vec<&str> = rules.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["body-leading-blank", "type-enum"]);
    }

    #[test]
    fn catalog_lookup_checks_value_kinds() {
        let header_max = known_rule("header-max-length").unwrap();
        assert!(header_max.check_value(Some(&RuleValue::Limit(72))).is_ok());
        assert!(header_max.check_value(None).is_ok());
        assert!(header_max
            .check_value(Some(&RuleValue::Token("72".into())))
            .is_err());

        let leading_blank = known_rule("body-leading-blank").unwrap();
        assert!(leading_blank
            .check_value(Some(&RuleValue::Limit(1)))
            .is_err());

        assert!(known_rule("no-such-rule").is_none());
    }

    #[test]
    fn catalog_is_sorted_by_name() {
        let names: Vec<&str> = KNOWN_RULES.iter().map(|rule| rule.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
