//! Severity and applicability enforcement levels.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Enforcement level of a rule.
///
/// Encoded on the wire as 0 (disabled), 1 (warning), or 2 (error); any other
/// number is rejected when the policy is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Rule is declared but not evaluated.
    Disabled,
    /// Violations are reported without rejecting the message.
    Warning,
    /// Violations reject the message.
    Error,
}

impl Severity {
    /// Returns the numeric wire encoding of this level.
    pub fn level(self) -> u64 {
        match self {
            Severity::Disabled => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }

    /// Maps a numeric wire level back to a severity.
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Severity::Disabled),
            1 => Some(Severity::Warning),
            2 => Some(Severity::Error),
            _ => None,
        }
    }

    /// Whether the consuming engine evaluates the rule at all.
    pub fn is_active(self) -> bool {
        self != Severity::Disabled
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Disabled => write!(f, "disabled"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.level())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level = u64::deserialize(deserializer)?;
        Severity::from_level(level).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid severity level {level}: expected 0 (disabled), 1 (warning), or 2 (error)"
            ))
        })
    }
}

/// Direction a rule is applied in.
///
/// `never` inverts the rule: `header-full-stop` at `never` means the header
/// must NOT end with the configured character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    /// Condition must hold.
    #[default]
    Always,
    /// Condition must not hold.
    Never,
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Always => write!(f, "always"),
            Applicability::Never => write!(f, "never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn severity_levels_map_both_ways() {
        assert_eq!(Severity::Disabled.level(), 0);
        assert_eq!(Severity::Warning.level(), 1);
        assert_eq!(Severity::Error.level(), 2);
        assert_eq!(Severity::from_level(2), Some(Severity::Error));
        assert_eq!(Severity::from_level(3), None);
    }

    #[test]
    fn severity_serializes_as_number() {
        let yaml = serde_yaml::to_string(&Severity::Error).unwrap();
        assert_eq!(yaml.trim(), "2");
    }

    #[test]
    fn unknown_severity_level_is_rejected() {
        assert!(serde_yaml::from_str::<Severity>("3").is_err());
        assert!(serde_yaml::from_str::<Severity>("-1").is_err());
        assert!(serde_yaml::from_str::<Severity>("\"error\"").is_err());
    }

    #[test]
    fn applicability_round_trips_as_lowercase() {
        let yaml = serde_yaml::to_string(&Applicability::Never).unwrap();
        assert_eq!(yaml.trim(), "never");
        let parsed: Applicability = serde_yaml::from_str("always").unwrap();
        assert_eq!(parsed, Applicability::Always);
        assert!(serde_yaml::from_str::<Applicability>("sometimes").is_err());
    }

    #[test]
    fn only_disabled_is_inactive() {
        assert!(!Severity::Disabled.is_active());
        assert!(Severity::Warning.is_active());
        assert!(Severity::Error.is_active());
    }

    proptest! {
        #[test]
        fn valid_levels_round_trip(level in 0u64..=2) {
            let severity: Severity = serde_yaml::from_str(&level.to_string()).unwrap();
            prop_assert_eq!(severity.level(), level);
        }

        #[test]
        fn levels_past_two_are_rejected(level in 3u64..) {
            prop_assert!(serde_yaml::from_str::<Severity>(&level.to_string()).is_err());
        }
    }
}
