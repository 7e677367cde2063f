//! Cosmetic prompt-text overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display-text overrides for interactive front ends, section → field → text.
///
/// Purely cosmetic; no rule semantics hang off this mapping. Sections and
/// field names are free-form because each front end defines its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptOverrides {
    #[serde(flatten)]
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl PromptOverrides {
    /// Whether any override is present.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Looks up the display text for one prompt field.
    pub fn get(&self, section: &str, field: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// Sets the display text for one prompt field.
    pub fn set(
        &mut self,
        section: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(field.into(), text.into());
    }
}
