//! Locale identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A BCP-47-like locale identifier, normalized to lowercase with `-`
/// separators (`en-US`, `en_us` and `EN-us` are the same locale).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LocaleId(String);

impl LocaleId {
    pub fn new(tag: &str) -> Self {
        Self(tag.trim().replace('_', "-").to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag (`fr` for `fr-ca`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// The region subtag, if any (`ca` for `fr-ca`).
    pub fn region(&self) -> Option<&str> {
        self.0
            .split('-')
            .skip(1)
            .find(|part| part.len() == 2 || part.chars().all(|c| c.is_ascii_digit()))
    }

    pub fn same_language_as(&self, other: &LocaleId) -> bool {
        self.language() == other.language()
    }

    /// Uppercases `text` with this locale's rules, one char in, one char out.
    ///
    /// Keeping the char count stable lets match offsets computed on the
    /// uppercased copy address the original text.
    pub fn to_upper(&self, text: &str) -> String {
        let turkic = matches!(self.language(), "tr" | "az");
        text.chars()
            .map(|c| match c {
                'i' if turkic => '\u{0130}',
                _ => c.to_uppercase().next().unwrap_or(c),
            })
            .collect()
    }

    /// Lowercases `text` with this locale's rules, one char in, one char out.
    pub fn to_lower(&self, text: &str) -> String {
        let turkic = matches!(self.language(), "tr" | "az");
        text.chars()
            .map(|c| match c {
                'I' if turkic => '\u{0131}',
                '\u{0130}' if turkic => 'i',
                _ => c.to_lowercase().next().unwrap_or(c),
            })
            .collect()
    }
}

impl Default for LocaleId {
    fn default() -> Self {
        Self::new("en")
    }
}

impl From<String> for LocaleId {
    fn from(tag: String) -> Self {
        Self::new(&tag)
    }
}

impl From<&str> for LocaleId {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<LocaleId> for String {
    fn from(locale: LocaleId) -> Self {
        locale.0
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
