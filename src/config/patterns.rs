//! Pattern rules: pairs of regexes that must correspond across languages.

use serde::{Deserialize, Serialize};

use crate::issues::DisplaySeverity;

/// Sentinel meaning "the matched text must appear unchanged on the other side".
pub const SAME: &str = "<same>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternItem {
    pub source: String,
    pub target: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: DisplaySeverity,
    #[serde(default = "default_enabled")]
    pub from_source: bool,
    #[serde(default)]
    pub description: String,
}

fn default_enabled() -> bool {
    true
}

fn default_severity() -> DisplaySeverity {
    DisplaySeverity::Medium
}

impl PatternItem {
    pub fn new(
        source: &str,
        target: &str,
        from_source: bool,
        severity: DisplaySeverity,
        description: &str,
    ) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            enabled: true,
            severity,
            from_source,
            description: description.to_string(),
        }
    }

    pub fn source_is_same(&self) -> bool {
        self.source == SAME
    }

    pub fn target_is_same(&self) -> bool {
        self.target == SAME
    }

    /// The regex driving the search: the source side for source-anchored
    /// rules, the target side otherwise.
    pub fn anchor(&self) -> &str {
        if self.from_source {
            &self.source
        } else {
            &self.target
        }
    }

    /// The other side: a regex, or [`SAME`].
    pub fn counterpart(&self) -> &str {
        if self.from_source {
            &self.target
        } else {
            &self.source
        }
    }
}

/// The default pattern table.
pub fn default_patterns() -> Vec<PatternItem> {
    use DisplaySeverity::{High, Low, Medium};

    vec![
        PatternItem::new(r"[(\x{FF08}]", r"[(\x{FF08}]", true, Low, "Opening parenthesis"),
        PatternItem::new(r"[)\x{FF09}]", r"[)\x{FF09}]", true, Low, "Closing parenthesis"),
        PatternItem::new(
            r"(?![()\x{FF08}\x{FF09}])[\p{Ps}\p{Pe}]",
            SAME,
            true,
            Low,
            "Bracketing characters (except parentheses)",
        ),
        PatternItem::new(r"[\w.\-]+@[\w.\-]+", SAME, true, Medium, "Email addresses"),
        PatternItem::new(
            r"https?:[\w/.:;+\-~%#$?=&,()]+[\w/:;+\-~%#$?=&,()]+|www\.[\w/.:;+\-~%#$?=&,()]+|ftp:[\w/.:;+\-~%#?=&,]+",
            SAME,
            true,
            Medium,
            "URLs",
        ),
        PatternItem::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b", SAME, true, High, "IP addresses"),
        PatternItem::new(
            r"%(([-0+#]?)[-0+#]?)((\d\$)?)(([\d*]*)(\.[\d*]*)?)[dioxXucsfeEgGpn]",
            SAME,
            true,
            High,
            "C-style printf codes",
        ),
        PatternItem::new(
            SAME,
            r"([\p{Ll}\p{Lu}\p{Lt}\p{Lo}])\1\1",
            false,
            Medium,
            "Tripled letter",
        ),
    ]
}
