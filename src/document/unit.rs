//! Text units, containers and segments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::coded_text::CodedText;
use crate::issues::IssueAnnotation;
use crate::locale::LocaleId;

/// Target property holding the approval state (`yes` when approved).
pub const PROP_APPROVED: &str = "approved";

/// Target property holding `start;end` of a hidden part of the content.
pub const PROP_HAS_HIDDEN_TEXT: &str = "hashiddentext";

/// A sentence-like subdivision of a container, paired across languages by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: String,
    pub text: CodedText,
}

impl Segment {
    pub fn new(id: &str, text: CodedText) -> Self {
        Self {
            id: id.to_string(),
            text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    #[default]
    Lf,
    Crlf,
    Cr,
    Nel,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::Crlf => "\r\n",
            LineBreak::Cr => "\r",
            LineBreak::Nel => "\u{0085}",
        }
    }
}

/// Storage-size constraint attached to a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSize {
    pub max_bytes: usize,
    #[serde(default = "default_storage_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub line_break: LineBreak,
}

fn default_storage_encoding() -> String {
    "UTF-8".to_string()
}

/// Out-of-band annotations attached to a container by the document layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Allowed-characters bracket expression, e.g. `[a-z ]`.
    pub allowed_characters: Option<String>,
    pub storage_size: Option<StorageSize>,
    /// Quality issues previously recorded on this container.
    pub issues: Vec<IssueAnnotation>,
}

/// An ordered sequence of segments plus properties and annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub segments: Vec<Segment>,
    pub properties: BTreeMap<String, String>,
    pub annotations: Annotations,
}

impl Container {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    /// A container with a single segment `0`.
    pub fn from_text(text: &str) -> Self {
        Self::from_coded(CodedText::from_text(text))
    }

    pub fn from_coded(text: CodedText) -> Self {
        Self::new(vec![Segment::new("0", text)])
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// All segments joined into one coded text.
    pub fn unsegmented(&self) -> CodedText {
        let mut joined = CodedText::new();
        for segment in &self.segments {
            joined.extend(&segment.text);
        }
        joined
    }

    pub fn has_text(&self) -> bool {
        self.segments.iter().any(|s| s.text.has_text())
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }
}

/// A translatable unit of content: one source and per-locale targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit {
    pub id: String,
    pub name: Option<String>,
    pub translatable: bool,
    pub source: Container,
    pub targets: BTreeMap<LocaleId, Container>,
}

impl TextUnit {
    pub fn new(id: &str, source: Container) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            translatable: true,
            source,
            targets: BTreeMap::new(),
        }
    }

    pub fn with_target(mut self, locale: &LocaleId, target: Container) -> Self {
        self.targets.insert(locale.clone(), target);
        self
    }

    pub fn target(&self, locale: &LocaleId) -> Option<&Container> {
        self.targets.get(locale)
    }

    pub fn target_mut(&mut self, locale: &LocaleId) -> Option<&mut Container> {
        self.targets.get_mut(locale)
    }

    pub fn set_target(&mut self, locale: &LocaleId, target: Container) {
        self.targets.insert(locale.clone(), target);
    }
}
