//! Text interleaved with inline codes.
//!
//! A [`CodedText`] has three projections:
//!
//! - **plain**: the text alone, codes removed. All issue offsets address it.
//! - **coded**: the text with one private-use marker char per code, so regexes
//!   can run without ever matching inside code data.
//! - **display**: the text with each code rendered as its literal data.

use serde::{Deserialize, Serialize};

/// Marker char standing for an opening code in the coded projection.
pub const MARKER_OPENING: char = '\u{E101}';
/// Marker char standing for a closing code in the coded projection.
pub const MARKER_CLOSING: char = '\u{E102}';
/// Marker char standing for a placeholder code in the coded projection.
pub const MARKER_PLACEHOLDER: char = '\u{E103}';

pub fn is_marker(c: char) -> bool {
    matches!(c, MARKER_OPENING | MARKER_CLOSING | MARKER_PLACEHOLDER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Opening,
    Closing,
    Placeholder,
}

impl TagType {
    fn marker(self) -> char {
        match self {
            TagType::Opening => MARKER_OPENING,
            TagType::Closing => MARKER_CLOSING,
            TagType::Placeholder => MARKER_PLACEHOLDER,
        }
    }
}

/// An inline code: a formatting tag or placeholder embedded in text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code {
    pub id: i32,
    pub tag_type: TagType,
    /// Type tag, e.g. `bold` or `link`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Literal data, e.g. `<b>`. Empty for abstract codes.
    #[serde(default)]
    pub data: String,
}

impl Code {
    pub fn new(id: i32, tag_type: TagType, kind: &str, data: &str) -> Self {
        Self {
            id,
            tag_type,
            kind: kind.to_string(),
            data: data.to_string(),
        }
    }

    /// Codes without literal data are matched by id and type.
    pub fn is_abstract(&self) -> bool {
        self.data.is_empty()
    }

    /// Codes as shown to users: their data, or a synthetic tag for abstract codes.
    pub fn display(&self) -> String {
        if !self.is_abstract() {
            return self.data.clone();
        }
        match self.tag_type {
            TagType::Opening => format!("<{}:{}>", self.kind, self.id),
            TagType::Closing => format!("</{}:{}>", self.kind, self.id),
            TagType::Placeholder => format!("<{}:{}/>", self.kind, self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Code(Code),
}

/// A run of text with inline codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodedText {
    fragments: Vec<Fragment>,
    next_id: i32,
    open_stack: Vec<(String, i32)>,
}

impl CodedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut coded = Self::new();
        coded.append_text(text);
        coded
    }

    pub fn append_text(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if let Some(Fragment::Text(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(Fragment::Text(text.to_string()));
        }
        self
    }

    /// Appends a code with an automatically assigned id.
    ///
    /// Opening and placeholder codes get the next free id; a closing code
    /// reuses the id of the innermost unclosed opening code of the same type.
    pub fn append_code(&mut self, tag_type: TagType, kind: &str, data: &str) -> &mut Self {
        let id = match tag_type {
            TagType::Opening => {
                let id = self.take_id();
                self.open_stack.push((kind.to_string(), id));
                id
            }
            TagType::Closing => {
                match self.open_stack.iter().rposition(|(k, _)| k == kind) {
                    Some(pos) => self.open_stack.remove(pos).1,
                    None => self.take_id(),
                }
            }
            TagType::Placeholder => self.take_id(),
        };
        self.push_code(Code::new(id, tag_type, kind, data))
    }

    /// Appends a code with an explicit id.
    pub fn push_code(&mut self, code: Code) -> &mut Self {
        self.next_id = self.next_id.max(code.id);
        self.fragments.push(Fragment::Code(code));
        self
    }

    fn take_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn codes(&self) -> impl Iterator<Item = &Code> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Code(code) => Some(code),
            Fragment::Text(_) => None,
        })
    }

    pub fn has_codes(&self) -> bool {
        self.codes().next().is_some()
    }

    /// True when there is neither text nor codes.
    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| match f {
            Fragment::Text(text) => text.is_empty(),
            Fragment::Code(_) => false,
        })
    }

    /// True when there is at least one char of text, whitespace included.
    pub fn has_text(&self) -> bool {
        self.fragments
            .iter()
            .any(|f| matches!(f, Fragment::Text(text) if !text.is_empty()))
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            if let Fragment::Text(text) = fragment {
                out.push_str(text);
            }
        }
        out
    }

    pub fn coded_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Code(code) => out.push(code.tag_type.marker()),
            }
        }
        out
    }

    pub fn display_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Code(code) => out.push_str(&code.display()),
            }
        }
        out
    }

    /// Maps a char offset in the coded projection to the plain projection.
    pub fn plain_offset(&self, coded_offset: usize) -> usize {
        let mut coded = 0;
        let mut plain = 0;
        for fragment in &self.fragments {
            if coded >= coded_offset {
                break;
            }
            match fragment {
                Fragment::Text(text) => {
                    let len = text.chars().count();
                    let take = len.min(coded_offset - coded);
                    coded += take;
                    plain += take;
                }
                Fragment::Code(_) => coded += 1,
            }
        }
        plain
    }

    /// Compares content, optionally taking code data into account.
    pub fn same_content(&self, other: &CodedText, code_sensitive: bool) -> bool {
        if !code_sensitive {
            return self.plain_text() == other.plain_text();
        }
        self.coded_text() == other.coded_text()
            && self
                .codes()
                .map(|c| c.data.as_str())
                .eq(other.codes().map(|c| c.data.as_str()))
    }

    /// Appends every fragment of `other`.
    pub fn extend(&mut self, other: &CodedText) {
        for fragment in &other.fragments {
            match fragment {
                Fragment::Text(text) => {
                    self.append_text(text);
                }
                Fragment::Code(code) => {
                    self.push_code(code.clone());
                }
            }
        }
    }
}
