//! Tab-delimited bilingual files: `id<TAB>source[<TAB>target]` per line.
//!
//! Lines starting with `#` and blank lines are skipped. `\n`, `\r`, `\t` and
//! `\\` escapes are decoded in the text columns. A line without a target
//! column yields a unit without a target.

use super::{Filter, read_content};
use crate::document::{Container, Event, RawDocument, StartDocument, TextUnit};
use crate::error::FilterError;
use crate::locale::LocaleId;

pub struct TsvFilter;

impl Filter for TsvFilter {
    fn config_id(&self) -> &str {
        "tsv"
    }

    fn extensions(&self) -> &[&str] {
        &["tsv", "tab"]
    }

    fn read(&self, document: &RawDocument) -> Result<Vec<Event>, FilterError> {
        let content = read_content(document)?;
        parse_document(&content, &document.input_uri, &document.target_locale)
    }
}

pub fn parse_document(
    content: &str,
    name: &str,
    target_locale: &LocaleId,
) -> Result<Vec<Event>, FilterError> {
    let mut events = vec![Event::StartDocument(StartDocument {
        name: name.to_string(),
        multilingual: true,
    })];

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 2 || columns.len() > 3 {
            return Err(FilterError::Malformed {
                path: name.to_string(),
                line: index + 1,
                message: format!("expected 2 or 3 columns, found {}", columns.len()),
            });
        }
        let mut unit = TextUnit::new(columns[0], Container::from_text(&unescape(columns[1])));
        if let Some(target) = columns.get(2) {
            unit.set_target(target_locale, Container::from_text(&unescape(target)));
        }
        events.push(Event::TextUnit(unit));
    }

    events.push(Event::EndDocument);
    Ok(events)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
