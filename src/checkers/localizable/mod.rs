//! Dates, times and numbers that must survive localization.
//!
//! Every date, time and number found in the source is parsed with the
//! source locale's conventions, every one in the target with the target
//! locale's. A source value with no equal value in the target is reported:
//! it was either dropped or left in the source locale's format.
//!
//! ## Module Structure
//!
//! - `formats`: per-locale patterns, names and separators
//! - `parse`: pattern and number parsers

mod formats;
mod parse;

use std::collections::HashSet;

use self::formats::LocaleFormats;
use self::parse::{DatePattern, Value, parse_number};
use super::{Checker, CheckerScope};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::utils::is_white_space;

#[derive(Debug, Clone, PartialEq)]
struct Localizable {
    value: Value,
    original: String,
    position: usize,
}

impl Localizable {
    fn len(&self) -> usize {
        self.original.chars().count()
    }

    /// Whether `pos` falls inside this match or right after it.
    fn covers(&self, pos: usize) -> bool {
        pos >= self.position && pos <= self.position + self.len()
    }
}

/// The parsers of one locale, compiled once.
struct LocaleParsers {
    formats: &'static LocaleFormats,
    dates: Vec<DatePattern>,
    times: Vec<DatePattern>,
}

impl LocaleParsers {
    fn new(formats: &'static LocaleFormats) -> Self {
        Self {
            formats,
            dates: formats.dates.iter().map(|p| DatePattern::compile(p, formats)).collect(),
            times: formats.times.iter().map(|p| DatePattern::compile(p, formats)).collect(),
        }
    }

    /// All localizables of `text`, dates first, then times outside dates,
    /// then numbers outside both.
    fn find_all(&self, text: &str) -> Vec<Localizable> {
        let chars: Vec<char> = text.chars().collect();
        let mut found = Vec::new();

        for pattern in &self.dates {
            scan(&chars, &mut found, |pos| pattern.parse_at(&chars, pos), |_| false);
        }
        let dates = found.clone();
        for pattern in &self.times {
            scan(
                &chars,
                &mut found,
                |pos| pattern.parse_at(&chars, pos),
                |pos| dates.iter().any(|d| d.covers(pos)),
            );
        }
        let claimed = found.clone();
        scan(
            &chars,
            &mut found,
            |pos| parse_number(&chars, pos, self.formats),
            |pos| claimed.iter().any(|l| l.covers(pos)),
        );
        found.sort_by_key(|l| l.position);
        found
    }
}

/// Walks `chars`, recording each parse not already known by value.
fn scan(
    chars: &[char],
    found: &mut Vec<Localizable>,
    parse: impl Fn(usize) -> Option<(usize, Value)>,
    skip: impl Fn(usize) -> bool,
) {
    let mut pos = 0;
    while pos < chars.len() {
        if is_white_space(chars[pos]) || skip(pos) {
            pos += 1;
            continue;
        }
        match parse(pos) {
            Some((end, value)) if end > pos => {
                if !found.iter().any(|l| l.value == value) {
                    found.push(Localizable {
                        value,
                        original: chars[pos..end].iter().collect(),
                        position: pos,
                    });
                }
                pos = end;
            }
            _ => pos += 1,
        }
    }
}

pub struct LocalizableChecker {
    scope: CheckerScope,
    source: LocaleParsers,
    target: LocaleParsers,
}

impl LocalizableChecker {
    pub fn start(scope: CheckerScope) -> Result<Self, ConfigError> {
        let source = LocaleParsers::new(formats::for_locale(&scope.source_locale));
        let target = LocaleParsers::new(formats::for_locale(&scope.target_locale));
        Ok(Self { scope, source, target })
    }
}

impl Checker for LocalizableChecker {
    fn scope(&self) -> &CheckerScope {
        &self.scope
    }

    fn scope_mut(&mut self) -> &mut CheckerScope {
        &mut self.scope
    }

    fn check_text_unit(&mut self, tu: &crate::document::TextUnit, sink: &mut Vec<Issue>) {
        let Some(target) = tu.target(&self.scope.target_locale) else {
            return;
        };
        if !tu.source.has_text() || !target.has_text() {
            return;
        }
        let src_plain = tu.source.unsegmented().plain_text();
        let trg_plain = target.unsegmented().plain_text();

        let in_target: HashSet<Value> = self
            .target
            .find_all(&trg_plain)
            .into_iter()
            .map(|l| l.value)
            .collect();

        for localizable in self.source.find_all(&src_plain) {
            if in_target.contains(&localizable.value) {
                continue;
            }
            let issue_type = match localizable.value {
                Value::Number(_) => IssueType::SuspectNumber,
                Value::Date(_) | Value::Time(_) => IssueType::SuspectDateTime,
            };
            let builder = IssueBuilder::new(
                issue_type,
                DisplaySeverity::Medium,
                format!(
                    "Number, date or time may be missing or not properly localized: '{}'",
                    localizable.original
                ),
            )
            .source_span(localizable.position, localizable.position + localizable.len())
            .texts(src_plain.clone(), trg_plain.clone());
            self.scope.report(tu, builder, sink);
        }
    }
}
