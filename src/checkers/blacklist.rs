//! Forbidden terms.
//!
//! The blacklist is a tab-delimited file: `term<TAB>suggestion<TAB>comment`,
//! the last two columns optional. A term whose suggestion differs from it
//! only by case is matched case-sensitively (the list is then about casing);
//! every other term is matched ignoring case.

use std::{fs, path::Path};

use super::CheckerScope;
use crate::document::{Segment, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::locale::LocaleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub term: String,
    pub suggestion: String,
    pub comment: String,
    pub case_sensitive: bool,
    /// The chars searched for: the term, lowercased unless case-sensitive.
    search: Vec<char>,
}

impl BlacklistEntry {
    pub fn new(term: &str, suggestion: &str, comment: &str, locale: &LocaleId) -> Self {
        let case_sensitive = !suggestion.is_empty() && locale.to_upper(term) == locale.to_upper(suggestion);
        let search = if case_sensitive {
            term.chars().collect()
        } else {
            locale.to_lower(term).chars().collect()
        };
        Self {
            term: term.to_string(),
            suggestion: suggestion.to_string(),
            comment: comment.to_string(),
            case_sensitive,
            search,
        }
    }

    fn message(&self) -> String {
        let mut message = format!("The term \"{}\" is blacklisted.", self.term);
        if !self.suggestion.is_empty() {
            message.push_str(&format!(" Suggested replacement: \"{}\".", self.suggestion));
        }
        if !self.comment.is_empty() {
            message.push_str(&format!(" ({})", self.comment));
        }
        message
    }
}

#[derive(Debug, Clone)]
pub struct Blacklist {
    locale: LocaleId,
    entries: Vec<BlacklistEntry>,
}

impl Blacklist {
    pub fn load(path: &Path, locale: &LocaleId) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Reference {
            kind: "blacklist",
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&content, locale))
    }

    pub fn parse(content: &str, locale: &LocaleId) -> Self {
        let entries = content
            .trim_start_matches('\u{FEFF}')
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let mut columns = line.split('\t').map(str::trim);
                let term = columns.next().filter(|t| !t.is_empty())?;
                let suggestion = columns.next().unwrap_or_default();
                let comment = columns.next().unwrap_or_default();
                Some(BlacklistEntry::new(term, suggestion, comment, locale))
            })
            .collect();
        Self {
            locale: locale.clone(),
            entries,
        }
    }

    pub fn entries(&self) -> &[BlacklistEntry] {
        &self.entries
    }

    /// Occurrences of blacklisted terms in `text` as `(entry, start, end)`
    /// char spans, in text order. Overlapping occurrences keep the longer
    /// term.
    pub fn find(&self, text: &str, allow_sub: bool) -> Vec<(&BlacklistEntry, usize, usize)> {
        let exact: Vec<char> = text.chars().collect();
        let folded: Vec<char> = self.locale.to_lower(text).chars().collect();

        let mut by_length: Vec<&BlacklistEntry> = self.entries.iter().collect();
        by_length.sort_by_key(|e| std::cmp::Reverse(e.search.len()));

        let mut found: Vec<(&BlacklistEntry, usize, usize)> = Vec::new();
        for entry in by_length {
            let haystack = if entry.case_sensitive { &exact } else { &folded };
            let len = entry.search.len();
            if len == 0 || len > haystack.len() {
                continue;
            }
            for start in 0..=haystack.len() - len {
                let end = start + len;
                if haystack[start..end] != entry.search[..] {
                    continue;
                }
                if !allow_sub {
                    let before = start.checked_sub(1).map(|i| exact[i]);
                    let after = exact.get(end).copied();
                    if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric) {
                        continue;
                    }
                }
                if found.iter().any(|(_, s, e)| start < *e && end > *s) {
                    continue;
                }
                found.push((entry, start, end));
            }
        }
        found.sort_by_key(|(_, start, _)| *start);
        found
    }

    /// Reports blacklisted terms of one side of a segment pair.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn verify(
        &self,
        scope: &CheckerScope,
        tu: &TextUnit,
        src_seg: &Segment,
        trg_seg: &Segment,
        on_source: bool,
        allow_sub: bool,
        sink: &mut Vec<Issue>,
    ) {
        let src_plain = src_seg.text.plain_text();
        let trg_plain = trg_seg.text.plain_text();
        let text = if on_source { &src_plain } else { &trg_plain };

        for (entry, start, end) in self.find(text, allow_sub) {
            let builder = IssueBuilder::new(IssueType::Terminology, DisplaySeverity::Medium, entry.message())
                .segment(Some(&src_seg.id));
            let builder = if on_source {
                builder.source_span(start, end)
            } else {
                builder.target_span(start, end)
            };
            scope.report(tu, builder.texts(src_plain.clone(), trg_plain.clone()), sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::checkers::test_support::*;

    const LIST: &str = "BlackTerm1\tblackterm1\tcasing\nBlackTerm5\tWhiteTerm5\nblackterm6\n";

    fn blacklist() -> Blacklist {
        Blacklist::parse(LIST, &fr())
    }

    fn verify(blacklist: &Blacklist, tu: &TextUnit, on_source: bool, allow_sub: bool) -> Vec<Issue> {
        let scope = scope();
        let target = tu.target(&fr()).unwrap();
        let mut sink = Vec::new();
        blacklist.verify(
            &scope,
            tu,
            &tu.source.segments[0],
            &target.segments[0],
            on_source,
            allow_sub,
            &mut sink,
        );
        sink
    }

    #[test]
    fn test_case_sensitivity_from_suggestion() {
        let list = blacklist();
        assert!(list.entries()[0].case_sensitive);
        assert!(!list.entries()[1].case_sensitive);
        assert!(!list.entries()[2].case_sensitive);
    }

    #[test]
    fn test_blacklisted_terms_in_target() {
        let tu = unit(
            "source",
            "BlackTerm1 BLACKTerm1 BlackTerm5 BLACKTerm5 blackterm6 blackterm7.",
        );
        let issues = verify(&blacklist(), &tu, false, false);
        let spans: Vec<(i32, i32)> = issues.iter().map(|i| (i.target_start(), i.target_end())).collect();
        assert_eq!(spans, vec![(0, 10), (22, 32), (33, 43), (44, 54)]);
        assert_eq!(issues[0].issue_type(), IssueType::Terminology);
        assert_eq!(
            issues[0].message(),
            "The term \"BlackTerm1\" is blacklisted. Suggested replacement: \"blackterm1\". (casing)"
        );
        assert_eq!(issues[3].message(), "The term \"blackterm6\" is blacklisted.");
    }

    #[test]
    fn test_whole_words_only_unless_substrings_allowed() {
        let tu = unit("source", "RedBlackTerm1 BlackTerm1B");
        assert!(verify(&blacklist(), &tu, false, false).is_empty());
        assert_eq!(verify(&blacklist(), &tu, false, true).len(), 2);
    }

    #[test]
    fn test_source_side() {
        let tu = unit("Avoid blackterm6 here", "ok");
        let issues = verify(&blacklist(), &tu, true, false);
        assert_eq!(issues.len(), 1);
        assert_eq!((issues[0].source_start(), issues[0].source_end()), (6, 16));
        assert_eq!(issues[0].target_end(), -1);
    }
}
