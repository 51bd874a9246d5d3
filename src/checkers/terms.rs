//! Terminology verification against a bilingual glossary.
//!
//! The glossary is a tab-delimited file, one `source<TAB>target` pair per
//! line. An optional first line naming the locales of the columns (e.g.
//! `en-US<TAB>fr-FR`) selects the columns to use. Several lines with the
//! same source term list alternative translations.

use std::{fs, path::Path};

use super::CheckerScope;
use crate::document::coded_text::is_marker;
use crate::document::{CodedText, Segment, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::locale::LocaleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub source: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: Vec<TermEntry>,
    string_mode: bool,
    between_codes: bool,
}

impl Glossary {
    pub fn load(path: &Path, source: &LocaleId, target: &LocaleId) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Reference {
            kind: "terminology",
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&content, source, target))
    }

    pub fn parse(content: &str, source: &LocaleId, target: &LocaleId) -> Self {
        let mut lines = content
            .trim_start_matches('\u{FEFF}')
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .peekable();

        let (mut src_col, mut trg_col) = (0, 1);
        if let Some(first) = lines.peek()
            && let Some(columns) = locale_columns(first, source, target)
        {
            (src_col, trg_col) = columns;
            lines.next();
        }

        let mut entries: Vec<TermEntry> = Vec::new();
        for line in lines {
            let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
            let (Some(src), Some(trg)) = (columns.get(src_col), columns.get(trg_col)) else {
                continue;
            };
            if src.is_empty() || trg.is_empty() {
                continue;
            }
            match entries.iter_mut().find(|e| e.source == *src) {
                Some(entry) => entry.targets.push(trg.to_string()),
                None => entries.push(TermEntry {
                    source: src.to_string(),
                    targets: vec![trg.to_string()],
                }),
            }
        }
        Self {
            entries,
            ..Self::default()
        }
    }

    /// String mode searches terms as substrings (longest first) instead of
    /// token sequences. `between_codes` additionally requires the source
    /// term to sit between two inline codes.
    pub fn with_modes(mut self, string_mode: bool, between_codes: bool) -> Self {
        self.string_mode = string_mode;
        self.between_codes = between_codes;
        self
    }

    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub(crate) fn verify(
        &self,
        scope: &CheckerScope,
        tu: &TextUnit,
        src_seg: &Segment,
        trg_seg: &Segment,
        sink: &mut Vec<Issue>,
    ) {
        let found = if self.string_mode {
            self.string_matches(&src_seg.text, &trg_seg.text)
        } else {
            self.token_matches(scope, &src_seg.text, &trg_seg.text)
        };
        for (entry, start, end) in found {
            let message = format!(
                "The source term \"{}\" does not seem to be translated by \"{}\".",
                entry.source,
                entry.targets.join("\" or \"")
            );
            let builder = IssueBuilder::new(IssueType::Terminology, DisplaySeverity::Medium, message)
                .segment(Some(&src_seg.id))
                .source_span(start, end)
                .texts(src_seg.text.plain_text(), trg_seg.text.plain_text());
            scope.report(tu, builder, sink);
        }
    }

    /// Entries found in the source whose translations are all absent from
    /// the target, with the span of their first occurrence.
    fn token_matches(
        &self,
        scope: &CheckerScope,
        source: &CodedText,
        target: &CodedText,
    ) -> Vec<(&TermEntry, usize, usize)> {
        let src_tokens = tokenize(&scope.source_locale.to_lower(&source.plain_text()));
        let trg_tokens = tokenize(&scope.target_locale.to_lower(&target.plain_text()));
        let trg_words: Vec<&str> = trg_tokens.iter().map(|t| t.text.as_str()).collect();

        let mut found = Vec::new();
        for entry in &self.entries {
            let term = tokenize(&scope.source_locale.to_lower(&entry.source));
            let term: Vec<&str> = term.iter().map(|t| t.text.as_str()).collect();
            if term.is_empty() {
                continue;
            }
            let Some(first) = src_tokens
                .windows(term.len())
                .find(|window| window.iter().map(|t| t.text.as_str()).eq(term.iter().copied()))
            else {
                continue;
            };
            let translated = entry.targets.iter().any(|candidate| {
                let candidate = tokenize(&scope.target_locale.to_lower(candidate));
                let candidate: Vec<&str> = candidate.iter().map(|t| t.text.as_str()).collect();
                !candidate.is_empty() && trg_words.windows(candidate.len()).any(|w| w == candidate.as_slice())
            });
            if !translated {
                found.push((entry, first[0].start, first[first.len() - 1].end));
            }
        }
        found.sort_by_key(|(_, start, _)| *start);
        found
    }

    fn string_matches(&self, source: &CodedText, target: &CodedText) -> Vec<(&TermEntry, usize, usize)> {
        let coded: Vec<char> = source.coded_text().chars().collect();
        let trg_coded: Vec<char> = target.coded_text().chars().collect();

        let mut by_length: Vec<&TermEntry> = self.entries.iter().collect();
        by_length.sort_by_key(|e| std::cmp::Reverse(e.source.chars().count()));

        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut found = Vec::new();
        for entry in by_length {
            let term: Vec<char> = entry.source.chars().collect();
            let Some(start) = find_bounded(&coded, &term, self.between_codes, &claimed) else {
                continue;
            };
            claimed.push((start, start + term.len()));
            let translated = entry.targets.iter().any(|candidate| {
                let candidate: Vec<char> = candidate.chars().collect();
                find_bounded(&trg_coded, &candidate, false, &[]).is_some()
            });
            if !translated {
                found.push((
                    entry,
                    source.plain_offset(start),
                    source.plain_offset(start + term.len()),
                ));
            }
        }
        found.sort_by_key(|(_, start, _)| *start);
        found
    }
}

struct Token {
    text: String,
    start: usize,
    end: usize,
}

/// Whitespace-separated words with surrounding punctuation stripped, as
/// char spans of `text`.
fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos].is_whitespace() {
            pos += 1;
            continue;
        }
        let mut end = pos;
        while end < chars.len() && !chars[end].is_whitespace() {
            end += 1;
        }
        let mut start = pos;
        let mut stop = end;
        while start < stop && !chars[start].is_alphanumeric() {
            start += 1;
        }
        while stop > start && !chars[stop - 1].is_alphanumeric() {
            stop -= 1;
        }
        if start < stop {
            tokens.push(Token {
                text: chars[start..stop].iter().collect(),
                start,
                end: stop,
            });
        }
        pos = end;
    }
    tokens
}

/// First occurrence of `term` at word boundaries, outside `claimed` spans.
fn find_bounded(text: &[char], term: &[char], between_codes: bool, claimed: &[(usize, usize)]) -> Option<usize> {
    if term.is_empty() || term.len() > text.len() {
        return None;
    }
    (0..=text.len() - term.len()).find(|&start| {
        let end = start + term.len();
        if text[start..end] != *term {
            return false;
        }
        if claimed.iter().any(|(s, e)| start < *e && end > *s) {
            return false;
        }
        let before = start.checked_sub(1).map(|i| text[i]);
        let after = text.get(end).copied();
        if between_codes {
            before.is_some_and(is_marker) && after.is_some_and(is_marker)
        } else {
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        }
    })
}

/// Columns of the source and target locales when `line` is a locale header.
fn locale_columns(line: &str, source: &LocaleId, target: &LocaleId) -> Option<(usize, usize)> {
    let columns: Vec<LocaleId> = line
        .split('\t')
        .map(str::trim)
        .map(|tag| {
            let looks_like_locale = !tag.is_empty()
                && tag.len() <= 12
                && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            looks_like_locale.then(|| LocaleId::new(tag))
        })
        .collect::<Option<Vec<_>>>()?;
    let position = |wanted: &LocaleId| {
        columns
            .iter()
            .position(|c| c == wanted)
            .or_else(|| columns.iter().position(|c| c.same_language_as(wanted)))
    };
    Some((position(source)?, position(target)?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::checkers::test_support::*;
    use crate::document::TagType;

    fn en() -> LocaleId {
        LocaleId::new("en")
    }

    fn verify(glossary: &Glossary, tu: &TextUnit) -> Vec<Issue> {
        let scope = scope();
        let target = tu.target(&fr()).unwrap();
        let mut sink = Vec::new();
        glossary.verify(&scope, tu, &tu.source.segments[0], &target.segments[0], &mut sink);
        sink
    }

    #[test]
    fn test_parse_with_locale_header() {
        let glossary = Glossary::parse(
            "fr-FR\ten-US\nété\tsummer\nhiver\twinter\nsaison\tseason\nhivernal\twinter\n",
            &en(),
            &fr(),
        );
        assert_eq!(
            glossary.entries()[1],
            TermEntry {
                source: "winter".to_string(),
                targets: vec!["hiver".to_string(), "hivernal".to_string()],
            }
        );
        assert_eq!(glossary.entries().len(), 3);
    }

    #[test]
    fn test_parse_without_header() {
        let glossary = Glossary::parse("# comment\nsummer\tété\n\nbroken line\n", &en(), &fr());
        assert_eq!(glossary.entries().len(), 1);
        assert_eq!(glossary.entries()[0].source, "summer");
    }

    #[test]
    fn test_term_mode_is_case_insensitive() {
        let glossary = Glossary::parse("summer\tété\nwinter\thiver\n", &en(), &fr());
        let issues = verify(&glossary, &unit("summer and WINTER", "éTé et printemps"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type(), IssueType::Terminology);
        assert_eq!(issues[0].display_severity(), DisplaySeverity::Medium);
        assert_eq!(
            issues[0].message(),
            "The source term \"winter\" does not seem to be translated by \"hiver\"."
        );
        assert_eq!((issues[0].source_start(), issues[0].source_end()), (11, 17));
    }

    #[test]
    fn test_term_mode_multi_word_terms() {
        let glossary = Glossary::parse("hard disk\tdisque dur\n", &en(), &fr());
        assert!(verify(&glossary, &unit("Format the hard disk.", "Formatez le disque dur.")).is_empty());
        assert_eq!(verify(&glossary, &unit("Format the hard disk.", "Formatez le disque.")).len(), 1);
        assert!(verify(&glossary, &unit("A hard task on a disk.", "Une tâche.")).is_empty());
    }

    #[test]
    fn test_string_mode_longest_first() {
        let glossary = Glossary::parse("file\tfichier\nfile name\tnom de fichier\n", &en(), &fr())
            .with_modes(true, false);
        let issues = verify(&glossary, &unit("Enter the file name", "Entrez le nom du fichier"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message().contains("\"file name\""));

        assert!(verify(&glossary, &unit("Profiles", "Profils")).is_empty());
    }

    #[test]
    fn test_string_mode_between_codes() {
        let glossary = Glossary::parse("Save\tEnregistrer\n", &en(), &fr()).with_modes(true, true);
        assert!(verify(&glossary, &unit("Save the file", "Sauvez")).is_empty());

        let mut source = CodedText::new();
        source
            .append_text("Click ")
            .append_code(TagType::Opening, "b", "<b>")
            .append_text("Save")
            .append_code(TagType::Closing, "b", "</b>");
        let tu = TextUnit::new("1", crate::document::Container::from_coded(source))
            .with_target(&fr(), crate::document::Container::from_text("Cliquez sur Sauver"));
        let issues = verify(&glossary, &tu);
        assert_eq!(issues.len(), 1);
        assert_eq!((issues[0].source_start(), issues[0].source_end()), (6, 10));
    }
}
