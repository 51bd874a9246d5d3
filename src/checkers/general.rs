//! Segment-level sanity checks.
//!
//! Pairs source and target segments by id, then flags empty sides,
//! untranslated segments, doubled words and leading/trailing whitespace
//! differences.

use unicode_segmentation::UnicodeSegmentation;

use super::{Checker, CheckerScope};
use crate::config::{Parameters, compile_fancy_regex};
use crate::document::{Segment, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::utils::{contains_word_chars, is_white_space};

pub struct GeneralChecker {
    scope: CheckerScope,
    /// Source regexes of enabled `<same>`-target patterns, in table order.
    same_patterns: Vec<fancy_regex::Regex>,
    doubled_word_exceptions: Vec<String>,
}

impl GeneralChecker {
    pub fn start(scope: CheckerScope) -> Result<Self, ConfigError> {
        let params = &scope.params;
        let mut same_patterns = Vec::new();
        if params.target_same_as_source {
            for item in params.patterns.iter().filter(|p| p.enabled && p.target_is_same()) {
                if item.source_is_same() {
                    continue;
                }
                same_patterns.push(compile_fancy_regex(
                    &item.source,
                    &format!("pattern '{}'", item.description),
                )?);
            }
        }
        let doubled_word_exceptions = params
            .doubled_word_exceptions
            .split(';')
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Ok(Self {
            scope,
            same_patterns,
            doubled_word_exceptions,
        })
    }

    fn params(&self) -> &Parameters {
        &self.scope.params
    }

    fn check_segment(
        &self,
        tu: &TextUnit,
        src_seg: &Segment,
        trg_seg: &Segment,
        sink: &mut Vec<Issue>,
    ) {
        let params = self.params();
        let src_plain = src_seg.text.plain_text();
        let trg_plain = trg_seg.text.plain_text();

        if params.empty_target && trg_seg.text.is_empty() && !src_seg.text.is_empty() {
            self.scope.report(
                tu,
                IssueBuilder::new(
                    IssueType::EmptyTargetseg,
                    DisplaySeverity::High,
                    "The target segment is empty, but its source is not empty.",
                )
                .segment(Some(&src_seg.id))
                .texts(src_plain, ""),
                sink,
            );
            return;
        }

        if params.empty_source && src_seg.text.is_empty() && !trg_seg.text.is_empty() {
            self.scope.report(
                tu,
                IssueBuilder::new(
                    IssueType::EmptySourceseg,
                    DisplaySeverity::High,
                    "The target segment is not empty, but its source is empty.",
                )
                .segment(Some(&src_seg.id))
                .texts(src_plain, trg_plain),
                sink,
            );
            return;
        }

        if params.target_same_as_source
            && (params.target_same_as_source_for_same_language
                || !self.scope.source_locale.same_language_as(&self.scope.target_locale))
        {
            let coded = src_seg.text.coded_text();
            if contains_word_chars(&coded)
                && src_seg
                    .text
                    .same_content(&trg_seg.text, params.target_same_as_source_with_codes)
                && !self.is_expected_same(&coded)
            {
                self.scope.report(
                    tu,
                    IssueBuilder::new(
                        IssueType::TargetSameAsSource,
                        DisplaySeverity::Medium,
                        "Translation is the same as the source.",
                    )
                    .segment(Some(&src_seg.id))
                    .texts(src_plain.clone(), trg_plain.clone()),
                    sink,
                );
            }
        }

        if params.doubled_word {
            self.check_doubled_words(tu, src_seg, trg_seg, &src_plain, &trg_plain, sink);
        }
    }

    /// True when the whole source is something that stays untranslated
    /// (a URL, an email...) per the first `<same>` pattern matching it.
    fn is_expected_same(&self, coded: &str) -> bool {
        for regex in &self.same_patterns {
            if let Ok(Some(m)) = regex.find(coded) {
                return m.as_str() == coded;
            }
        }
        false
    }

    fn check_doubled_words(
        &self,
        tu: &TextUnit,
        src_seg: &Segment,
        trg_seg: &Segment,
        src_plain: &str,
        trg_plain: &str,
        sink: &mut Vec<Issue>,
    ) {
        let coded = trg_seg.text.coded_text();
        let mut previous: Option<&str> = None;
        let mut char_pos = 0;

        for (_, word) in coded.split_word_bound_indices() {
            let start = char_pos;
            char_pos += word.chars().count();

            if !word.chars().any(char::is_alphanumeric) {
                // Only spaces may sit between two repeated words ("many, many" is fine).
                if !word.chars().all(is_white_space) {
                    previous = None;
                }
                continue;
            }

            if previous == Some(word) {
                if !self.doubled_word_exceptions.contains(&word.to_lowercase()) {
                    self.scope.report(
                        tu,
                        IssueBuilder::new(
                            IssueType::SuspectPattern,
                            DisplaySeverity::High,
                            format!("Double word: \"{}\" found in the target.", word),
                        )
                        .segment(Some(&src_seg.id))
                        .target_span(
                            trg_seg.text.plain_offset(start),
                            trg_seg.text.plain_offset(char_pos),
                        )
                        .texts(src_plain, trg_plain),
                        sink,
                    );
                }
            } else {
                previous = Some(word);
            }
        }
    }

    fn check_whitespace(&self, tu: &TextUnit, src_plain: &str, trg_plain: &str, sink: &mut Vec<Issue>) {
        let src: Vec<char> = src_plain.chars().collect();
        let trg: Vec<char> = trg_plain.chars().collect();
        let params = self.params();

        if params.leading_ws {
            let source_side = (0..src.len()).map(|i| (i, i));
            let target_side = (0..trg.len()).map(|i| (i, i));
            if let Some((pos, differs)) = first_divergence(&src, &trg, source_side) {
                let (kind, message) = if differs {
                    (IssueType::MissingordiffLeadingws, "Missing or different leading white space")
                } else {
                    (IssueType::MissingLeadingws, "Missing leading white space")
                };
                self.report_ws(tu, kind, message, pos, true, src_plain, trg_plain, sink);
            }
            if let Some((pos, differs)) = first_divergence(&trg, &src, target_side) {
                let (kind, message) = if differs {
                    (IssueType::ExtraordiffLeadingws, "Extra or different leading white space")
                } else {
                    (IssueType::ExtraLeadingws, "Extra leading white space")
                };
                self.report_ws(tu, kind, message, pos, false, src_plain, trg_plain, sink);
            }
        }

        if params.trailing_ws {
            let (slen, tlen) = (src.len(), trg.len());
            let source_side = (0..slen).map(|k| (slen - 1 - k, tlen.wrapping_sub(1 + k)));
            let target_side = (0..tlen).map(|k| (tlen - 1 - k, slen.wrapping_sub(1 + k)));
            if let Some((pos, differs)) = first_divergence(&src, &trg, source_side) {
                let (kind, message) = if differs {
                    (IssueType::MissingordiffTrailingws, "Missing or different trailing white space")
                } else {
                    (IssueType::MissingTrailingws, "Missing trailing white space")
                };
                self.report_ws(tu, kind, message, pos, true, src_plain, trg_plain, sink);
            }
            if let Some((pos, differs)) = first_divergence(&trg, &src, target_side) {
                let (kind, message) = if differs {
                    (IssueType::ExtraordiffTrailingws, "Extra or different trailing white space")
                } else {
                    (IssueType::ExtraTrailingws, "Extra trailing white space")
                };
                self.report_ws(tu, kind, message, pos, false, src_plain, trg_plain, sink);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn report_ws(
        &self,
        tu: &TextUnit,
        kind: IssueType,
        message: &str,
        pos: usize,
        on_source: bool,
        src_plain: &str,
        trg_plain: &str,
        sink: &mut Vec<Issue>,
    ) {
        let builder = IssueBuilder::new(
            kind,
            DisplaySeverity::Low,
            format!("{} at position {}.", message, pos),
        )
        .texts(src_plain, trg_plain);
        let builder = if on_source {
            builder.source_span(pos, pos + 1)
        } else {
            builder.target_span(pos, pos + 1)
        };
        self.scope.report(tu, builder, sink);
    }
}

/// Walks the whitespace run of `this` through `(this_pos, other_pos)` pairs
/// and returns the first position where `other` diverges, with `true` when
/// `other` has whitespace there but a different char.
///
/// An out-of-range `other_pos` counts as "no corresponding char".
fn first_divergence(
    this: &[char],
    other: &[char],
    positions: impl Iterator<Item = (usize, usize)>,
) -> Option<(usize, bool)> {
    for (this_pos, other_pos) in positions {
        let c = this[this_pos];
        if !is_white_space(c) {
            return None;
        }
        match other.get(other_pos) {
            Some(&o) if is_white_space(o) => {
                if o != c {
                    return Some((this_pos, true));
                }
            }
            _ => return Some((this_pos, false)),
        }
    }
    None
}

impl Checker for GeneralChecker {
    fn scope(&self) -> &CheckerScope {
        &self.scope
    }

    fn scope_mut(&mut self) -> &mut CheckerScope {
        &mut self.scope
    }

    fn check_text_unit(&mut self, tu: &TextUnit, sink: &mut Vec<Issue>) {
        let Some(target) = tu.target(&self.scope.target_locale) else {
            if self.scope.multilingual {
                self.scope.report(
                    tu,
                    IssueBuilder::new(
                        IssueType::MissingTargettu,
                        DisplaySeverity::High,
                        "Missing translation.",
                    )
                    .texts(tu.source.unsegmented().plain_text(), ""),
                    sink,
                );
            }
            return;
        };

        for src_seg in &tu.source.segments {
            let Some(trg_seg) = target.segment(&src_seg.id) else {
                self.scope.report(
                    tu,
                    IssueBuilder::new(
                        IssueType::MissingTargetseg,
                        DisplaySeverity::High,
                        "The source segment has no corresponding target segment.",
                    )
                    .segment(Some(&src_seg.id))
                    .texts(src_seg.text.plain_text(), ""),
                    sink,
                );
                continue;
            };
            self.check_segment(tu, src_seg, trg_seg, sink);
        }

        for trg_seg in &target.segments {
            if tu.source.segment(&trg_seg.id).is_none() {
                self.scope.report(
                    tu,
                    IssueBuilder::new(
                        IssueType::ExtraTargetseg,
                        DisplaySeverity::High,
                        format!("Extra target segment (id={}).", trg_seg.id),
                    )
                    .segment(Some(&trg_seg.id))
                    .texts("", trg_seg.text.plain_text()),
                    sink,
                );
            }
        }

        let src_plain = tu.source.unsegmented().plain_text();
        let trg_plain = target.unsegmented().plain_text();
        self.check_whitespace(tu, &src_plain, &trg_plain, sink);
    }
}
