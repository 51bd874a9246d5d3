//! Pattern correspondences between source and target.
//!
//! A source-anchored rule requires every source match to have a
//! counterpart in the target: the same literal text (`<same>`) or a match
//! of the target regex. Matched counterparts are cut out of a working copy
//! of the other side, so three `%s` in the source need three in the target.
//! Target-anchored rules run the mirror algorithm.

use tracing::warn;

use super::{Checker, CheckerScope};
use crate::config::{PatternItem, SAME, compile_fancy_regex};
use crate::document::{CodedText, Segment, TextUnit};
use crate::error::ConfigError;
use crate::issues::{Issue, IssueBuilder, IssueType};
use crate::utils::{char_index, escape_controls};

struct CompiledPattern {
    item: PatternItem,
    anchor: fancy_regex::Regex,
    /// `None` for `<same>`.
    counterpart: Option<fancy_regex::Regex>,
}

pub struct PatternsChecker {
    scope: CheckerScope,
    patterns: Vec<CompiledPattern>,
}

impl PatternsChecker {
    pub fn start(scope: CheckerScope) -> Result<Self, ConfigError> {
        let mut patterns = Vec::new();
        for (index, item) in scope.params.patterns.iter().enumerate() {
            if !item.enabled {
                continue;
            }
            let context = format!("pattern '{}'", item.description);
            if item.anchor() == SAME {
                return Err(ConfigError::InvalidValue {
                    key: format!("patterns[{}]", index),
                    message: "the side the rule starts from cannot be <same>".to_string(),
                });
            }
            let anchor = compile_fancy_regex(item.anchor(), &context)?;
            let counterpart = if item.counterpart() == SAME {
                None
            } else {
                Some(compile_fancy_regex(item.counterpart(), &context)?)
            };
            patterns.push(CompiledPattern {
                item: item.clone(),
                anchor,
                counterpart,
            });
        }
        Ok(Self { scope, patterns })
    }

    fn check_segment(&self, tu: &TextUnit, src_seg: &Segment, trg_seg: &Segment, sink: &mut Vec<Issue>) {
        let texts = (src_seg.text.plain_text(), trg_seg.text.plain_text());

        for pattern in &self.patterns {
            let (anchor_text, other_text) = if pattern.item.from_source {
                (&src_seg.text, &trg_seg.text)
            } else {
                (&trg_seg.text, &src_seg.text)
            };
            for (start, end, part) in self.unmatched_parts(tu, pattern, anchor_text, other_text) {
                let (this_side, other_side) = if pattern.item.from_source {
                    ("source", "target")
                } else {
                    ("target", "source")
                };
                let message = if pattern.counterpart.is_none() {
                    format!(
                        "The {} part \"{}\" is not in the {} (from rule: {}).",
                        this_side,
                        escape_controls(&part),
                        other_side,
                        pattern.item.description
                    )
                } else {
                    format!(
                        "The {} part \"{}\" has no correspondence in the {} (from rule: {}).",
                        this_side,
                        escape_controls(&part),
                        other_side,
                        pattern.item.description
                    )
                };
                let builder = IssueBuilder::new(IssueType::UnexpectedPattern, pattern.item.severity, message)
                    .segment(Some(&src_seg.id))
                    .texts(texts.0.clone(), texts.1.clone());
                let builder = if pattern.item.from_source {
                    builder.source_span(start, end)
                } else {
                    builder.target_span(start, end)
                };
                self.scope.report(tu, builder, sink);
            }
        }
    }

    /// Anchor matches without a counterpart, as plain-text spans plus the
    /// matched text.
    fn unmatched_parts(
        &self,
        tu: &TextUnit,
        pattern: &CompiledPattern,
        anchor_text: &CodedText,
        other_text: &CodedText,
    ) -> Vec<(usize, usize, String)> {
        let coded = anchor_text.coded_text();
        let mut remaining = other_text.coded_text();
        let mut unmatched = Vec::new();

        for found in pattern.anchor.find_iter(&coded) {
            let m = match found {
                Ok(m) => m,
                Err(err) => {
                    warn!(
                        "Pattern '{}' skipped for text unit '{}': {}",
                        pattern.item.description, tu.id, err
                    );
                    return unmatched;
                }
            };
            if m.as_str().is_empty() {
                continue;
            }

            let counterpart = match &pattern.counterpart {
                None => remaining.find(m.as_str()).map(|pos| pos..pos + m.as_str().len()),
                Some(regex) => match regex.find(&remaining) {
                    Ok(found) => found.filter(|c| !c.as_str().is_empty()).map(|c| c.range()),
                    Err(err) => {
                        warn!(
                            "Pattern '{}' skipped for text unit '{}': {}",
                            pattern.item.description, tu.id, err
                        );
                        return unmatched;
                    }
                },
            };

            match counterpart {
                Some(range) => remaining.replace_range(range, ""),
                None => unmatched.push((
                    anchor_text.plain_offset(char_index(&coded, m.start())),
                    anchor_text.plain_offset(char_index(&coded, m.end())),
                    m.as_str().to_string(),
                )),
            }
        }
        unmatched
    }
}

impl Checker for PatternsChecker {
    fn scope(&self) -> &CheckerScope {
        &self.scope
    }

    fn scope_mut(&mut self) -> &mut CheckerScope {
        &mut self.scope
    }

    fn check_text_unit(&mut self, tu: &TextUnit, sink: &mut Vec<Issue>) {
        let Some(target) = tu.target(&self.scope.target_locale) else {
            return;
        };
        for src_seg in &tu.source.segments {
            if let Some(trg_seg) = target.segment(&src_seg.id) {
                self.check_segment(tu, src_seg, trg_seg, sink);
            }
        }
    }
}
