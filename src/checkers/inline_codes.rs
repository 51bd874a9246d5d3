//! Inline code correspondence between source and target segments.

use super::{Checker, CheckerScope};
use crate::document::{Code, Segment, TagType, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::utils::split_list;

pub struct InlineCodesChecker {
    scope: CheckerScope,
    types_to_ignore: Vec<String>,
}

impl InlineCodesChecker {
    pub fn start(scope: CheckerScope) -> Result<Self, ConfigError> {
        let types_to_ignore = split_list(&scope.params.types_to_ignore);
        Ok(Self {
            scope,
            types_to_ignore,
        })
    }

    fn relevant_codes(&self, segment: &Segment) -> Vec<Code> {
        segment
            .text
            .codes()
            .filter(|c| !self.types_to_ignore.contains(&c.kind))
            .cloned()
            .collect()
    }

    fn check_segment(&self, tu: &TextUnit, src_seg: &Segment, trg_seg: &Segment, sink: &mut Vec<Issue>) {
        let params = &self.scope.params;
        let src_codes = self.relevant_codes(src_seg);
        let trg_codes = self.relevant_codes(trg_seg);
        if src_codes.is_empty() && trg_codes.is_empty() {
            return;
        }

        let (missing, extra) = unpaired_codes(&src_codes, &trg_codes);
        let missing: Vec<Code> = missing
            .into_iter()
            .filter(|c| !params.missing_codes_allowed.contains(&c.display()))
            .collect();
        let extra: Vec<Code> = extra
            .into_iter()
            .filter(|c| !params.extra_codes_allowed.contains(&c.display()))
            .collect();

        let texts = (src_seg.text.plain_text(), trg_seg.text.plain_text());
        let reported = !missing.is_empty() || !extra.is_empty();

        if !missing.is_empty() {
            self.scope.report(
                tu,
                IssueBuilder::new(
                    IssueType::MissingCode,
                    DisplaySeverity::Medium,
                    format!("Missing codes in the target: {}", display_list(&missing)),
                )
                .segment(Some(&src_seg.id))
                .texts(texts.0.clone(), texts.1.clone())
                .codes(missing),
                sink,
            );
        }
        if !extra.is_empty() {
            self.scope.report(
                tu,
                IssueBuilder::new(
                    IssueType::ExtraCode,
                    DisplaySeverity::Medium,
                    format!("Extra codes in the target: {}", display_list(&extra)),
                )
                .segment(Some(&src_seg.id))
                .texts(texts.0.clone(), texts.1.clone())
                .codes(extra),
                sink,
            );
        }

        if !reported {
            let src_seq = open_close_sequence(&src_codes, params.guess_open_close);
            let trg_seq = open_close_sequence(&trg_codes, params.guess_open_close);
            if !follows_sequence(&src_seq, &trg_seq) {
                self.scope.report(
                    tu,
                    IssueBuilder::new(
                        IssueType::SuspectCode,
                        DisplaySeverity::Medium,
                        format!(
                            "Suspect sequence of opening and closing codes: \"{}\" in the source, \"{}\" in the target.",
                            symbols(&src_seq),
                            symbols(&trg_seq)
                        ),
                    )
                    .segment(Some(&src_seg.id))
                    .texts(texts.0, texts.1),
                    sink,
                );
            }
        }
    }
}

/// Greedily pairs codes across sides and returns what is left on each.
///
/// Abstract codes pair by id, tag type and type; codes with data pair by
/// identical data.
fn unpaired_codes(source: &[Code], target: &[Code]) -> (Vec<Code>, Vec<Code>) {
    let mut remaining: Vec<Option<&Code>> = target.iter().map(Some).collect();
    let mut missing = Vec::new();

    for code in source {
        let found = remaining.iter().position(|candidate| match candidate {
            Some(other) if code.is_abstract() => {
                other.is_abstract()
                    && other.id == code.id
                    && other.tag_type == code.tag_type
                    && other.kind == code.kind
            }
            Some(other) => !other.is_abstract() && other.data == code.data,
            None => false,
        });
        match found {
            Some(index) => remaining[index] = None,
            None => missing.push(code.clone()),
        }
    }

    let extra = remaining.into_iter().flatten().cloned().collect();
    (missing, extra)
}

/// Opening/closing symbols of a code list, placeholders dropped.
fn open_close_sequence(codes: &[Code], guess: bool) -> Vec<TagType> {
    codes
        .iter()
        .map(|code| match code.tag_type {
            TagType::Placeholder if guess => guess_tag_type(&code.data),
            other => other,
        })
        .filter(|tag_type| *tag_type != TagType::Placeholder)
        .collect()
}

/// Reclassifies a placeholder from its data: `</x>` closes, `<x>` opens.
fn guess_tag_type(data: &str) -> TagType {
    let data = data.trim();
    if data.starts_with("</") && data.ends_with('>') {
        TagType::Closing
    } else if data.starts_with('<')
        && data.ends_with('>')
        && !data.ends_with("/>")
        && !data.starts_with("<!")
        && !data.starts_with("<?")
    {
        TagType::Opening
    } else {
        TagType::Placeholder
    }
}

/// True when the target sequence yields every source symbol in order.
fn follows_sequence(source: &[TagType], target: &[TagType]) -> bool {
    let mut target = target.iter();
    source.iter().all(|symbol| target.next() == Some(symbol))
}

fn symbols(sequence: &[TagType]) -> String {
    sequence
        .iter()
        .map(|tag_type| match tag_type {
            TagType::Opening => 'O',
            TagType::Closing => 'C',
            TagType::Placeholder => 'P',
        })
        .collect()
}

fn display_list(codes: &[Code]) -> String {
    codes.iter().map(Code::display).collect::<Vec<_>>().join(", ")
}

impl Checker for InlineCodesChecker {
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
