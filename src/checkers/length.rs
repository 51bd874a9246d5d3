//! Length checks.
//!
//! Ratio-based checks compare target and source char counts (codes
//! excluded) against a percentage picked by the source length. A
//! storage-size annotation caps the encoded byte length of a container.

use tracing::warn;

use super::{Checker, CheckerScope};
use crate::charset::Charset;
use crate::document::{Container, StorageSize, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::utils::char_len;

pub struct LengthChecker {
    scope: CheckerScope,
}

impl LengthChecker {
    pub fn start(scope: CheckerScope) -> Result<Self, ConfigError> {
        let params = &scope.params;
        for (key, value) in [
            ("maxCharLengthAbove", params.max_char_length_above),
            ("maxCharLengthBelow", params.max_char_length_below),
            ("minCharLengthAbove", params.min_char_length_above),
            ("minCharLengthBelow", params.min_char_length_below),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "the percentage must be greater than zero".to_string(),
                });
            }
        }
        Ok(Self { scope })
    }

    fn check_ratios(&self, tu: &TextUnit, src_plain: &str, trg_plain: &str, sink: &mut Vec<Issue>) {
        let params = &self.scope.params;
        let src_len = char_len(src_plain);
        let trg_len = char_len(trg_plain);

        if src_len > 0 {
            let percent = (trg_len as f64 * 100.0) / src_len as f64;

            if params.check_max_char_length {
                let limit = if src_len <= params.max_char_length_break {
                    params.max_char_length_below
                } else {
                    params.max_char_length_above
                };
                if trg_len * 100 > limit * src_len {
                    self.scope.report(
                        tu,
                        IssueBuilder::new(
                            IssueType::TargetLength,
                            DisplaySeverity::Low,
                            format!(
                                "The target is suspiciously longer than its source ({:.2}% of the source).",
                                percent
                            ),
                        )
                        .texts(src_plain, trg_plain),
                        sink,
                    );
                }
            }

            if params.check_min_char_length {
                let limit = if src_len <= params.min_char_length_break {
                    params.min_char_length_below
                } else {
                    params.min_char_length_above
                };
                if trg_len * 100 < limit * src_len {
                    self.scope.report(
                        tu,
                        IssueBuilder::new(
                            IssueType::TargetLength,
                            DisplaySeverity::Low,
                            format!(
                                "The target is suspiciously shorter than its source ({:.2}% of the source).",
                                percent
                            ),
                        )
                        .texts(src_plain, trg_plain),
                        sink,
                    );
                }
            }
        }

        if params.check_absolute_max_char_length && trg_len > params.absolute_max_char_length {
            self.scope.report(
                tu,
                IssueBuilder::new(
                    IssueType::TargetLength,
                    DisplaySeverity::High,
                    format!(
                        "The target is longer than {} characters ({} characters).",
                        params.absolute_max_char_length, trg_len
                    ),
                )
                .texts(src_plain, trg_plain),
                sink,
            );
        }
    }

    fn check_storage_size(
        &self,
        tu: &TextUnit,
        container: &Container,
        is_source: bool,
        texts: (&str, &str),
        sink: &mut Vec<Issue>,
    ) {
        let Some(StorageSize {
            max_bytes,
            encoding,
            line_break,
        }) = &container.annotations.storage_size
        else {
            return;
        };
        let charset = match Charset::for_name(encoding) {
            Ok(charset) => charset,
            Err(err) => {
                warn!("Storage size not checked for text unit '{}': {}", tu.id, err);
                return;
            }
        };
        let text = container
            .unsegmented()
            .plain_text()
            .replace('\n', line_break.as_str());

        let span_len = char_len(if is_source { texts.0 } else { texts.1 });
        let builder = match charset.encoded_len(&text) {
            Ok(len) if len > *max_bytes => IssueBuilder::new(
                IssueType::TargetLength,
                DisplaySeverity::High,
                format!(
                    "Number of bytes exceeded by {}: the storage size is {} bytes in {}, the text needs {}.",
                    len - max_bytes,
                    max_bytes,
                    encoding,
                    len
                ),
            ),
            Ok(_) => return,
            Err(bad) => IssueBuilder::new(
                IssueType::AllowedCharacters,
                DisplaySeverity::High,
                format!(
                    "The character '{}' (U+{:04X}) cannot be stored in {}.",
                    bad, bad as u32, encoding
                ),
            ),
        };
        let builder = if is_source {
            builder.source_span(0, span_len)
        } else {
            builder.target_span(0, span_len)
        };
        self.scope.report(tu, builder.texts(texts.0, texts.1), sink);
    }
}

impl Checker for LengthChecker {
    fn scope(&self) -> &CheckerScope {
        &self.scope
    }

    fn scope_mut(&mut self) -> &mut CheckerScope {
        &mut self.scope
    }

    fn check_text_unit(&mut self, tu: &TextUnit, sink: &mut Vec<Issue>) {
        let src_plain = tu.source.unsegmented().plain_text();
        let target = tu.target(&self.scope.target_locale);
        let trg_plain = target
            .map(|t| t.unsegmented().plain_text())
            .unwrap_or_default();

        if let Some(target) = target {
            self.check_ratios(tu, &src_plain, &trg_plain, sink);
            if self.scope.params.check_storage_size {
                self.check_storage_size(tu, target, false, (&src_plain, &trg_plain), sink);
            }
        }
        if self.scope.params.check_storage_size {
            self.check_storage_size(tu, &tu.source, true, (&src_plain, &trg_plain), sink);
        }
    }
}
