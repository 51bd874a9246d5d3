//! Grammar and spelling checks through a LanguageTool-compatible server.
//!
//! [`GrammarService`] is the seam: [`LanguageToolClient`] talks HTTP, tests
//! plug in their own implementation. A failing service is reported once,
//! as a high-severity issue with the `-99` source-end sentinel, and is then
//! left alone for the rest of the run.

use serde::Deserialize;
use tracing::warn;

use super::CheckerScope;
use crate::document::{Segment, TextUnit};
use crate::error::ServiceError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType, NO_END, SERVICE_FAILURE_END};
use crate::locale::LocaleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRequest<'a> {
    pub language: String,
    pub text: &'a str,
    /// Source text and its language, in bilingual mode.
    pub source: Option<(String, &'a str)>,
}

/// One finding of the service. Offsets are chars into the request text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarMatch {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    pub replacements: Vec<String>,
}

pub trait GrammarService {
    fn check(&mut self, request: &GrammarRequest<'_>) -> Result<Vec<GrammarMatch>, ServiceError>;
}

// ============================================================
// LanguageTool HTTP client
// ============================================================

pub struct LanguageToolClient {
    client: reqwest::blocking::Client,
    check_url: String,
    username: String,
    api_key: String,
}

#[derive(Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<ResponseMatch>,
}

#[derive(Deserialize)]
struct ResponseMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Deserialize)]
struct Replacement {
    value: String,
}

impl LanguageToolClient {
    pub fn new(server_url: &str, username: &str, api_key: &str) -> Result<Self, ServiceError> {
        let mut base = server_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let check_url = format!("{}v2/check", base);
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|source| ServiceError::Http {
                url: check_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            check_url,
            username: username.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl GrammarService for LanguageToolClient {
    fn check(&mut self, request: &GrammarRequest<'_>) -> Result<Vec<GrammarMatch>, ServiceError> {
        let mut form: Vec<(&str, &str)> = vec![("language", request.language.as_str()), ("text", request.text)];
        if let Some((language, text)) = &request.source {
            form.push(("srcText", *text));
            form.push(("motherTongue", language.as_str()));
        }
        if !self.username.is_empty() && !self.api_key.is_empty() {
            form.push(("username", self.username.as_str()));
            form.push(("apiKey", self.api_key.as_str()));
        }

        let response = self
            .client
            .post(&self.check_url)
            .form(&form)
            .send()
            .map_err(|source| ServiceError::Http {
                url: self.check_url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(ServiceError::Status {
                url: self.check_url.clone(),
                status: response.status().as_u16(),
            });
        }
        let body: CheckResponse = response.json().map_err(|source| ServiceError::Response {
            url: self.check_url.clone(),
            source,
        })?;

        Ok(body
            .matches
            .into_iter()
            .map(|m| {
                let offset = utf16_to_char_offset(request.text, m.offset);
                let end = utf16_to_char_offset(request.text, m.offset + m.length);
                GrammarMatch {
                    message: m.message,
                    offset,
                    length: end - offset,
                    replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                }
            })
            .collect())
    }
}

/// The server counts UTF-16 code units.
fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, c) in text.chars().enumerate() {
        if units >= utf16_offset {
            return index;
        }
        units += c.len_utf16();
    }
    text.chars().count()
}

/// Language code as the server expects it, e.g. `fr-FR`.
fn service_language(locale: &LocaleId) -> String {
    match locale.region() {
        Some(region) => format!("{}-{}", locale.language(), region.to_uppercase()),
        None => locale.language().to_string(),
    }
}

// ============================================================
// Grammar check
// ============================================================

pub(crate) struct GrammarCheck {
    service: Option<Box<dyn GrammarService>>,
    bilingual: bool,
}

impl GrammarCheck {
    pub(crate) fn new(service: Box<dyn GrammarService>, bilingual: bool) -> Self {
        Self {
            service: Some(service),
            bilingual,
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    pub(crate) fn verify(
        &mut self,
        scope: &CheckerScope,
        tu: &TextUnit,
        src_seg: &Segment,
        trg_seg: &Segment,
        sink: &mut Vec<Issue>,
    ) {
        let Some(service) = self.service.as_mut() else {
            return;
        };
        let src_plain = src_seg.text.plain_text();
        let trg_plain = trg_seg.text.plain_text();
        if trg_plain.trim().is_empty() {
            return;
        }

        let request = GrammarRequest {
            language: service_language(&scope.target_locale),
            text: &trg_plain,
            source: self
                .bilingual
                .then(|| (service_language(&scope.source_locale), src_plain.as_str())),
        };
        match service.check(&request) {
            Ok(matches) => {
                for m in matches {
                    let mut message = m.message;
                    if !m.replacements.is_empty() {
                        let shown: Vec<&str> = m.replacements.iter().take(3).map(String::as_str).collect();
                        message.push_str(&format!(" Suggestions: {}", shown.join(", ")));
                    }
                    let builder = IssueBuilder::new(IssueType::LanguagetoolError, DisplaySeverity::Medium, message)
                        .segment(Some(&src_seg.id))
                        .target_span(m.offset, m.offset + m.length)
                        .texts(src_plain.clone(), trg_plain.clone());
                    scope.report(tu, builder, sink);
                }
            }
            Err(err) => {
                warn!("Grammar checks disabled for the rest of the run: {}", err);
                let builder = IssueBuilder::new(
                    IssueType::LanguagetoolError,
                    DisplaySeverity::High,
                    format!(
                        "Error with the grammar-checking server. Grammar checks are skipped from this text unit on. {}",
                        err
                    ),
                )
                .segment(Some(&src_seg.id))
                .raw_spans((0, SERVICE_FAILURE_END), (0, NO_END))
                .texts(src_plain, trg_plain);
                scope.report(tu, builder, sink);
                self.service = None;
            }
        }
    }
}
