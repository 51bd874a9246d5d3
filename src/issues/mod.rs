//! Issue model for translation quality checks.
//!
//! An [`Issue`] is one finding: what is wrong, where (document, sub-document,
//! text unit, segment, offsets), how bad, and whether the user suppressed it.
//! Every issue carries a content-derived signature so a suppression survives
//! the issue being recreated from scratch on the next recheck.

mod ordering;
mod signature;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Code;

pub use ordering::{IssueComparator, SortDirection, SortKey};
pub use signature::{SIGNATURE_VERSION, compute_signature};

/// End offset meaning "no span".
pub const NO_END: i32 = -1;

/// `source_end` value marking a grammar-service failure.
pub const SERVICE_FAILURE_END: i32 = -99;

// ============================================================
// Severity
// ============================================================

pub const SEVERITY_LOW: f64 = 1.0;
pub const SEVERITY_MEDIUM: f64 = 50.0;
pub const SEVERITY_HIGH: f64 = 100.0;

/// Three-bucket classification of the continuous 0-100 severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySeverity {
    Low,
    Medium,
    High,
}

impl DisplaySeverity {
    pub fn from_severity(severity: f64) -> Self {
        if severity < 33.33 {
            DisplaySeverity::Low
        } else if severity < 66.33 {
            DisplaySeverity::Medium
        } else {
            DisplaySeverity::High
        }
    }

    pub fn to_severity(self) -> f64 {
        match self {
            DisplaySeverity::Low => SEVERITY_LOW,
            DisplaySeverity::Medium => SEVERITY_MEDIUM,
            DisplaySeverity::High => SEVERITY_HIGH,
        }
    }

    /// Index used by the parameter string (0 low, 1 medium, 2 high).
    pub fn index(self) -> i32 {
        match self {
            DisplaySeverity::Low => 0,
            DisplaySeverity::Medium => 1,
            DisplaySeverity::High => 2,
        }
    }

    pub fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => DisplaySeverity::Low,
            1 => DisplaySeverity::Medium,
            _ => DisplaySeverity::High,
        }
    }
}

impl fmt::Display for DisplaySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplaySeverity::Low => write!(f, "low"),
            DisplaySeverity::Medium => write!(f, "medium"),
            DisplaySeverity::High => write!(f, "high"),
        }
    }
}

// ============================================================
// Issue Type
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    MissingTargettu,
    MissingTargetseg,
    ExtraTargetseg,
    EmptyTargetseg,
    EmptySourceseg,
    MissingLeadingws,
    MissingordiffLeadingws,
    ExtraLeadingws,
    ExtraordiffLeadingws,
    MissingTrailingws,
    MissingordiffTrailingws,
    ExtraTrailingws,
    ExtraordiffTrailingws,
    TargetSameAsSource,
    MissingCode,
    ExtraCode,
    SuspectCode,
    UnexpectedPattern,
    SuspectPattern,
    TargetLength,
    AllowedCharacters,
    Terminology,
    LanguagetoolError,
    SuspectDateTime,
    SuspectNumber,
    Other,
}

impl IssueType {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::MissingTargettu => "MISSING_TARGETTU",
            IssueType::MissingTargetseg => "MISSING_TARGETSEG",
            IssueType::ExtraTargetseg => "EXTRA_TARGETSEG",
            IssueType::EmptyTargetseg => "EMPTY_TARGETSEG",
            IssueType::EmptySourceseg => "EMPTY_SOURCESEG",
            IssueType::MissingLeadingws => "MISSING_LEADINGWS",
            IssueType::MissingordiffLeadingws => "MISSINGORDIFF_LEADINGWS",
            IssueType::ExtraLeadingws => "EXTRA_LEADINGWS",
            IssueType::ExtraordiffLeadingws => "EXTRAORDIFF_LEADINGWS",
            IssueType::MissingTrailingws => "MISSING_TRAILINGWS",
            IssueType::MissingordiffTrailingws => "MISSINGORDIFF_TRAILINGWS",
            IssueType::ExtraTrailingws => "EXTRA_TRAILINGWS",
            IssueType::ExtraordiffTrailingws => "EXTRAORDIFF_TRAILINGWS",
            IssueType::TargetSameAsSource => "TARGET_SAME_AS_SOURCE",
            IssueType::MissingCode => "MISSING_CODE",
            IssueType::ExtraCode => "EXTRA_CODE",
            IssueType::SuspectCode => "SUSPECT_CODE",
            IssueType::UnexpectedPattern => "UNEXPECTED_PATTERN",
            IssueType::SuspectPattern => "SUSPECT_PATTERN",
            IssueType::TargetLength => "TARGET_LENGTH",
            IssueType::AllowedCharacters => "ALLOWED_CHARACTERS",
            IssueType::Terminology => "TERMINOLOGY",
            IssueType::LanguagetoolError => "LANGUAGETOOL_ERROR",
            IssueType::SuspectDateTime => "SUSPECT_DATE_TIME",
            IssueType::SuspectNumber => "SUSPECT_NUMBER",
            IssueType::Other => "OTHER",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================
// Issue
// ============================================================

/// Where an issue comes from: the document-level address shared by every
/// issue of one text unit.
#[derive(Debug, Clone, Copy)]
pub struct IssueOrigin<'a> {
    pub document_uri: &'a str,
    pub sub_document_id: Option<&'a str>,
    pub tu_id: &'a str,
    pub tu_name: Option<&'a str>,
}

/// One finding. Immutable after construction, except for the enabled flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    document_uri: String,
    sub_document_id: Option<String>,
    issue_type: IssueType,
    tu_id: String,
    tu_name: Option<String>,
    seg_id: Option<String>,
    message: String,
    source_start: i32,
    source_end: i32,
    target_start: i32,
    target_end: i32,
    severity: f64,
    display_severity: DisplaySeverity,
    enabled: bool,
    codes: Vec<Code>,
    source_text: String,
    target_text: String,
    signature: String,
}

impl Issue {
    pub fn document_uri(&self) -> &str {
        &self.document_uri
    }

    pub fn sub_document_id(&self) -> Option<&str> {
        self.sub_document_id.as_deref()
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub fn tu_id(&self) -> &str {
        &self.tu_id
    }

    pub fn tu_name(&self) -> Option<&str> {
        self.tu_name.as_deref()
    }

    pub fn seg_id(&self) -> Option<&str> {
        self.seg_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_start(&self) -> i32 {
        self.source_start
    }

    pub fn source_end(&self) -> i32 {
        self.source_end
    }

    pub fn target_start(&self) -> i32 {
        self.target_start
    }

    pub fn target_end(&self) -> i32 {
        self.target_end
    }

    pub fn severity(&self) -> f64 {
        self.severity
    }

    pub fn display_severity(&self) -> DisplaySeverity {
        self.display_severity
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// Builds an [`Issue`]. Spans default to "no span" (`0..-1`).
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    issue_type: IssueType,
    severity: f64,
    message: String,
    seg_id: Option<String>,
    source_span: (i32, i32),
    target_span: (i32, i32),
    codes: Vec<Code>,
    source_text: String,
    target_text: String,
    enabled: bool,
}

impl IssueBuilder {
    pub fn new(issue_type: IssueType, severity: DisplaySeverity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity: severity.to_severity(),
            message: message.into(),
            seg_id: None,
            source_span: (0, NO_END),
            target_span: (0, NO_END),
            codes: Vec::new(),
            source_text: String::new(),
            target_text: String::new(),
            enabled: true,
        }
    }

    /// Overrides the severity with a raw 0-100 value (clamped).
    pub fn raw_severity(mut self, severity: f64) -> Self {
        self.severity = severity.clamp(0.0, 100.0);
        self
    }

    pub fn segment(mut self, seg_id: Option<&str>) -> Self {
        self.seg_id = seg_id.map(String::from);
        self
    }

    pub fn source_span(mut self, start: usize, end: usize) -> Self {
        self.source_span = (to_offset(start), to_offset(end));
        self
    }

    pub fn target_span(mut self, start: usize, end: usize) -> Self {
        self.target_span = (to_offset(start), to_offset(end));
        self
    }

    /// Sets raw offsets, sentinels included.
    pub fn raw_spans(mut self, source: (i32, i32), target: (i32, i32)) -> Self {
        self.source_span = source;
        self.target_span = target;
        self
    }

    pub fn texts(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_text = source.into();
        self.target_text = target.into();
        self
    }

    pub fn codes(mut self, codes: Vec<Code>) -> Self {
        self.codes = codes;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self, origin: &IssueOrigin<'_>) -> Issue {
        let signature = compute_signature(
            origin.document_uri,
            origin.sub_document_id,
            origin.tu_id,
            self.seg_id.as_deref(),
            self.source_span.0,
            self.issue_type,
        );
        Issue {
            document_uri: origin.document_uri.to_string(),
            sub_document_id: origin.sub_document_id.map(String::from),
            issue_type: self.issue_type,
            tu_id: origin.tu_id.to_string(),
            tu_name: origin.tu_name.map(String::from),
            seg_id: self.seg_id,
            message: self.message,
            source_start: self.source_span.0,
            source_end: self.source_span.1,
            target_start: self.target_span.0,
            target_end: self.target_span.1,
            severity: self.severity,
            display_severity: DisplaySeverity::from_severity(self.severity),
            enabled: self.enabled,
            codes: self.codes,
            source_text: self.source_text,
            target_text: self.target_text,
            signature,
        }
    }
}

fn to_offset(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ============================================================
// Issue Annotation
// ============================================================

/// A quality issue recorded on a container, as found in a document or
/// stamped back onto it after checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueAnnotation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_annotation_type")]
    pub issue_type: IssueType,
    #[serde(default = "default_annotation_severity")]
    pub severity: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub segment_id: Option<String>,
    #[serde(default)]
    pub source_start: i32,
    #[serde(default = "default_end")]
    pub source_end: i32,
    #[serde(default)]
    pub target_start: i32,
    #[serde(default = "default_end")]
    pub target_end: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_annotation_type() -> IssueType {
    IssueType::Other
}

fn default_annotation_severity() -> f64 {
    SEVERITY_MEDIUM
}

fn default_end() -> i32 {
    NO_END
}

fn default_enabled() -> bool {
    true
}

impl IssueAnnotation {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            id: None,
            issue_type: issue.issue_type,
            severity: issue.severity,
            comment: issue.message.clone(),
            segment_id: issue.seg_id.clone(),
            source_start: issue.source_start,
            source_end: issue.source_end,
            target_start: issue.target_start,
            target_end: issue.target_end,
            enabled: issue.enabled,
        }
    }
}
