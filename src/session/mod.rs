//! Quality-check sessions.
//!
//! A [`Session`] owns the documents under review, the locale pair, the
//! parameters and the issues of the last recheck. Issues are never stored:
//! a saved session keeps only the signatures of suppressed issues, and
//! loading it rechecks every document with those signatures applied.
//!
//! ## Module Structure
//!
//! - `codec`: the OQCS binary format

pub mod codec;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use codec::{DocumentEntry, SessionData};

use crate::checkers::QualityChecker;
use crate::config::Parameters;
use crate::document::filter::FilterRegistry;
use crate::document::{Event, RawDocument};
use crate::error::SessionError;
use crate::issues::{Issue, IssueComparator};
use crate::locale::LocaleId;
use crate::utils::to_file_uri;

/// Extension of session files.
pub const FILE_EXTENSION: &str = ".qcs";

pub struct Session {
    source_locale: LocaleId,
    target_locale: LocaleId,
    params: Parameters,
    documents: Vec<RawDocument>,
    issues: Vec<Issue>,
    modified: bool,
    filters: FilterRegistry,
    root_dir: PathBuf,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            source_locale: LocaleId::new("en"),
            target_locale: LocaleId::new("fr"),
            params: Parameters::default(),
            documents: Vec::new(),
            issues: Vec::new(),
            modified: false,
            filters: FilterRegistry::default(),
            root_dir: PathBuf::from("."),
        }
    }

    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    /// Directory `${rootDir}` expands to in reference paths.
    pub fn set_root_dir(&mut self, root_dir: impl Into<PathBuf>) {
        self.root_dir = root_dir.into();
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn source_locale(&self) -> &LocaleId {
        &self.source_locale
    }

    pub fn set_source_locale(&mut self, locale: LocaleId) {
        if self.source_locale != locale {
            self.modified = true;
        }
        self.source_locale = locale;
    }

    pub fn target_locale(&self) -> &LocaleId {
        &self.target_locale
    }

    pub fn set_target_locale(&mut self, locale: LocaleId) {
        if self.target_locale != locale {
            self.modified = true;
        }
        self.target_locale = locale;
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn set_parameters(&mut self, params: Parameters) {
        if self.params != params {
            self.modified = true;
        }
        self.params = params;
    }

    // ============================================================
    // Documents
    // ============================================================

    /// Adds a document, replacing any with the same URI. The first
    /// document's locales become the session's.
    pub fn add_raw_document(&mut self, document: RawDocument) {
        self.documents.retain(|d| d.input_uri != document.input_uri);
        if self.documents.is_empty() {
            self.source_locale = document.source_locale.clone();
            self.target_locale = document.target_locale.clone();
        }
        self.documents.push(document);
        self.modified = true;
    }

    /// Removes a document and its issues. Returns whether it was present.
    pub fn remove_document(&mut self, input_uri: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.input_uri != input_uri);
        if self.documents.len() == before {
            return false;
        }
        self.clear_issues(input_uri, false);
        self.modified = true;
        true
    }

    pub fn documents(&self) -> &[RawDocument] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    // ============================================================
    // Issues
    // ============================================================

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issues_mut(&mut self) -> &mut [Issue] {
        &mut self.issues
    }

    pub fn enabled_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.enabled())
    }

    pub fn sort_issues(&mut self, comparator: IssueComparator) {
        comparator.sort(&mut self.issues);
    }

    /// Re-enables every issue.
    pub fn reset_disabled_issues(&mut self) {
        for issue in &mut self.issues {
            issue.set_enabled(true);
        }
        self.modified = true;
    }

    /// Disables the issues with one of `signatures`. Returns how many were
    /// disabled.
    pub fn disable_signatures<S: AsRef<str>>(&mut self, signatures: &[S]) -> usize {
        let wanted: HashSet<&str> = signatures.iter().map(AsRef::as_ref).collect();
        let mut count = 0;
        for issue in &mut self.issues {
            if issue.enabled() && wanted.contains(issue.signature()) {
                issue.set_enabled(false);
                count += 1;
            }
        }
        if count > 0 {
            self.modified = true;
        }
        count
    }

    /// Signatures of the disabled issues.
    pub fn disabled_signatures(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|i| !i.enabled())
            .map(|i| i.signature().to_string())
            .collect()
    }

    /// Drops the issues of one document, returning the signatures of the
    /// disabled ones when `collect_signatures` is set.
    fn clear_issues(&mut self, input_uri: &str, collect_signatures: bool) -> Vec<String> {
        let uri = to_file_uri(input_uri);
        let mut signatures = Vec::new();
        self.issues.retain(|issue| {
            if issue.document_uri() != uri {
                return true;
            }
            if collect_signatures && !issue.enabled() {
                signatures.push(issue.signature().to_string());
            }
            false
        });
        signatures
    }

    // ============================================================
    // Recheck
    // ============================================================

    /// Rechecks every document. Without `signatures`, the issues disabled
    /// before the recheck stay disabled.
    pub fn recheck_all(&mut self, signatures: Option<&[String]>) -> Result<(), SessionError> {
        if self.documents.is_empty() {
            self.issues.clear();
            return Ok(());
        }
        let mut checker = self.start_checker()?;
        let documents = self.documents.clone();
        for document in &documents {
            self.execute_recheck(&mut checker, document, signatures)?;
        }
        Ok(())
    }

    /// Rechecks one document, keeping its suppressions. Unknown URIs are
    /// ignored.
    pub fn recheck_document(&mut self, input_uri: &str) -> Result<(), SessionError> {
        let Some(document) = self.documents.iter().find(|d| d.input_uri == input_uri).cloned() else {
            return Ok(());
        };
        let mut checker = self.start_checker()?;
        self.execute_recheck(&mut checker, &document, None)
    }

    fn start_checker(&self) -> Result<QualityChecker, SessionError> {
        Ok(QualityChecker::start(
            self.source_locale.clone(),
            self.target_locale.clone(),
            &self.params,
            &self.root_dir,
        )?)
    }

    fn execute_recheck(
        &mut self,
        checker: &mut QualityChecker,
        document: &RawDocument,
        signatures: Option<&[String]>,
    ) -> Result<(), SessionError> {
        let filter = self
            .filters
            .get(&document.filter_config_id)
            .ok_or_else(|| SessionError::UnknownFilter(document.filter_config_id.clone()))?;
        let mut events = filter.read(document)?;
        debug!("Rechecking {} ({} events)", document.input_uri, events.len());

        let mut suppressed: HashSet<String> = signatures.map(|s| s.iter().cloned().collect()).unwrap_or_default();
        let mut fresh = Vec::new();
        for event in &mut events {
            if matches!(event, Event::StartDocument(_)) {
                let harvested = self.clear_issues(&document.input_uri, signatures.is_none());
                suppressed.extend(harvested);
            }
            checker.process_event(event, &mut fresh);
        }

        for issue in &mut fresh {
            if suppressed.contains(issue.signature()) {
                issue.set_enabled(false);
            }
        }
        self.issues.extend(fresh);
        Ok(())
    }

    // ============================================================
    // Persistence
    // ============================================================

    pub fn save(&mut self, path: &Path) -> Result<(), SessionError> {
        let data = SessionData {
            source_locale: self.source_locale.to_string(),
            target_locale: self.target_locale.to_string(),
            parameters: self.params.to_flat_string(),
            documents: self
                .documents
                .iter()
                .map(|d| DocumentEntry {
                    input_uri: d.input_uri.clone(),
                    filter_config_id: d.filter_config_id.clone(),
                    encoding: d.encoding.clone(),
                })
                .collect(),
            signatures: self.disabled_signatures(),
        };
        let file = File::create(path)?;
        codec::write_session(BufWriter::new(file), &data)?;
        info!(
            "Saved session {} ({} documents, {} suppressed issues)",
            path.display(),
            data.documents.len(),
            data.signatures.len()
        );
        self.modified = false;
        Ok(())
    }

    /// Replaces the session with the one stored at `path` and rechecks it.
    ///
    /// The session is left unchanged when the file cannot be read or
    /// decoded. A recheck failure is returned after the loaded state is in
    /// place.
    pub fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        let file = File::open(path)?;
        let data = codec::read_session(BufReader::new(file))?;
        let params = Parameters::from_flat_string(&data.parameters)?;
        let source_locale = LocaleId::new(&data.source_locale);
        let target_locale = LocaleId::new(&data.target_locale);
        let documents = data
            .documents
            .iter()
            .map(|d| {
                RawDocument::new(
                    &d.input_uri,
                    &d.filter_config_id,
                    &d.encoding,
                    source_locale.clone(),
                    target_locale.clone(),
                )
            })
            .collect();
        info!(
            "Loaded session {} ({} documents, {} suppressed issues)",
            path.display(),
            data.documents.len(),
            data.signatures.len()
        );

        self.source_locale = source_locale;
        self.target_locale = target_locale;
        self.params = params;
        self.documents = documents;
        self.issues.clear();
        self.recheck_all(Some(data.signatures.as_slice()))?;
        self.modified = false;
        Ok(())
    }
}
