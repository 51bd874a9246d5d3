//! The checker pipeline.
//!
//! Every leaf checker implements the [`Checker`] lifecycle:
//! `start` (constructor, fails on bad configuration) → `on_document_start`
//! → `on_sub_document_start` → `on_text_unit`, appending [`Issue`]s to a
//! caller-provided sink. [`QualityChecker`] composes them with the optional
//! terminology, blacklist and grammar-service checks.
//!
//! ## Module Structure
//!
//! - `general`: segment pairing, empty segments, same-as-source, doubled words, whitespace
//! - `length`: ratio, absolute and storage-size length checks
//! - `inline_codes`: missing/extra codes and open/close order
//! - `patterns`: source/target regex correspondences
//! - `characters`: corrupted characters, output charset, ITS allowed characters
//! - `localizable`: dates, times and numbers that must survive localization
//! - `terms`, `blacklist`, `grammar`: optional external checks
//! - `quality`: the orchestrator

mod blacklist;
mod characters;
mod general;
mod grammar;
mod inline_codes;
mod length;
mod localizable;
mod patterns;
mod quality;
mod terms;

use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use tracing::debug;

pub use blacklist::{Blacklist, BlacklistEntry};
pub use characters::CharactersChecker;
pub use general::GeneralChecker;
pub use grammar::{GrammarMatch, GrammarRequest, GrammarService, LanguageToolClient};
pub use inline_codes::InlineCodesChecker;
pub use length::LengthChecker;
pub use localizable::LocalizableChecker;
pub use patterns::PatternsChecker;
pub use quality::QualityChecker;
pub use terms::{Glossary, TermEntry};

use crate::config::Parameters;
use crate::document::{StartDocument, StartSubDocument, TextUnit};
use crate::issues::{Issue, IssueBuilder, IssueOrigin};
use crate::locale::LocaleId;
use crate::utils::to_file_uri;

// ============================================================
// Checker Scope
// ============================================================

/// State shared by every checker: the locale pair, the parameters and the
/// address of the document being processed.
#[derive(Debug, Clone)]
pub struct CheckerScope {
    pub source_locale: LocaleId,
    pub target_locale: LocaleId,
    pub params: Arc<Parameters>,
    pub document_uri: String,
    pub sub_document_id: Option<String>,
    pub multilingual: bool,
}

impl CheckerScope {
    pub fn new(source_locale: LocaleId, target_locale: LocaleId, params: Arc<Parameters>) -> Self {
        Self {
            source_locale,
            target_locale,
            params,
            document_uri: String::new(),
            sub_document_id: None,
            multilingual: false,
        }
    }

    pub fn start_document(&mut self, document: &StartDocument) {
        self.document_uri = to_file_uri(&document.name);
        self.sub_document_id = None;
        self.multilingual = document.multilingual;
    }

    pub fn start_sub_document(&mut self, sub_document: &StartSubDocument) {
        self.sub_document_id = Some(sub_document.name_or_id().to_string());
    }

    pub fn origin<'a>(&'a self, tu: &'a TextUnit) -> IssueOrigin<'a> {
        IssueOrigin {
            document_uri: &self.document_uri,
            sub_document_id: self.sub_document_id.as_deref(),
            tu_id: &tu.id,
            tu_name: tu.name.as_deref(),
        }
    }

    /// Builds the issue against the current address and pushes it.
    pub fn report(&self, tu: &TextUnit, builder: IssueBuilder, sink: &mut Vec<Issue>) {
        sink.push(builder.build(&self.origin(tu)));
    }
}

// ============================================================
// Checker Trait
// ============================================================

/// The lifecycle shared by the leaf checkers.
///
/// `on_text_unit` never fails: a unit that cannot be checked is skipped with
/// a warning. Configuration errors surface from each checker's `start`.
#[enum_dispatch]
pub trait Checker {
    fn scope(&self) -> &CheckerScope;

    fn scope_mut(&mut self) -> &mut CheckerScope;

    fn on_document_start(&mut self, document: &StartDocument) {
        self.scope_mut().start_document(document);
    }

    fn on_sub_document_start(&mut self, sub_document: &StartSubDocument) {
        self.scope_mut().start_sub_document(sub_document);
    }

    /// Checks `tu` unless it is marked non-translatable.
    fn on_text_unit(&mut self, tu: &TextUnit, sink: &mut Vec<Issue>) {
        if !tu.translatable {
            return;
        }
        self.check_text_unit(tu, sink);
    }

    /// Checks one translatable unit.
    fn check_text_unit(&mut self, tu: &TextUnit, sink: &mut Vec<Issue>);
}

/// The closed set of leaf checkers driven by [`QualityChecker`].
#[enum_dispatch(Checker)]
pub enum LeafChecker {
    General(GeneralChecker),
    Length(LengthChecker),
    InlineCodes(InlineCodesChecker),
    Patterns(PatternsChecker),
    Characters(CharactersChecker),
    Localizable(LocalizableChecker),
}

impl LeafChecker {
    pub fn name(&self) -> &'static str {
        match self {
            LeafChecker::General(_) => "general",
            LeafChecker::Length(_) => "length",
            LeafChecker::InlineCodes(_) => "inline-codes",
            LeafChecker::Patterns(_) => "patterns",
            LeafChecker::Characters(_) => "characters",
            LeafChecker::Localizable(_) => "localizable",
        }
    }
}

/// Starts the leaf checkers enabled by the parameters, in pipeline order.
pub fn start_leaf_checkers(
    scope: &CheckerScope,
) -> Result<Vec<LeafChecker>, crate::error::ConfigError> {
    let params = &scope.params;
    let mut checkers: Vec<LeafChecker> = vec![
        GeneralChecker::start(scope.clone())?.into(),
        LengthChecker::start(scope.clone())?.into(),
    ];
    if params.code_difference {
        checkers.push(InlineCodesChecker::start(scope.clone())?.into());
    }
    if params.check_patterns {
        checkers.push(PatternsChecker::start(scope.clone())?.into());
    }
    checkers.push(CharactersChecker::start(scope.clone())?.into());
    if params.check_localizables {
        checkers.push(LocalizableChecker::start(scope.clone())?.into());
    }
    debug!(
        "Started checkers: {}",
        checkers.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    );
    Ok(checkers)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::CheckerScope;
    use crate::config::Parameters;
    use crate::document::{Container, StartDocument, TextUnit};
    use crate::locale::LocaleId;

    pub fn scope_with(params: Parameters) -> CheckerScope {
        let mut scope = CheckerScope::new(LocaleId::new("en"), LocaleId::new("fr"), Arc::new(params));
        scope.start_document(&StartDocument {
            name: "/work/test.json".to_string(),
            multilingual: true,
        });
        scope
    }

    pub fn scope() -> CheckerScope {
        scope_with(Parameters::default())
    }

    /// Parameters with every check off, so a test enables only what it needs.
    pub fn quiet_params() -> Parameters {
        Parameters {
            leading_ws: false,
            trailing_ws: false,
            empty_target: false,
            empty_source: false,
            target_same_as_source: false,
            doubled_word: false,
            code_difference: false,
            check_patterns: false,
            corrupted_characters: false,
            check_allowed_characters: false,
            check_characters: false,
            check_max_char_length: false,
            check_min_char_length: false,
            check_absolute_max_char_length: false,
            check_storage_size: false,
            ..Default::default()
        }
    }

    pub fn unit(source: &str, target: &str) -> TextUnit {
        TextUnit::new("1", Container::from_text(source))
            .with_target(&LocaleId::new("fr"), Container::from_text(target))
    }

    pub fn fr() -> LocaleId {
        LocaleId::new("fr")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::issues::{DisplaySeverity, IssueType};

    #[test]
    fn test_scope_tracks_document_address() {
        let mut scope = scope();
        assert_eq!(scope.document_uri, "file:///work/test.json");
        assert!(scope.multilingual);

        scope.start_sub_document(&StartSubDocument {
            id: "sd1".to_string(),
            name: None,
        });
        assert_eq!(scope.sub_document_id.as_deref(), Some("sd1"));

        scope.start_document(&StartDocument {
            name: "file:///other.tsv".to_string(),
            multilingual: false,
        });
        assert_eq!(scope.document_uri, "file:///other.tsv");
        assert!(scope.sub_document_id.is_none());
    }

    #[test]
    fn test_report_uses_current_address() {
        let scope = scope();
        let tu = unit("a", "b");
        let mut sink = Vec::new();
        scope.report(
            &tu,
            IssueBuilder::new(IssueType::Other, DisplaySeverity::Low, "x"),
            &mut sink,
        );
        assert_eq!(sink[0].document_uri(), "file:///work/test.json");
        assert_eq!(sink[0].tu_id(), "1");
    }

    #[test]
    fn test_leaf_checkers_skip_non_translatable_units() {
        let params = Parameters {
            code_difference: true,
            check_patterns: true,
            check_localizables: true,
            ..Default::default()
        };
        let mut checkers = start_leaf_checkers(&scope_with(params)).unwrap();
        assert_eq!(checkers.len(), 6);

        // No target and trailing spaces: the general checker would flag it.
        let mut tu = TextUnit::new("1", crate::document::Container::from_text("Pay 10 now  "));
        tu.translatable = false;
        let mut sink = Vec::new();
        for checker in &mut checkers {
            checker.on_text_unit(&tu, &mut sink);
        }
        assert!(sink.is_empty(), "unexpected issues: {:?}", sink);

        tu.translatable = true;
        for checker in &mut checkers {
            checker.on_text_unit(&tu, &mut sink);
        }
        assert!(sink.iter().any(|i| i.issue_type() == IssueType::MissingTargettu));
    }

    #[test]
    fn test_start_leaf_checkers_follows_parameters() {
        let checkers = start_leaf_checkers(&scope()).unwrap();
        let names: Vec<&str> = checkers.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["general", "length", "inline-codes", "patterns", "characters"]
        );

        let params = Parameters {
            code_difference: false,
            check_localizables: true,
            ..Default::default()
        };
        let checkers = start_leaf_checkers(&scope_with(params)).unwrap();
        let names: Vec<&str> = checkers.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["general", "length", "patterns", "characters", "localizable"]
        );
    }
}
