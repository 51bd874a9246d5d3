//! The orchestrator: runs every configured check over a document's events.

use std::{path::Path, sync::Arc};

use tracing::{debug, warn};

use super::grammar::GrammarCheck;
use super::{
    Blacklist, Checker, CheckerScope, Glossary, GrammarService, LanguageToolClient, LeafChecker,
    start_leaf_checkers,
};
use crate::config::{Parameters, Scope};
use crate::document::{Container, Event, PROP_APPROVED, PROP_HAS_HIDDEN_TEXT, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueAnnotation, IssueBuilder, IssueType, NO_END};
use crate::locale::LocaleId;

pub struct QualityChecker {
    scope: CheckerScope,
    leaf_checkers: Vec<LeafChecker>,
    glossary: Option<Glossary>,
    blacklist: Option<Blacklist>,
    grammar: Option<GrammarCheck>,
}

impl QualityChecker {
    /// Validates the parameters, loads the reference files (paths relative
    /// to `root_dir` through `${rootDir}`) and starts every checker.
    pub fn start(
        source_locale: LocaleId,
        target_locale: LocaleId,
        params: &Parameters,
        root_dir: &Path,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let scope = CheckerScope::new(source_locale, target_locale, Arc::new(params.clone()));
        let leaf_checkers = start_leaf_checkers(&scope)?;

        let glossary = if params.check_terms {
            let path = params.terms_path.resolve(root_dir);
            let glossary = Glossary::load(&path, &scope.source_locale, &scope.target_locale)?
                .with_modes(params.string_mode, params.between_codes);
            debug!("Loaded {} glossary entries from {}", glossary.entries().len(), path.display());
            Some(glossary)
        } else {
            None
        };

        let blacklist = if params.check_blacklist {
            let path = params.blacklist_path.resolve(root_dir);
            let locale = if params.blacklist_src {
                &scope.source_locale
            } else {
                &scope.target_locale
            };
            let blacklist = Blacklist::load(&path, locale)?;
            debug!("Loaded {} blacklist entries from {}", blacklist.entries().len(), path.display());
            Some(blacklist)
        } else {
            None
        };

        let grammar = if params.check_with_lt {
            let client = LanguageToolClient::new(&params.server_url, &params.lt_username, &params.lt_api_key)
                .map_err(|err| ConfigError::InvalidValue {
                    key: "serverURL".to_string(),
                    message: err.to_string(),
                })?;
            Some(GrammarCheck::new(Box::new(client), params.lt_bilingual_mode))
        } else {
            None
        };

        Ok(Self {
            scope,
            leaf_checkers,
            glossary,
            blacklist,
            grammar,
        })
    }

    /// Replaces the grammar service, enabling grammar checks.
    pub fn with_grammar_service(mut self, service: Box<dyn GrammarService>) -> Self {
        self.grammar = Some(GrammarCheck::new(service, self.scope.params.lt_bilingual_mode));
        self
    }

    pub fn params(&self) -> &Parameters {
        &self.scope.params
    }

    /// Feeds one filter event. Text units get their annotations rewritten.
    pub fn process_event(&mut self, event: &mut Event, sink: &mut Vec<Issue>) {
        match event {
            Event::StartDocument(document) => {
                debug!("Checking document {}", document.name);
                self.scope.start_document(document);
                for checker in &mut self.leaf_checkers {
                    checker.on_document_start(document);
                }
            }
            Event::StartSubDocument(sub_document) => {
                self.scope.start_sub_document(sub_document);
                for checker in &mut self.leaf_checkers {
                    checker.on_sub_document_start(sub_document);
                }
            }
            Event::TextUnit(tu) => self.process_text_unit(tu, sink),
            Event::EndSubDocument | Event::EndDocument => {}
        }
    }

    pub fn process_text_unit(&mut self, tu: &mut TextUnit, sink: &mut Vec<Issue>) {
        if !tu.translatable {
            return;
        }
        let trg_loc = self.scope.target_locale.clone();

        let on_source = self.harvest(tu, &tu.source, false);
        let on_target = match tu.target(&trg_loc) {
            Some(target) => self.harvest(tu, target, true),
            None => Vec::new(),
        };

        let fresh = if self.in_scope(tu.target(&trg_loc)) {
            self.check(tu)
        } else {
            Vec::new()
        };

        self.stamp_annotations(tu, &on_source, &on_target, &fresh);
        sink.extend(on_source);
        sink.extend(on_target);
        sink.extend(fresh);
    }

    /// Re-emits the quality annotations already recorded on a container.
    fn harvest(&self, tu: &TextUnit, container: &Container, is_target: bool) -> Vec<Issue> {
        let text = container.unsegmented().plain_text();
        let origin = self.scope.origin(tu);
        container
            .annotations
            .issues
            .iter()
            .map(|annotation| {
                let (source_text, target_text) = if is_target {
                    (String::new(), text.clone())
                } else {
                    (text.clone(), String::new())
                };
                IssueBuilder::new(annotation.issue_type, DisplaySeverity::Medium, annotation.comment.clone())
                    .raw_severity(annotation.severity)
                    .segment(annotation.segment_id.as_deref())
                    .raw_spans(
                        (annotation.source_start, annotation.source_end),
                        (annotation.target_start, annotation.target_end),
                    )
                    .texts(source_text, target_text)
                    .enabled(annotation.enabled)
                    .build(&origin)
            })
            .collect()
    }

    fn in_scope(&self, target: Option<&Container>) -> bool {
        let approved = target.and_then(|t| t.property(PROP_APPROVED)) == Some("yes");
        match self.scope.params.scope {
            Scope::All => true,
            Scope::ApprovedOnly => approved,
            Scope::NotApprovedOnly => !approved,
        }
    }

    fn check(&mut self, tu: &TextUnit) -> Vec<Issue> {
        let mut fresh = Vec::new();
        for checker in &mut self.leaf_checkers {
            checker.on_text_unit(tu, &mut fresh);
        }

        let Some(target) = tu.target(&self.scope.target_locale) else {
            return fresh;
        };

        if let Some(hidden) = target.property(PROP_HAS_HIDDEN_TEXT) {
            match parse_span(hidden) {
                Some((start, end)) => {
                    let joined = target.unsegmented();
                    let builder = IssueBuilder::new(
                        IssueType::SuspectPattern,
                        DisplaySeverity::High,
                        "Target content has at least one hidden part.",
                    )
                    .target_span(joined.plain_offset(start), joined.plain_offset(end))
                    .texts(tu.source.unsegmented().plain_text(), joined.plain_text());
                    self.scope.report(tu, builder, &mut fresh);
                }
                None => warn!(
                    "Invalid hidden-text property '{}' in text unit '{}'",
                    hidden, tu.id
                ),
            }
        }

        let params = self.scope.params.clone();
        for src_seg in &tu.source.segments {
            let Some(trg_seg) = target.segment(&src_seg.id) else {
                continue;
            };
            if let Some(glossary) = &self.glossary {
                glossary.verify(&self.scope, tu, src_seg, trg_seg, &mut fresh);
            }
            if let Some(blacklist) = &self.blacklist {
                blacklist.verify(&self.scope, tu, src_seg, trg_seg, false, params.allow_blacklist_sub, &mut fresh);
                if params.blacklist_src {
                    blacklist.verify(&self.scope, tu, src_seg, trg_seg, true, params.allow_blacklist_sub, &mut fresh);
                }
            }
            if let Some(grammar) = &mut self.grammar {
                grammar.verify(&self.scope, tu, src_seg, trg_seg, &mut fresh);
            }
        }
        fresh
    }

    /// Rewrites the quality annotations of both containers from the issues
    /// found, numbering them from 1 across source then target.
    fn stamp_annotations(&self, tu: &mut TextUnit, on_source: &[Issue], on_target: &[Issue], fresh: &[Issue]) {
        let has_target = tu.target(&self.scope.target_locale).is_some();
        let concerns_target = |issue: &Issue| has_target && (issue.target_end() != NO_END || issue.source_end() == NO_END);

        let mut source: Vec<IssueAnnotation> = on_source.iter().map(IssueAnnotation::from_issue).collect();
        source.extend(fresh.iter().filter(|i| !concerns_target(i)).map(IssueAnnotation::from_issue));
        let mut target: Vec<IssueAnnotation> = on_target.iter().map(IssueAnnotation::from_issue).collect();
        target.extend(fresh.iter().filter(|i| concerns_target(i)).map(IssueAnnotation::from_issue));

        for (index, annotation) in source.iter_mut().chain(target.iter_mut()).enumerate() {
            annotation.id = Some((index + 1).to_string());
        }
        tu.source.annotations.issues = source;
        if let Some(container) = tu.target_mut(&self.scope.target_locale) {
            container.annotations.issues = target;
        }
    }
}

/// `start;end` coded offsets.
fn parse_span(value: &str) -> Option<(usize, usize)> {
    let (start, end) = value.split_once(';')?;
    let start = start.trim().parse().ok()?;
    let end = end.trim().parse().ok()?;
    (start <= end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::checkers::test_support::*;
    use crate::checkers::{GrammarMatch, GrammarRequest};
    use crate::config::ReferencePath;
    use crate::document::{CodedText, Segment, StartDocument, TagType};
    use crate::error::ServiceError;

    fn start(params: Parameters) -> QualityChecker {
        QualityChecker::start(LocaleId::new("en"), fr(), &params, Path::new("/work")).unwrap()
    }

    fn run(checker: &mut QualityChecker, tu: TextUnit) -> (Vec<Issue>, TextUnit) {
        let mut events = vec![
            Event::StartDocument(StartDocument {
                name: "/work/doc.json".to_string(),
                multilingual: true,
            }),
            Event::TextUnit(tu),
        ];
        let mut sink = Vec::new();
        for event in &mut events {
            checker.process_event(event, &mut sink);
        }
        match events.pop() {
            Some(Event::TextUnit(tu)) => (sink, tu),
            _ => panic!("text unit expected"),
        }
    }

    fn empty_target_params() -> Parameters {
        Parameters {
            empty_target: true,
            ..quiet_params()
        }
    }

    #[test]
    fn test_issues_are_addressed() {
        let mut checker = start(empty_target_params());
        let (issues, _) = run(&mut checker, unit("Hello", ""));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type(), IssueType::EmptyTargetseg);
        assert_eq!(issues[0].document_uri(), "file:///work/doc.json");
        assert_eq!(issues[0].tu_id(), "1");
    }

    #[test]
    fn test_non_translatable_units_are_skipped() {
        let mut checker = start(empty_target_params());
        let mut tu = unit("Hello", "");
        tu.translatable = false;
        assert!(run(&mut checker, tu).0.is_empty());
    }

    #[test]
    fn test_scope_filter() {
        let approved = |approved: bool| {
            let target = Container::from_text("").with_property(PROP_APPROVED, if approved { "yes" } else { "no" });
            TextUnit::new("1", Container::from_text("Hello")).with_target(&fr(), target)
        };

        let mut checker = start(Parameters {
            scope: Scope::ApprovedOnly,
            ..empty_target_params()
        });
        assert_eq!(run(&mut checker, approved(true)).0.len(), 1);
        assert!(run(&mut checker, approved(false)).0.is_empty());

        let mut checker = start(Parameters {
            scope: Scope::NotApprovedOnly,
            ..empty_target_params()
        });
        assert!(run(&mut checker, approved(true)).0.is_empty());
        assert_eq!(run(&mut checker, approved(false)).0.len(), 1);
    }

    #[test]
    fn test_recorded_annotations_are_harvested() {
        let mut target = Container::from_text("Bonjour");
        target.annotations.issues.push(IssueAnnotation {
            id: Some("x7".to_string()),
            issue_type: IssueType::Other,
            severity: 100.0,
            comment: "Reviewer note".to_string(),
            segment_id: Some("0".to_string()),
            source_start: 0,
            source_end: NO_END,
            target_start: 0,
            target_end: 3,
            enabled: false,
        });
        let tu = TextUnit::new("1", Container::from_text("Hello")).with_target(&fr(), target);

        let mut checker = start(Parameters {
            scope: Scope::ApprovedOnly,
            ..quiet_params()
        });
        let (issues, tu) = run(&mut checker, tu);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message(), "Reviewer note");
        assert_eq!(issues[0].display_severity(), DisplaySeverity::High);
        assert!(!issues[0].enabled());
        assert_eq!(issues[0].source_text(), "");
        assert_eq!(issues[0].target_text(), "Bonjour");

        let annotations = &tu.target(&fr()).unwrap().annotations.issues;
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_fresh_issues_are_stamped() {
        let mut checker = start(empty_target_params());
        let (issues, tu) = run(&mut checker, unit("Hello", ""));
        assert_eq!(issues.len(), 1);
        let stamped = &tu.target(&fr()).unwrap().annotations.issues;
        assert_eq!(stamped.len(), 1);
        assert_eq!(stamped[0].issue_type, IssueType::EmptyTargetseg);
        assert!(tu.source.annotations.issues.is_empty());
    }

    #[test]
    fn test_hidden_text() {
        let mut text = CodedText::new();
        text.append_code(TagType::Opening, "b", "<b>")
            .append_text("Hi")
            .append_code(TagType::Closing, "b", "</b>")
            .append_text(" there");
        let target = Container::from_coded(text).with_property(PROP_HAS_HIDDEN_TEXT, "1;3");
        let tu = TextUnit::new("1", Container::from_text("Hi there")).with_target(&fr(), target);

        let mut checker = start(quiet_params());
        let (issues, _) = run(&mut checker, tu);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type(), IssueType::SuspectPattern);
        assert_eq!((issues[0].target_start(), issues[0].target_end()), (0, 2));

        let target = Container::from_text("Hi").with_property(PROP_HAS_HIDDEN_TEXT, "bad");
        let tu = TextUnit::new("1", Container::from_text("Hi")).with_target(&fr(), target);
        assert!(run(&mut checker, tu).0.is_empty());
    }

    #[test]
    fn test_glossary_and_blacklist_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("terms.txt"), "winter\thiver\n").unwrap();
        fs::write(dir.path().join("blacklist.txt"), "courriel\temail\n").unwrap();

        let params = Parameters {
            check_terms: true,
            terms_path: ReferencePath::new("${rootDir}/terms.txt"),
            check_blacklist: true,
            blacklist_path: ReferencePath::new("${rootDir}/blacklist.txt"),
            ..quiet_params()
        };
        let mut checker = QualityChecker::start(LocaleId::new("en"), fr(), &params, dir.path()).unwrap();
        let (issues, _) = run(&mut checker, unit("Send a winter email", "Envoyez un courriel d'été"));
        let types: Vec<IssueType> = issues.iter().map(|i| i.issue_type()).collect();
        assert_eq!(types, vec![IssueType::Terminology, IssueType::Terminology]);
        assert!(issues[0].message().contains("\"winter\""));
        assert!(issues[1].message().contains("\"courriel\""));
    }

    #[test]
    fn test_missing_reference_file_is_fatal() {
        let dir = tempdir().unwrap();
        let params = Parameters {
            check_terms: true,
            terms_path: ReferencePath::new("${rootDir}/missing.txt"),
            ..quiet_params()
        };
        let result = QualityChecker::start(LocaleId::new("en"), fr(), &params, dir.path());
        assert!(matches!(result, Err(ConfigError::Reference { kind: "terminology", .. })));
    }

    struct Echo;

    impl GrammarService for Echo {
        fn check(&mut self, request: &GrammarRequest<'_>) -> Result<Vec<GrammarMatch>, ServiceError> {
            Ok(vec![GrammarMatch {
                message: format!("Checked {}", request.language),
                offset: 0,
                length: 1,
                replacements: Vec::new(),
            }])
        }
    }

    #[test]
    fn test_grammar_service_per_segment() {
        let mut checker = start(quiet_params()).with_grammar_service(Box::new(Echo));
        let source = Container::new(vec![
            Segment::new("s1", CodedText::from_text("One.")),
            Segment::new("s2", CodedText::from_text("Two.")),
        ]);
        let target = Container::new(vec![
            Segment::new("s1", CodedText::from_text("Un.")),
            Segment::new("s2", CodedText::from_text("Deux.")),
        ]);
        let tu = TextUnit::new("1", source).with_target(&fr(), target);
        let (issues, _) = run(&mut checker, tu);
        let segments: Vec<Option<&str>> = issues.iter().map(|i| i.seg_id()).collect();
        assert_eq!(segments, vec![Some("s1"), Some("s2")]);
        assert_eq!(issues[0].message(), "Checked fr");
    }

    #[test]
    fn test_invalid_parameters_are_fatal() {
        let params = Parameters {
            check_characters: true,
            charset: "no-such-charset".to_string(),
            ..quiet_params()
        };
        assert!(QualityChecker::start(LocaleId::new("en"), fr(), &params, Path::new(".")).is_err());
    }
}
