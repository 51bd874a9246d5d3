use std::process::ExitCode;

use super::commands::CommandResult;

/// How a transcheck run ended, as seen by the calling shell or CI job.
///
/// `check` and `init` flag their problems through the exit code, `suppress`
/// and `report` only fail when they cannot read or write their files.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing left to act on: no enabled issue, or a command that does not
    /// gate on issues.
    Clean,
    /// Enabled issues remain after `check`, or `init` refused to overwrite.
    Flagged { errors: usize, warnings: usize },
    /// The command stopped before producing a result: a config, session or
    /// document could not be read or written.
    Aborted,
}

impl Outcome {
    pub fn of(result: &CommandResult) -> Self {
        let (errors, warnings) = (result.error_count, result.warning_count);
        if result.exit_on_errors && errors + warnings > 0 {
            Outcome::Flagged { errors, warnings }
        } else {
            Outcome::Clean
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::Flagged { .. } => 1,
            Outcome::Aborted => 2,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::commands::{
        CheckSummary, CommandKind, CommandSummary, InitSummary, SuppressSummary, helper::finish,
    };
    use crate::issues::{DisplaySeverity, IssueBuilder, IssueOrigin, IssueType};

    fn init_result(error: Option<&str>) -> CommandResult {
        let summary = CommandSummary::Init(InitSummary {
            created: error.is_none(),
            error: error.map(str::to_string),
        });
        finish(CommandKind::Init, summary, Vec::new(), true)
    }

    fn check_result(severities: &[DisplaySeverity]) -> CommandResult {
        let issues = severities
            .iter()
            .enumerate()
            .map(|(i, severity)| {
                IssueBuilder::new(IssueType::MissingTargettu, *severity, "Missing translation")
                    .build(&IssueOrigin {
                        document_uri: "file:///work/app.json",
                        sub_document_id: None,
                        tu_id: &i.to_string(),
                        tu_name: None,
                    })
            })
            .collect();
        let summary = CommandSummary::Check(CheckSummary {
            document_count: 1,
            disabled_count: 0,
            session: None,
            report: None,
        });
        finish(CommandKind::Check, summary, issues, true)
    }

    #[test]
    fn test_clean_check() {
        let outcome = Outcome::of(&check_result(&[]));
        assert_eq!(outcome, Outcome::Clean);
        assert_eq!(outcome.code(), 0);
    }

    #[test]
    fn test_check_with_enabled_issues_is_flagged() {
        let outcome = Outcome::of(&check_result(&[
            DisplaySeverity::High,
            DisplaySeverity::Low,
            DisplaySeverity::Medium,
        ]));
        assert_eq!(outcome, Outcome::Flagged { errors: 1, warnings: 2 });
        assert_eq!(outcome.code(), 1);
    }

    #[test]
    fn test_init_refusal_is_flagged() {
        assert_eq!(Outcome::of(&init_result(None)), Outcome::Clean);
        assert_eq!(
            Outcome::of(&init_result(Some(".transcheck.json already exists"))),
            Outcome::Flagged { errors: 0, warnings: 1 }
        );
    }

    #[test]
    fn test_suppress_never_gates_on_issues() {
        let summary = CommandSummary::Suppress(SuppressSummary {
            requested: 2,
            disabled: 0,
            session: "work.qcs".into(),
        });
        let mut result = finish(CommandKind::Suppress, summary, Vec::new(), false);
        result.warning_count = 3;
        assert_eq!(Outcome::of(&result), Outcome::Clean);
    }

    #[test]
    fn test_aborted_code() {
        assert_eq!(Outcome::Aborted.code(), 2);
    }
}
