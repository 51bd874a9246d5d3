use std::path::PathBuf;

use crate::issues::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Check,
    Suppress,
    Report,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    Suppress(SuppressSummary),
    Report(ReportSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct CheckSummary {
    pub document_count: usize,
    pub disabled_count: usize,
    pub session: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

#[derive(Debug)]
pub struct SuppressSummary {
    pub requested: usize,
    pub disabled: usize,
    pub session: PathBuf,
}

#[derive(Debug)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub issue_count: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running transcheck commands
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when problems remain.
    pub exit_on_errors: bool,
    /// Enabled issues, for the terminal output.
    /// Empty for commands other than check.
    pub issues: Vec<Issue>,
}
