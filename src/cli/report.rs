//! Terminal output of command results.
//!
//! Issues are printed cargo-style: severity and message, the text unit
//! position, the source and target texts with carets under the span, and
//! the signature to pass to `transcheck suppress`.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CheckSummary, CommandResult, CommandSummary, InitSummary, ReportSummary, SuppressSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{DisplaySeverity, Issue};
use crate::utils::uri_to_path;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Width of the `S`/`T` gutter labels.
const GUTTER_WIDTH: usize = 1;

/// Print issues in cargo-style format to a writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    // Stable: keeps the checking order inside a document.
    sorted.sort_by(|a, b| a.document_uri().cmp(b.document_uri()));

    for issue in &sorted {
        print_issue(issue, writer);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success_to<W: Write>(document_count: usize, disabled_count: usize, writer: &mut W) {
    let mut msg = format!(
        "Checked {} {} - no issues found",
        document_count,
        if document_count == 1 { "document" } else { "documents" }
    );
    if disabled_count > 0 {
        msg.push_str(&format!(" ({} suppressed)", disabled_count));
    }
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

// ============================================================
// Internal Functions
// ============================================================

fn severity_label(severity: DisplaySeverity) -> ColoredString {
    match severity {
        DisplaySeverity::High => "error".bold().red(),
        DisplaySeverity::Medium | DisplaySeverity::Low => "warning".bold().yellow(),
    }
}

fn caret(severity: DisplaySeverity) -> ColoredString {
    match severity {
        DisplaySeverity::High => "^".red(),
        DisplaySeverity::Medium | DisplaySeverity::Low => "^".yellow(),
    }
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity = issue.display_severity();
    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_label(severity),
        issue.message(),
        issue.issue_type().as_str().dimmed().cyan()
    );

    let _ = writeln!(
        writer,
        "  {} {}  {}",
        "-->".blue(),
        uri_to_path(issue.document_uri()),
        crate::report::position(issue)
    );

    let source = issue.source_text();
    let target = issue.target_text();
    if !source.is_empty() || !target.is_empty() {
        let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = GUTTER_WIDTH);
        print_text_line(writer, "S", source, issue.source_start(), issue.source_end(), severity);
        print_text_line(writer, "T", target, issue.target_start(), issue.target_end(), severity);
    }

    let _ = writeln!(
        writer,
        "{:>width$} {} {} {}",
        "",
        "=".blue(),
        "signature:".bold(),
        issue.signature(),
        width = GUTTER_WIDTH
    );

    let _ = writeln!(writer); // Empty line between issues
}

/// One text line, with carets when the span is set.
fn print_text_line<W: Write>(
    writer: &mut W,
    label: &str,
    text: &str,
    start: i32,
    end: i32,
    severity: DisplaySeverity,
) {
    let text = flatten(text);
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        label.blue(),
        "|".blue(),
        text,
        width = GUTTER_WIDTH
    );

    let Some((before, span, _)) = crate::report::split_span(&text, start, end) else {
        return;
    };
    let padding = UnicodeWidthStr::width(before.as_str());
    let carets = UnicodeWidthStr::width(span.as_str()).max(1);
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret(severity).to_string().repeat(carets),
        width = GUTTER_WIDTH,
        padding = padding
    );
}

/// Line breaks and tabs as single spaces, keeping char offsets intact.
fn flatten(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.display_severity() == DisplaySeverity::High)
        .count();
    let total_warnings = issues.len() - total_errors;
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Check(summary) => print_check(summary, &result.issues, writer),
        CommandSummary::Suppress(summary) => print_suppress(summary, writer),
        CommandSummary::Report(summary) => print_report(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn print_check<W: Write>(summary: &CheckSummary, issues: &[Issue], writer: &mut W) {
    report_to(issues, writer);
    if issues.is_empty() {
        print_success_to(summary.document_count, summary.disabled_count, writer);
    }
    if let Some(session) = &summary.session {
        let _ = writeln!(writer, "{} {}", "Saved".green().bold(), session.display());
    }
    if let Some(report) = &summary.report {
        let _ = writeln!(writer, "{} {}", "Wrote".green().bold(), report.display());
    }
}

fn print_suppress<W: Write>(summary: &SuppressSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} issue(s) in {}",
        "Suppressed".green().bold(),
        summary.disabled,
        summary.session.display()
    );
    let unmatched = summary.requested.saturating_sub(summary.disabled);
    if summary.disabled == 0 {
        let _ = writeln!(
            writer,
            "{} no enabled issue matches the given signature(s)",
            "warning:".bold().yellow()
        );
    } else if unmatched > 0 {
        let _ = writeln!(
            writer,
            "{} {} signature(s) matched no enabled issue",
            "warning:".bold().yellow(),
            unmatched
        );
    }
}

fn print_report<W: Write>(summary: &ReportSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} ({} issue(s))",
        "Wrote".green().bold(),
        summary.path.display(),
        summary.issue_count
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else if let Some(error) = &summary.error {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), error);
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::issues::{IssueBuilder, IssueOrigin, IssueType};

    fn strip_ansi(s: &str) -> String {
        // Simple ANSI escape code stripper for testing
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // Skip until 'm'
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn issue(severity: DisplaySeverity, tu_id: &str) -> Issue {
        IssueBuilder::new(IssueType::SuspectPattern, severity, "The source part \"{1}\" is missing")
            .segment(Some("0"))
            .source_span(6, 9)
            .texts("Press {1} now", "Appuyez maintenant")
            .build(&IssueOrigin {
                document_uri: "file:///work/app.json",
                sub_document_id: None,
                tu_id,
                tu_name: Some("button"),
            })
    }

    fn output(issues: &[Issue]) -> String {
        let mut output = Vec::new();
        report_to(issues, &mut output);
        strip_ansi(&String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_report_empty() {
        let mut output = Vec::new();
        report_to(&[], &mut output);
        assert!(output.is_empty());
    }

    #[test]
    fn test_report_issue() {
        let issue = issue(DisplaySeverity::High, "4");
        let text = output(std::slice::from_ref(&issue));

        assert!(text.contains("error: \"The source part \"{1}\" is missing\"  SUSPECT_PATTERN"));
        assert!(text.contains("--> /work/app.json  ID=4 (button), segment=0"));
        assert!(text.contains("S | Press {1} now\n  |       ^^^\n"));
        assert!(text.contains("T | Appuyez maintenant\n"));
        assert!(text.contains(&format!("= signature: {}", issue.signature())));
    }

    #[test]
    fn test_caret_padding_uses_display_width() {
        let issue = IssueBuilder::new(IssueType::UnexpectedPattern, DisplaySeverity::Low, "extra")
            .target_span(2, 3)
            .texts("", "日本x")
            .build(&IssueOrigin {
                document_uri: "file:///a.json",
                sub_document_id: None,
                tu_id: "1",
                tu_name: None,
            });
        let text = output(&[issue]);
        assert!(text.contains("T | 日本x\n  |     ^\n"));
    }

    #[test]
    fn test_summary_counts() {
        let issues = vec![
            issue(DisplaySeverity::High, "1"),
            issue(DisplaySeverity::Medium, "2"),
            issue(DisplaySeverity::Low, "3"),
        ];
        let text = output(&issues);
        assert!(text.contains("warning: \"The source part"));
        assert!(text.ends_with("✘ 3 problems (1 error, 2 warnings)\n"));
    }

    #[test]
    fn test_flatten_keeps_offsets() {
        assert_eq!(flatten("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_print_check_success() {
        let result = CommandResult {
            kind: crate::cli::commands::CommandKind::Check,
            summary: CommandSummary::Check(CheckSummary {
                document_count: 2,
                disabled_count: 1,
                session: Some(PathBuf::from("work.qcs")),
                report: None,
            }),
            error_count: 0,
            warning_count: 0,
            exit_on_errors: true,
            issues: Vec::new(),
        };
        let mut out = Vec::new();
        print_to(&result, &mut out);
        let text = strip_ansi(&String::from_utf8(out).unwrap());
        assert_eq!(
            text,
            "✓ Checked 2 documents - no issues found (1 suppressed)\nSaved work.qcs\n"
        );
    }
}
