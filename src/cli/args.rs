//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Check documents and optionally save a session and a report
//! - `suppress`: Disable issues of a saved session by signature
//! - `report`: Recheck a saved session and write its report
//! - `init`: Write a default `.transcheck.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::config::OutputType;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Suppress(cmd)) => cmd.common.verbose,
            Some(Command::Report(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Configuration file (default: .transcheck.json found from the current directory up)
    #[arg(long, env = "TRANSCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Html,
    Tab,
    Xml,
}

impl From<ReportFormat> for OutputType {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Html => OutputType::Html,
            ReportFormat::Tab => OutputType::Tab,
            ReportFormat::Xml => OutputType::Xml,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Documents, directories or glob patterns to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Source locale (default: the session's, or en)
    #[arg(long)]
    pub source_locale: Option<String>,

    /// Target locale (default: the session's, or fr)
    #[arg(long)]
    pub target_locale: Option<String>,

    /// Filter configuration id (default: guessed from the file extension)
    #[arg(long)]
    pub filter: Option<String>,

    /// Encoding of the documents
    #[arg(long, default_value = "UTF-8")]
    pub encoding: String,

    /// Session file to update; existing suppressions are kept
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Write a report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format (default: outputType of the configuration)
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormat>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct SuppressCommand {
    /// Session file holding the issues
    #[arg(long)]
    pub session: PathBuf,

    /// Signatures of the issues to disable
    #[arg(required = true)]
    pub signatures: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Session file to report on
    #[arg(long)]
    pub session: PathBuf,

    /// Report path (default: outputPath of the session parameters)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Report format (default: outputType of the session parameters)
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check translated documents for quality issues
    Check(CheckCommand),
    /// Disable issues of a session by signature
    Suppress(SuppressCommand),
    /// Recheck a session and write its report
    Report(ReportCommand),
    /// Initialize a new .transcheck.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let args = Arguments::try_parse_from([
            "transcheck",
            "check",
            "a.json",
            "b.tsv",
            "--target-locale",
            "de",
            "--report-format",
            "xml",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose());
        let Some(Command::Check(cmd)) = args.command else {
            panic!("check expected");
        };
        assert_eq!(cmd.files.len(), 2);
        assert_eq!(cmd.target_locale.as_deref(), Some("de"));
        assert_eq!(cmd.report_format, Some(ReportFormat::Xml));
        assert_eq!(cmd.encoding, "UTF-8");
    }

    #[test]
    fn test_check_requires_files() {
        assert!(Arguments::try_parse_from(["transcheck", "check"]).is_err());
    }

    #[test]
    fn test_suppress_requires_session() {
        assert!(Arguments::try_parse_from(["transcheck", "suppress", "1:abc"]).is_err());
        assert!(Arguments::try_parse_from(["transcheck", "suppress", "--session", "s.qcs", "1:abc"]).is_ok());
    }
}
