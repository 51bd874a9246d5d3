use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary};
use crate::cli::args::CommonArgs;
use crate::config::{Parameters, load_config, load_config_file};
use crate::issues::{DisplaySeverity, Issue};
use crate::session::Session;

pub fn finish(kind: CommandKind, summary: CommandSummary, issues: Vec<Issue>, exit_on_errors: bool) -> CommandResult {
    let error_count = issues
        .iter()
        .filter(|i| i.display_severity() == DisplaySeverity::High)
        .count();
    let mut warning_count = issues.len() - error_count;

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        warning_count += 1;
    }

    CommandResult {
        kind,
        summary,
        error_count,
        warning_count,
        exit_on_errors,
        issues,
    }
}

/// Parameters and `${rootDir}`: from `--config` (its directory), the
/// discovered `.transcheck.json` (its directory) or the defaults (the
/// current directory).
pub fn project_config(common: &CommonArgs) -> Result<(Parameters, PathBuf)> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = &common.config {
        let parameters = load_config_file(path)?;
        return Ok((parameters, config_dir(path, &cwd)));
    }
    let loaded = load_config(&cwd)?;
    let root = match crate::config::find_config_file(&cwd) {
        Some(path) if loaded.from_file => config_dir(&path, &cwd),
        _ => cwd,
    };
    Ok((loaded.parameters, root))
}

fn config_dir(path: &Path, cwd: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
        _ => cwd.to_path_buf(),
    }
}

/// Loads a saved session, rechecking its documents.
pub fn load_session(path: &Path, root_dir: PathBuf) -> Result<Session> {
    let mut session = Session::new();
    session.set_root_dir(root_dir);
    session
        .load(path)
        .with_context(|| format!("Failed to load session {}", path.display()))?;
    Ok(session)
}
