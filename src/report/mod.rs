//! File reports of the enabled issues.
//!
//! Issues are written in list order and grouped by consecutive document
//! URI, so callers pass them in document order (as a recheck produces
//! them).
//!
//! ## Module Structure
//!
//! - `html`: HTML page with highlighted spans
//! - `tab`: tab-delimited text
//! - `xml`: `<qualityCheckReport>` document

mod html;
mod tab;
mod xml;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::config::{OutputType, Parameters, expand_root_dir};
use crate::error::ReportError;
use crate::issues::Issue;
use crate::utils::uri_to_path;

/// Writes the report configured by `params` (`outputPath`, `outputType`,
/// `showFullPath`) and returns its path.
pub fn generate_report(issues: &[Issue], params: &Parameters, root_dir: &Path) -> Result<PathBuf, ReportError> {
    let path = PathBuf::from(expand_root_dir(&params.output_path, root_dir));
    let content = render(issues, params.output_type, params.show_full_path)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    fs::write(&path, content).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Report written to {}", path.display());
    Ok(path)
}

pub fn render(issues: &[Issue], format: OutputType, show_full_path: bool) -> Result<String, ReportError> {
    let paths = InputPaths::new(issues, show_full_path);
    let enabled: Vec<&Issue> = issues.iter().filter(|i| i.enabled()).collect();
    match format {
        OutputType::Html => Ok(html::render(&enabled, &paths)),
        OutputType::Tab => Ok(tab::render(&enabled, &paths)),
        OutputType::Xml => xml::render(&enabled, &paths),
    }
}

// ============================================================
// Shared helpers
// ============================================================

/// Displays document paths in full or relative to their common directory.
pub(crate) struct InputPaths {
    root: Option<String>,
}

impl InputPaths {
    pub(crate) fn new(issues: &[Issue], show_full_path: bool) -> Self {
        let root = if show_full_path {
            None
        } else {
            common_root(issues.iter().map(|i| uri_to_path(i.document_uri())))
        };
        Self { root }
    }

    pub(crate) fn display(&self, document_uri: &str) -> String {
        let path = uri_to_path(document_uri);
        match &self.root {
            Some(root) => path.strip_prefix(root.as_str()).unwrap_or(&path).to_string(),
            None => path,
        }
    }
}

/// Longest common directory of `paths`, with a trailing `/`.
fn common_root(paths: impl Iterator<Item = String>) -> Option<String> {
    let mut root: Option<Vec<String>> = None;
    for path in paths {
        let path = path.replace('\\', "/");
        let mut dirs: Vec<String> = path.split('/').map(str::to_string).collect();
        dirs.pop();
        root = Some(match root {
            None => dirs,
            Some(current) => current
                .into_iter()
                .zip(dirs)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    root.map(|dirs| {
        let mut joined = dirs.join("/");
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined
    })
}

/// `ID=tu (name), segment=seg`
pub(crate) fn position(issue: &Issue) -> String {
    let mut position = format!("ID={}", issue.tu_id());
    if let Some(name) = issue.tu_name() {
        position.push_str(&format!(" ({})", name));
    }
    if let Some(seg) = issue.seg_id() {
        position.push_str(&format!(", segment={}", seg));
    }
    position
}

/// Splits `text` into before, highlighted and after parts when the span is
/// set (`end > 0`). Offsets are chars and clamped to the text.
pub(crate) fn split_span(text: &str, start: i32, end: i32) -> Option<(String, String, String)> {
    if end <= 0 {
        return None;
    }
    let chars: Vec<char> = text.chars().collect();
    let end = (end as usize).min(chars.len());
    let start = (start.max(0) as usize).min(end);
    Some((
        chars[..start].iter().collect(),
        chars[start..end].iter().collect(),
        chars[end..].iter().collect(),
    ))
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::test_support::issue;
    use super::*;

    #[test]
    fn test_common_root() {
        let paths = ["/work/a/x.json", "/work/a/b/y.json"].map(String::from);
        assert_eq!(common_root(paths.into_iter()), Some("/work/a/".to_string()));
        assert_eq!(common_root(std::iter::empty()), None);
    }

    #[test]
    fn test_input_paths() {
        let issues = vec![
            issue("file:///work/a/x.json", "1", "m"),
            issue("file:///work/a/b/y.json", "1", "m"),
        ];
        let relative = InputPaths::new(&issues, false);
        assert_eq!(relative.display("file:///work/a/b/y.json"), "b/y.json");
        let full = InputPaths::new(&issues, true);
        assert_eq!(full.display("file:///work/a/b/y.json"), "/work/a/b/y.json");
    }

    #[test]
    fn test_split_span() {
        assert_eq!(
            split_span("Bonjour monde", 8, 13),
            Some(("Bonjour ".to_string(), "monde".to_string(), String::new()))
        );
        assert_eq!(split_span("abc", 0, -1), None);
        assert_eq!(split_span("abc", 1, 10).unwrap().1, "bc");
    }

    #[test]
    fn test_position() {
        assert_eq!(position(&issue("file:///a", "7", "m")), "ID=7, segment=0");
    }

    #[test]
    fn test_generate_report_expands_root_dir() {
        let dir = tempdir().unwrap();
        let params = Parameters {
            output_path: "${rootDir}/out/report.txt".to_string(),
            output_type: OutputType::Tab,
            ..Parameters::default()
        };
        let path = generate_report(&[issue("file:///work/x.json", "1", "m")], &params, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("out/report.txt"));
        assert!(fs::read_to_string(path).unwrap().starts_with("Quality Check Report"));
    }

    #[test]
    fn test_disabled_issues_are_left_out() {
        let mut hidden = issue("file:///work/x.json", "2", "hidden");
        hidden.set_enabled(false);
        let issues = vec![issue("file:///work/x.json", "1", "shown"), hidden];
        let text = render(&issues, OutputType::Tab, true).unwrap();
        assert!(text.contains("shown"));
        assert!(!text.contains("hidden"));
    }
}
