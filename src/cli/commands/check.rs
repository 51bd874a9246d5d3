use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use super::super::args::CheckCommand;
use super::{
    helper::{finish, project_config},
    {CheckSummary, CommandKind, CommandResult, CommandSummary},
};
use crate::{
    config::{OutputType, Parameters},
    document::RawDocument,
    document::filter::FilterRegistry,
    locale::LocaleId,
    report::generate_report,
    session::Session,
    utils::to_file_uri,
};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let (params, root_dir) = project_config(&cmd.common)?;

    let mut session = Session::new();
    session.set_root_dir(root_dir.clone());
    if let Some(path) = &cmd.session
        && path.exists()
    {
        session
            .load(path)
            .with_context(|| format!("Failed to load session {}", path.display()))?;
    }
    session.set_parameters(params);

    let source_locale = cmd
        .source_locale
        .as_deref()
        .map(LocaleId::new)
        .unwrap_or_else(|| session.source_locale().clone());
    let target_locale = cmd
        .target_locale
        .as_deref()
        .map(LocaleId::new)
        .unwrap_or_else(|| session.target_locale().clone());

    let filters = FilterRegistry::default();
    for file in expand_inputs(&cmd.files, &filters)? {
        let document = raw_document(&filters, &file, &cmd, &source_locale, &target_locale)?;
        session.add_raw_document(document);
    }
    session.set_source_locale(source_locale);
    session.set_target_locale(target_locale);

    session.recheck_all(None).context("Check failed")?;

    if let Some(path) = &cmd.session {
        session
            .save(path)
            .with_context(|| format!("Failed to save session {}", path.display()))?;
    }

    let report = match &cmd.report {
        Some(path) => {
            let params = report_parameters(session.parameters(), path, cmd.report_format.map(OutputType::from));
            Some(generate_report(session.issues(), &params, &root_dir)?)
        }
        None => None,
    };

    let summary = CheckSummary {
        document_count: session.document_count(),
        disabled_count: session.issues().len() - session.enabled_issues().count(),
        session: cmd.session.clone(),
        report,
    };
    let issues = session.enabled_issues().cloned().collect();
    Ok(finish(CommandKind::Check, CommandSummary::Check(summary), issues, true))
}

/// Expands glob patterns and directories into document files. Directories
/// contribute the files a registered filter recognizes, in path order,
/// skipping hidden entries such as `.transcheck.json`.
fn expand_inputs(inputs: &[PathBuf], filters: &FilterRegistry) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let text = input.to_string_lossy();
        if text.contains(['*', '?', '[']) {
            let entries = glob::glob(&text).with_context(|| format!("Invalid pattern {}", text))?;
            let before = files.len();
            for entry in entries {
                let path = entry.with_context(|| format!("Cannot read a match of {}", text))?;
                if path.is_file() {
                    files.push(path);
                }
            }
            if files.len() == before {
                bail!("No document matches {}", text);
            }
        } else if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && filters.guess_config_id(e.path()).is_some())
                .map(|e| e.into_path())
                .collect();
            files.append(&mut found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn raw_document(
    filters: &FilterRegistry,
    file: &Path,
    cmd: &CheckCommand,
    source_locale: &LocaleId,
    target_locale: &LocaleId,
) -> Result<RawDocument> {
    let path = file
        .canonicalize()
        .with_context(|| format!("Cannot open document {}", file.display()))?;
    let filter_id = match &cmd.filter {
        Some(id) => id.clone(),
        None => match filters.guess_config_id(&path) {
            Some(id) => id.to_string(),
            None => bail!(
                "Cannot guess the filter for {}; use --filter",
                file.display()
            ),
        },
    };
    Ok(RawDocument::new(
        &to_file_uri(&path.to_string_lossy()),
        &filter_id,
        &cmd.encoding,
        source_locale.clone(),
        target_locale.clone(),
    ))
}

/// The session parameters with the report destination overridden.
pub(crate) fn report_parameters(params: &Parameters, output: &Path, format: Option<OutputType>) -> Parameters {
    Parameters {
        output_path: output.to_string_lossy().into_owned(),
        output_type: format.unwrap_or(params.output_type),
        ..params.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_expand_directory_keeps_known_documents() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.tsv"), "").unwrap();
        fs::write(dir.path().join("a.json"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".transcheck.json"), "{}").unwrap();
        fs::write(dir.path().join("sub/c.json"), "").unwrap();

        let files = expand_inputs(&[dir.path().to_path_buf()], &FilterRegistry::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, ["a.json", "b.tsv", "sub/c.json"]);
    }

    #[test]
    fn test_expand_glob() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "").unwrap();
        fs::write(dir.path().join("b.json"), "").unwrap();
        fs::write(dir.path().join("c.tsv"), "").unwrap();

        let pattern = dir.path().join("*.json");
        let files = expand_inputs(&[pattern], &FilterRegistry::default()).unwrap();
        assert_eq!(files.len(), 2);

        let none = dir.path().join("*.po");
        assert!(expand_inputs(&[none], &FilterRegistry::default()).is_err());
    }

    #[test]
    fn test_plain_files_pass_through() {
        let files = expand_inputs(&[PathBuf::from("missing.json")], &FilterRegistry::default()).unwrap();
        assert_eq!(files, [PathBuf::from("missing.json")]);
    }

    #[test]
    fn test_report_parameters_override() {
        let params = Parameters::default();
        let overridden = report_parameters(&params, Path::new("out/r.xml"), Some(OutputType::Xml));
        assert_eq!(overridden.output_path, "out/r.xml");
        assert_eq!(overridden.output_type, OutputType::Xml);
        assert_eq!(overridden.check_patterns, params.check_patterns);
    }
}
