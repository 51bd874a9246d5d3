use super::{InputPaths, position};
use crate::issues::Issue;

/// `position<TAB>message<TAB>source<TAB>target`, one document header line
/// before each group.
pub(super) fn render(issues: &[&Issue], paths: &InputPaths) -> String {
    let mut out = String::from("Quality Check Report\t\t\t\n");
    let mut current: Option<&str> = None;
    for issue in issues {
        if current != Some(issue.document_uri()) {
            current = Some(issue.document_uri());
            out.push_str(&format!("{}\t\t\t\n", paths.display(issue.document_uri())));
        }
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            position(issue),
            issue.message(),
            escape_tabs(issue.source_text()),
            escape_tabs(issue.target_text())
        ));
    }
    out
}

fn escape_tabs(text: &str) -> String {
    text.replace('\t', "\\t")
}
