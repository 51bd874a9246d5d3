use quick_xml::escape::escape;

use super::{InputPaths, position, split_span};
use crate::issues::Issue;

const HEAD: &str = concat!(
    "<head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />",
    "<title>Quality Check Report</title><style type=\"text/css\">",
    "body { font-family: Verdana; font-size: smaller; }",
    "h1 { font-size: 110%; }",
    "h2 { font-size: 100%; }",
    "h3 { font-size: 100%; }",
    "p.s { font-family: Courier New, courier; font-size: 100%;",
    "   border: solid 1px; padding: 0.5em; margin-top:-0.7em; border-color: silver; background-color: #C0FFFF; }",
    "p.t { font-family: Courier New, courier; font-size: 100%; margin-top:-1.1em;",
    "   border: solid 1px; padding: 0.5em; border-color: silver; background-color: #C0FFC0; }",
    "span.hi { background-color: #FFFF00; }",
    "</style></head>",
);

pub(super) fn render(issues: &[&Issue], paths: &InputPaths) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<html>");
    out.push_str(HEAD);
    out.push_str("<body>\n<h1>Quality Check Report</h1>");

    let mut current: Option<&str> = None;
    for issue in issues {
        if current != Some(issue.document_uri()) {
            if current.is_some() {
                out.push_str("<hr />");
            }
            current = Some(issue.document_uri());
            out.push_str(&format!(
                "<p>Input: {}</p>",
                escape(paths.display(issue.document_uri()).as_str())
            ));
        }
        out.push_str(&format!(
            "<p>{}:<br />{}</p>\n",
            escape(position(issue).as_str()),
            escape(issue.message())
        ));
        out.push_str(&format!(
            "<p class='s'>S: '{}'</p><p class='t'>T: '{}'</p>\n",
            highlight(issue.source_text(), issue.source_start(), issue.source_end()),
            highlight(issue.target_text(), issue.target_start(), issue.target_end())
        ));
    }
    if current.is_none() {
        out.push_str("<p>No issue detected.</p>");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn highlight(text: &str, start: i32, end: i32) -> String {
    let html = match split_span(text, start, end) {
        Some((before, hi, after)) => format!(
            "{}<span class='hi'>{}</span>{}",
            escape(before.as_str()),
            escape(hi.as_str()),
            escape(after.as_str())
        ),
        None => escape(text).into_owned(),
    };
    html.replace('\n', "<br/>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::issue;

    #[test]
    fn test_highlight_escapes() {
        assert_eq!(
            highlight("Bonjour <monde>", 8, 15),
            "Bonjour <span class='hi'>&lt;monde&gt;</span>"
        );
        assert_eq!(highlight("a\nb", 0, -1), "a<br/>b");
    }

    #[test]
    fn test_documents_are_separated() {
        let a = issue("file:///work/a.json", "1", "First");
        let b = issue("file:///work/b.json", "1", "Second");
        let paths = InputPaths::new(&[], true);
        let html = render(&[&a, &b], &paths);
        assert!(html.contains("<p>Input: /work/a.json</p>"));
        assert!(html.contains("<hr /><p>Input: /work/b.json</p>"));
        assert!(html.contains("<p>ID=1, segment=0:<br />First</p>"));
        assert!(html.contains("S: 'Hello &lt;world&gt;'"));
    }

    #[test]
    fn test_no_issue() {
        let html = render(&[], &InputPaths::new(&[], true));
        assert!(html.contains("<p>No issue detected.</p>"));
    }
}
