use std::fmt::Display;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{InputPaths, split_span};
use crate::error::ReportError;
use crate::issues::Issue;

type XmlWriter = Writer<Vec<u8>>;

fn xml_error(err: impl Display) -> ReportError {
    ReportError::Xml(err.to_string())
}

pub(super) fn render(issues: &[&Issue], paths: &InputPaths) -> Result<String, ReportError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    text(&mut writer, "\n")?;
    start(&mut writer, "qualityCheckReport")?;
    text(&mut writer, "\n")?;
    start(&mut writer, "issues")?;
    text(&mut writer, "\n")?;

    for issue in issues {
        start(&mut writer, "issue")?;
        text(&mut writer, "\n")?;
        field(&mut writer, "input", &paths.display(issue.document_uri()))?;
        field(&mut writer, "tuName", issue.tu_name().unwrap_or_default())?;
        field(&mut writer, "tuId", issue.tu_id())?;
        field(&mut writer, "segId", issue.seg_id().unwrap_or_default())?;
        field(&mut writer, "severity", &issue.display_severity().index().to_string())?;
        field(&mut writer, "issueType", issue.issue_type().as_str())?;
        field(&mut writer, "message", issue.message())?;
        highlighted(&mut writer, "source", issue.source_text(), issue.source_start(), issue.source_end())?;
        highlighted(&mut writer, "target", issue.target_text(), issue.target_start(), issue.target_end())?;
        end(&mut writer, "issue")?;
        text(&mut writer, "\n")?;
    }

    end(&mut writer, "issues")?;
    text(&mut writer, "\n")?;
    end(&mut writer, "qualityCheckReport")?;
    text(&mut writer, "\n")?;
    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn start(writer: &mut XmlWriter, name: &str) -> Result<(), ReportError> {
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_error)
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<(), ReportError> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)
}

fn text(writer: &mut XmlWriter, content: &str) -> Result<(), ReportError> {
    writer.write_event(Event::Text(BytesText::new(content))).map_err(xml_error)
}

/// `\t<name>value</name>\n`
fn field(writer: &mut XmlWriter, name: &str, value: &str) -> Result<(), ReportError> {
    text(writer, "\t")?;
    start(writer, name)?;
    text(writer, value)?;
    end(writer, name)?;
    text(writer, "\n")
}

/// Like [`field`], with the span wrapped in `<hi>`.
fn highlighted(writer: &mut XmlWriter, name: &str, value: &str, span_start: i32, span_end: i32) -> Result<(), ReportError> {
    let Some((before, hi, after)) = split_span(value, span_start, span_end) else {
        return field(writer, name, value);
    };
    text(writer, "\t")?;
    start(writer, name)?;
    text(writer, &before)?;
    start(writer, "hi")?;
    text(writer, &hi)?;
    end(writer, "hi")?;
    text(writer, &after)?;
    end(writer, name)?;
    text(writer, "\n")
}
