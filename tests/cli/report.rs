use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, FLAWED_DOC, stderr, stdout};

fn checked_session(test: &CliTest) -> Result<()> {
    test.write_file(".transcheck.json", r#"{ "showFullPath": false, "trailingWS": false }"#)?;
    test.write_file("doc.json", FLAWED_DOC)?;
    test.check_command()
        .args(["doc.json", "--session", "work.qcs"])
        .output()?;
    Ok(())
}

#[test]
fn test_report_xml() -> Result<()> {
    let test = CliTest::new()?;
    checked_session(&test)?;

    let output = test
        .command()
        .args(["report", "--session", "work.qcs", "--output", "report.xml", "--format", "xml"])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "Wrote report.xml (1 issue(s))\n");
    let report = test.read_file("report.xml")?;
    assert!(report.contains("<input>doc.json</input>"));
    assert!(report.contains("<issueType>TARGET_SAME_AS_SOURCE</issueType>"));
    assert!(report.contains("<message>Translation is the same as the source.</message>"));
    Ok(())
}

#[test]
fn test_report_tab() -> Result<()> {
    let test = CliTest::new()?;
    checked_session(&test)?;

    let output = test
        .command()
        .args(["report", "--session", "work.qcs", "--output", "out/report.txt", "--format", "tab"])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_snapshot!(
        test.read_file("out/report.txt")?.replace('\t', "<TAB>"),
        @r"
    Quality Check Report<TAB><TAB><TAB>
    doc.json<TAB><TAB><TAB>
    ID=1, segment=0<TAB>Translation is the same as the source.<TAB>Hello<TAB>Hello
    "
    );
    Ok(())
}

#[test]
fn test_report_uses_session_output_path() -> Result<()> {
    let test = CliTest::new()?;
    checked_session(&test)?;

    let output = test
        .command()
        .args(["report", "--session", "work.qcs"])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report_path = test.root().join("qa-report.html");
    assert!(report_path.exists());
    let html = std::fs::read_to_string(report_path)?;
    assert!(html.contains("<h1>Quality Check Report</h1>"));
    assert!(html.contains("Translation is the same as the source."));
    Ok(())
}
