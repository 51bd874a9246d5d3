use anyhow::Result;

use crate::{CLEAN_DOC, CliTest, FLAWED_DOC, signatures, stderr, stdout};

#[test]
fn test_check_clean_document() -> Result<()> {
    let test = CliTest::with_file("doc.json", CLEAN_DOC)?;

    let output = test.check_command().arg("doc.json").output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "✓ Checked 1 document - no issues found\n");
    Ok(())
}

#[test]
fn test_check_reports_issues() -> Result<()> {
    let test = CliTest::with_file("doc.json", FLAWED_DOC)?;

    let output = test.check_command().arg("doc.json").output()?;
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("warning: \"Translation is the same as the source.\"  TARGET_SAME_AS_SOURCE"));
    assert!(text.contains("warning: \"Missing trailing white space at position 7.\"  MISSING_TRAILINGWS"));
    assert!(text.contains("ID=1, segment=0"));
    assert!(text.contains("S | Pay now \n  |        ^\n"));
    assert!(text.ends_with("✘ 2 problems (0 errors, 2 warnings)\n"));

    let signatures = signatures(&output);
    assert_eq!(signatures.len(), 2);
    assert!(signatures.iter().all(|s| s.starts_with("1:")));
    Ok(())
}

#[test]
fn test_check_respects_config() -> Result<()> {
    let test = CliTest::with_file("doc.json", FLAWED_DOC)?;
    test.write_file(
        ".transcheck.json",
        r#"{ "targetSameAsSource": false, "trailingWS": false }"#,
    )?;

    let output = test.check_command().arg("doc.json").output()?;

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    Ok(())
}

#[test]
fn test_check_directory() -> Result<()> {
    let test = CliTest::with_file("docs/a.json", CLEAN_DOC)?;
    test.write_file("docs/b.json", CLEAN_DOC)?;
    test.write_file("docs/readme.txt", "not a document")?;

    let output = test.check_command().arg("docs").output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Checked 2 documents"));
    Ok(())
}

#[test]
fn test_check_writes_report() -> Result<()> {
    let test = CliTest::with_file("doc.json", FLAWED_DOC)?;
    test.write_file(".transcheck.json", r#"{ "showFullPath": false }"#)?;

    let output = test
        .check_command()
        .args(["doc.json", "--report", "out/report.txt", "--report-format", "tab"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Wrote out/report.txt"));
    let report = test.read_file("out/report.txt")?;
    assert!(report.starts_with("Quality Check Report\t\t\t\ndoc.json\t\t\t\n"));
    assert!(report.contains("ID=1, segment=0\tTranslation is the same as the source.\tHello\tHello\n"));
    assert!(report.contains("Missing trailing white space at position 7.\tPay now \tPayez\n"));
    Ok(())
}

#[test]
fn test_check_unknown_extension_needs_filter() -> Result<()> {
    let test = CliTest::with_file("doc.po", "msgid \"\"")?;

    let output = test.check_command().arg("doc.po").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Cannot guess the filter"));
    Ok(())
}

#[test]
fn test_check_missing_document() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_command().arg("absent.json").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error: Cannot open document absent.json"));
    Ok(())
}

#[test]
fn test_check_tsv_document() -> Result<()> {
    let test = CliTest::with_file("doc.tsv", "1\tHello world\tBonjour le monde\n")?;

    let output = test.check_command().arg("doc.tsv").output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    Ok(())
}
