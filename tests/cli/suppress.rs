use anyhow::Result;

use crate::{CliTest, FLAWED_DOC, signatures, stderr, stdout};

#[test]
fn test_suppress_survives_recheck() -> Result<()> {
    let test = CliTest::with_file("doc.json", FLAWED_DOC)?;

    let first = test
        .check_command()
        .args(["doc.json", "--session", "work.qcs"])
        .output()?;
    assert_eq!(first.status.code(), Some(1));
    assert!(test.root().join("work.qcs").exists());
    let signature = signatures(&first).remove(0);

    let suppress = test
        .command()
        .args(["suppress", "--session", "work.qcs", signature.as_str()])
        .output()?;
    assert_eq!(suppress.status.code(), Some(0), "stderr: {}", stderr(&suppress));
    assert_eq!(stdout(&suppress), "Suppressed 1 issue(s) in work.qcs\n");

    let second = test
        .check_command()
        .args(["doc.json", "--session", "work.qcs"])
        .output()?;
    let text = stdout(&second);
    assert_eq!(second.status.code(), Some(1));
    assert!(!text.contains("TARGET_SAME_AS_SOURCE"));
    assert!(text.contains("MISSING_TRAILINGWS"));
    assert!(text.contains("✘ 1 problems (0 errors, 1 warning)"));
    Ok(())
}

#[test]
fn test_suppress_all_issues_passes_check() -> Result<()> {
    let test = CliTest::with_file("doc.json", FLAWED_DOC)?;

    let first = test
        .check_command()
        .args(["doc.json", "--session", "work.qcs"])
        .output()?;
    let mut args = vec!["suppress".to_string(), "--session".to_string(), "work.qcs".to_string()];
    args.extend(signatures(&first));
    test.command().args(&args).output()?;

    let second = test
        .check_command()
        .args(["doc.json", "--session", "work.qcs"])
        .output()?;
    assert_eq!(second.status.code(), Some(0));
    assert_eq!(
        stdout(&second),
        "✓ Checked 1 document - no issues found (2 suppressed)\nSaved work.qcs\n"
    );
    Ok(())
}

#[test]
fn test_suppress_unknown_signature() -> Result<()> {
    let test = CliTest::with_file("doc.json", FLAWED_DOC)?;
    test.check_command()
        .args(["doc.json", "--session", "work.qcs"])
        .output()?;

    let output = test
        .command()
        .args(["suppress", "--session", "work.qcs", "1:0000"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("warning: no enabled issue matches the given signature(s)"));
    Ok(())
}

#[test]
fn test_suppress_missing_session() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .command()
        .args(["suppress", "--session", "absent.qcs", "1:0000"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error: Failed to load session absent.qcs"));
    Ok(())
}

#[test]
fn test_suppress_rejects_foreign_file() -> Result<()> {
    let test = CliTest::with_file("work.qcs", "not a session")?;

    let output = test
        .command()
        .args(["suppress", "--session", "work.qcs", "1:0000"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to load session work.qcs"));
    Ok(())
}
