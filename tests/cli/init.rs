use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CLEAN_DOC, CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["outputPath"], "${rootDir}/qa-report.html");
    assert_eq!(parsed["sessionPath"], "${rootDir}/qa-session.qcs");
    assert_eq!(parsed["charset"], "ISO-8859-1");
    assert_eq!(parsed["leadingWS"], true);
    assert!(
        parsed.get("patterns").is_some_and(Value::is_array),
        "Config should list the default patterns"
    );

    // 2-space indentation
    assert!(content.contains("\n  \"outputPath\""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "✓ Created .transcheck.json\n");
    let content = test.read_file(".transcheck.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".transcheck.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "warning: .transcheck.json already exists\n");
    assert_eq!(test.read_file(".transcheck.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("doc.json", CLEAN_DOC)?;

    let output = test.check_command().arg("doc.json").output()?;
    assert!(
        output.status.success(),
        "Check command should work with initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}
