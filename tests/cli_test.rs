use anyhow::Result;
use httpmock::prelude::*;
use std::process::{Command, Output};
use tempfile::TempDir;

const CITATION: &str = "@article{Smith_2020, title={Testing Things}, \
    journal={Journal of Testing}, author={Smith, John}, year={2020}, month=jan}";

fn run_etic(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_etic"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

#[test]
fn test_missing_config_reports_one_reason() -> Result<()> {
    let output = run_etic(&["10.1000/x", "--config", "/nonexistent/etic/config.toml"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr)?;
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines, vec!["No file was found: /nonexistent/etic/config.toml"]);
    Ok(())
}

#[test]
fn test_fetch_failure_reports_one_reason() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/10.1000/missing");
        then.status(404);
    });

    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "MONTH_REGEX = '^\\s*month\\s*=\\s*\\{{?(\\w+)\\}}?,?\\s*$'\n\
             LATEST_ISSN = \"{}\"\nISSN_UPD = \"2000-1-1\"\nURL_BASE = \"{}\"\n",
            server.url("/ltwa.txt.gz"),
            server.url("/")
        ),
    )?;

    let output = run_etic(&[
        "10.1000/missing",
        "--config",
        config.to_str().unwrap(),
        "--data-dir",
        dir.path().to_str().unwrap(),
    ])?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr.lines().filter(|l| !l.trim().is_empty()).count(), 1);
    assert!(stderr.contains("404"));
    Ok(())
}

#[test]
fn test_degraded_warning_is_printed_once() -> Result<()> {
    let dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/10.1000/test.2020");
        then.status(200).body(CITATION);
    });
    server.mock(|when, then| {
        when.method(GET).path("/ltwa.txt.gz");
        then.status(404);
    });

    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "MONTH_REGEX = '^\\s*month\\s*=\\s*\\{{?(\\w+)\\}}?,?\\s*$'\n\
             LATEST_ISSN = \"{}\"\nISSN_UPD = \"2000-1-1\"\nURL_BASE = \"{}\"\n",
            server.url("/ltwa.txt.gz"),
            server.url("/")
        ),
    )?;

    let output = run_etic(&[
        "10.1000/test.2020",
        "--config",
        config.to_str().unwrap(),
        "--data-dir",
        dir.path().join("data").to_str().unwrap(),
    ])?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("@article{smith2020jot,"));

    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(
        stderr.matches("Abbreviation data could not be loaded").count(),
        1
    );
    Ok(())
}
