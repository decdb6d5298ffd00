//! Integration tests for configuration management
//!
//! These tests verify that the configuration, secrets, and master prompt
//! documents load from disk in either supported format.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use sdk::errors::ReportError;
use session_report::config::{load_master_prompt, Config};
use session_report::secrets::Secrets;

#[test]
fn test_config_yaml_parsing() {
    let yaml_content = r#"
data_sources:
  program_url: "https://conference.example.org/program"
  lightning_talks_url: "https://docs.example.org/talks.csv"
  search_dir: "inputs"

model:
  provider: anthropic
  name: claude-3-5-sonnet-20241022
  max_tokens: 8000
  temperature: 0.3

system:
  system_message: "You write concise breakout session reports."
  log_level: debug

staging:
  directory: "staged"

output:
  directory: "reports"
  report_file: "session.txt"
  report_title: "Breakout Report"
"#;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(&path, yaml_content).unwrap();

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(
        config.data_sources.program_url.as_deref(),
        Some("https://conference.example.org/program")
    );
    assert_eq!(config.data_sources.search_dir, PathBuf::from("inputs"));
    assert_eq!(config.model.provider, "anthropic");
    assert_eq!(config.model.max_tokens, 8000);
    assert_eq!(config.model.base_url(), "https://api.anthropic.com/v1");
    assert_eq!(config.model.secret_key(), "anthropic_api_key");
    assert_eq!(config.system.log_level, "debug");
    assert_eq!(config.staging.directory, PathBuf::from("staged"));
    assert_eq!(config.output.report_file, "session.txt");
    assert_eq!(config.output.report_title, "Breakout Report");
}

#[test]
fn test_config_toml_parsing() {
    let toml_content = r#"
[data_sources]
program_url = "https://conference.example.org/program"

[model]
provider = "openai"
name = "gpt-4o"
base_url = "http://localhost:8080/v1/"

[output]
directory = "out"
"#;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, toml_content).unwrap();

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.model.name, "gpt-4o");
    assert_eq!(config.model.base_url(), "http://localhost:8080/v1");
    assert!(config.data_sources.lightning_talks_url.is_none());
    assert_eq!(config.output.directory, PathBuf::from("out"));
    assert_eq!(config.output.report_file, "draft_report.txt");
}

#[test]
fn test_invalid_log_level_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(&path, "system:\n  log_level: loud\n").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
}

#[test]
fn test_malformed_yaml_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(&path, "model: [unclosed\n").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
}

#[test]
fn test_secrets_yaml_and_toml() {
    let temp = TempDir::new().unwrap();

    let yaml_path = temp.path().join("secrets.yml");
    fs::write(&yaml_path, "openai_api_key: sk-yaml\nretries: 3\n").unwrap();
    let secrets = Secrets::load_from_path(&yaml_path).unwrap();
    assert_eq!(secrets.get("openai_api_key").unwrap().unsecure(), "sk-yaml");
    assert!(matches!(
        secrets.get("retries"),
        Err(ReportError::MissingSecret(_))
    ));

    let toml_path = temp.path().join("secrets.toml");
    fs::write(&toml_path, "anthropic_api_key = \"sk-toml\"\n").unwrap();
    let secrets = Secrets::load_from_path(&toml_path).unwrap();
    assert_eq!(secrets.get("anthropic_api_key").unwrap().unsecure(), "sk-toml");
}

#[test]
fn test_missing_secrets_file() {
    let temp = TempDir::new().unwrap();
    let err = Secrets::load_from_path(&temp.path().join("secrets.yml")).unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
}

#[test]
fn test_master_prompt_preserves_multiline_text() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("master_prompt.yaml");
    fs::write(
        &path,
        "master_prompt: |\n  You are drafting a report.\n\n  Use the sections below.\n",
    )
    .unwrap();

    let prompt = load_master_prompt(&path).unwrap();
    assert_eq!(prompt, "You are drafting a report.\n\nUse the sections below.\n");
}

#[test]
fn test_blank_master_prompt_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("master_prompt.yaml");
    fs::write(&path, "master_prompt: \"   \"\n").unwrap();

    let err = load_master_prompt(&path).unwrap_err();
    assert!(matches!(err, ReportError::MasterPrompt(_)));
}
