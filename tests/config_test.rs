// tests/config_test.rs
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tag_bump::analyzer::KeywordPriorityTable;
use tag_bump::config::load_config;
use tag_bump::domain::VersionBump;
use tag_bump::VersioningError;
use tempfile::{Builder, TempDir};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_load_json_fixture() {
    let config = load_config(Some(&fixture("config.json")), None)
        .expect("Failed to load test config");
    assert_eq!(config.tag_format, "v{major}.{minor}.{patch}");
    assert!(config.keyword.patch.contains(&"infra".to_string()));
    assert_eq!(config.github.api_url, "https://api.github.com");

    let table = KeywordPriorityTable::build(&config.keyword).unwrap();
    assert_eq!(table.level_of("maintenance"), Some(VersionBump::Patch));
    assert_eq!(table.level_of("feat"), Some(VersionBump::Minor));
}

#[test]
fn test_load_toml_file() {
    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    let toml_content = r#"
tag_format = "release/{major}.{minor}.{patch}"

[keyword]
minor = ["feat"]
major = ["breaking"]

[github]
api_url = "https://github.example.com/api/v3"
timeout_secs = 3
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), None).unwrap();
    assert_eq!(config.tag_format, "release/{major}.{minor}.{patch}");
    assert_eq!(config.github.api_url, "https://github.example.com/api/v3");
    assert_eq!(config.github.timeout_secs, 3);
    assert_eq!(config.github.concurrency, 1);
}

#[test]
fn test_explicit_missing_path_is_not_found() {
    let err = load_config(Some(&fixture("does-not-exist.json")), None).unwrap_err();
    assert!(matches!(err, VersioningError::ConfigNotFound(_)));
}

#[test]
fn test_malformed_json_is_config_error() {
    let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
    temp_file.write_all(b"{ \"tag_format\": ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), None).unwrap_err();
    assert!(matches!(err, VersioningError::Config(_)));
}

#[test]
fn test_duplicate_keyword_fixture_is_rejected_at_load() {
    let err = load_config(Some(&fixture("duplicate_keyword.toml")), None).unwrap_err();
    assert!(matches!(err, VersioningError::DuplicateKeyword { .. }));
    assert!(err.is_config_error());
}

#[test]
#[serial]
fn test_action_path_lookup() {
    let cwd = TempDir::new().unwrap();
    let action = TempDir::new().unwrap();
    fs::write(
        action.path().join("config.json"),
        r#"{"tag_format": "app-{major}.{minor}.{patch}"}"#,
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(cwd.path()).unwrap();
    let result = load_config(None, Some(action.path()));
    env::set_current_dir(original_dir).unwrap();

    assert_eq!(result.unwrap().tag_format, "app-{major}.{minor}.{patch}");
}

#[test]
#[serial]
fn test_current_directory_file_wins() {
    let cwd = TempDir::new().unwrap();
    let action = TempDir::new().unwrap();
    fs::write(
        cwd.path().join("tag-bump.toml"),
        "tag_format = \"local-{major}.{minor}.{patch}\"\n",
    )
    .unwrap();
    fs::write(
        action.path().join("config.json"),
        r#"{"tag_format": "action-{major}.{minor}.{patch}"}"#,
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(cwd.path()).unwrap();
    let result = load_config(None, Some(action.path()));
    env::set_current_dir(original_dir).unwrap();

    assert_eq!(result.unwrap().tag_format, "local-{major}.{minor}.{patch}");
}

#[test]
#[serial]
fn test_no_config_anywhere_is_not_found() {
    let cwd = TempDir::new().unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(cwd.path()).unwrap();
    let result = load_config(None, None);
    env::set_current_dir(original_dir).unwrap();

    assert!(matches!(result, Err(VersioningError::ConfigNotFound(_))));
}
