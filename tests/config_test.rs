use std::fs;

use molt::config::{
    find_context_override, is_context_override, load_context, read_context_override,
};
use molt::error::Error;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_load_json_context() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"name": "demo", "project": {"version": "0.1.0"}}"#).unwrap();

    let context = load_context(&path).unwrap();
    assert_eq!(context.get("name"), Some(&json!("demo")));
    assert_eq!(context.lookup("project.version"), Some(&json!("0.1.0")));
}

#[test]
fn test_load_yaml_context() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.yml");
    fs::write(&path, "name: demo\nfeatures:\n  - cli\n  - docs\n").unwrap();

    let context = load_context(&path).unwrap();
    assert_eq!(context.get("name"), Some(&json!("demo")));
    assert_eq!(context.get("features"), Some(&json!(["cli", "docs"])));
}

#[test]
fn test_context_wrapper_is_unwrapped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"description": "sample", "context": {"name": "demo"}}"#).unwrap();

    let context = load_context(&path).unwrap();
    assert_eq!(context.get("name"), Some(&json!("demo")));
    assert_eq!(context.get("description"), None);
}

#[test]
fn test_scalar_context_key_is_kept() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"context": "web", "name": "demo"}"#).unwrap();

    let context = load_context(&path).unwrap();
    assert_eq!(context.get("context"), Some(&json!("web")));
    assert_eq!(context.len(), 2);
}

#[test]
fn test_key_order_is_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();

    let context = load_context(&path).unwrap();
    assert_eq!(context.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_missing_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_context(temp_dir.path().join("nope.json"));
    assert!(matches!(result, Err(Error::ConfigError { .. })));
}

#[test]
fn test_non_mapping_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(matches!(load_context(&path), Err(Error::ConfigError { .. })));

    let path = temp_dir.path().join("broken.json");
    fs::write(&path, r#"{"name": "demo""#).unwrap();
    assert!(matches!(load_context(&path), Err(Error::ConfigError { .. })));
}

#[test]
fn test_find_context_override() {
    let temp_dir = TempDir::new().unwrap();
    assert_eq!(find_context_override(temp_dir.path()).unwrap(), None);
    assert!(read_context_override(temp_dir.path()).unwrap().is_none());

    fs::write(temp_dir.path().join(".molt.yaml"), "name: yaml\n").unwrap();

    assert_eq!(
        find_context_override(temp_dir.path()).unwrap(),
        Some(temp_dir.path().join(".molt.yaml"))
    );
    let overrides = read_context_override(temp_dir.path()).unwrap().unwrap();
    assert_eq!(overrides.get("name"), Some(&json!("yaml")));
}

#[test]
fn test_multiple_context_overrides_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".molt.yaml"), "name: yaml\n").unwrap();
    fs::write(temp_dir.path().join(".molt.json"), r#"{"name": "json"}"#).unwrap();

    match find_context_override(temp_dir.path()) {
        Err(Error::ConfigError { path, reason }) => {
            assert_eq!(path, temp_dir.path());
            assert!(reason.contains(".molt.json"));
            assert!(reason.contains(".molt.yaml"));
        }
        other => panic!("Expected ConfigError, got {other:?}"),
    }
    assert!(read_context_override(temp_dir.path()).is_err());
}

#[test]
fn test_is_context_override() {
    assert!(is_context_override(".molt.json"));
    assert!(is_context_override(".molt.yml"));
    assert!(is_context_override(".molt.yaml"));
    assert!(!is_context_override("molt.json"));
    assert!(!is_context_override(".molt.json.mustache"));
}
