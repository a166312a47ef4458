use std::fs;

use molt::dirchooser::choose_output_dir;
use tempfile::TempDir;

#[test]
fn test_free_base_is_used_as_is() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("output");
    assert_eq!(choose_output_dir(&base), base);
}

#[test]
fn test_numbered_suffix_when_taken() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("output");
    fs::create_dir(&base).unwrap();
    fs::create_dir(temp_dir.path().join("output (1)")).unwrap();

    assert_eq!(choose_output_dir(&base), temp_dir.path().join("output (2)"));
}

#[test]
fn test_existing_file_also_counts_as_taken() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("output");
    fs::write(&base, "not a directory").unwrap();

    let chosen = choose_output_dir(&base);
    assert_eq!(chosen, temp_dir.path().join("output (1)"));
    assert!(!chosen.exists());
}
