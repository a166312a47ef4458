//! Configuration handling for molt templates.
//! Loads the context a template is rendered with, from JSON or YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::constants::{CONTEXT_FILES, CONTEXT_KEY};
use crate::context::Context;
use crate::error::{Error, Result};

/// Supported notations for context files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    /// Unknown extension: JSON first, YAML as a fallback.
    Any,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Format::Json,
            Some("yml" | "yaml") => Format::Yaml,
            _ => Format::Any,
        }
    }
}

/// Loads a context from a JSON or YAML file.
///
/// The top level must be a mapping. When it holds a `context` key whose value is itself
/// a mapping, that inner mapping is the context and the remaining keys are ignored.
///
/// # Errors
/// * `Error::ConfigError` if the file is missing, unreadable or not a mapping
pub fn load_context<P: AsRef<Path>>(path: P) -> Result<Context> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(config_error(path, "file not found"));
    }
    debug!("Loading context from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| config_error(path, e))?;
    parse_context(&content, Format::from_path(path)).map_err(|reason| config_error(path, reason))
}

/// Looks for a context override file directly inside `dir`.
///
/// # Errors
/// * `Error::ConfigError` if more than one of `.molt.json`, `.molt.yml`, `.molt.yaml` exists
pub fn find_context_override<P: AsRef<Path>>(dir: P) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    let found: Vec<&str> =
        CONTEXT_FILES.iter().copied().filter(|file| dir.join(file).is_file()).collect();

    match found.as_slice() {
        [] => Ok(None),
        [file] => Ok(Some(dir.join(file))),
        _ => Err(config_error(
            dir,
            format!("more than one context override file ({})", found.join(", ")),
        )),
    }
}

/// Loads the override context of `dir`, if it has one.
pub fn read_context_override<P: AsRef<Path>>(dir: P) -> Result<Option<Context>> {
    find_context_override(dir)?.map(load_context).transpose()
}

/// Whether a template file name is a context override file rather than template content.
pub fn is_context_override(file_name: &str) -> bool {
    CONTEXT_FILES.contains(&file_name)
}

fn parse_context(content: &str, format: Format) -> std::result::Result<Context, String> {
    let context: Context = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
        Format::Any => match serde_json::from_str(content) {
            Ok(context) => context,
            Err(_) => serde_yaml::from_str(content)
                .map_err(|e| format!("Invalid configuration format: {e}"))?,
        },
    };

    match context.get(CONTEXT_KEY) {
        Some(Value::Object(inner)) => Ok(inner.clone().into_iter().collect()),
        _ => Ok(context),
    }
}

fn config_error<R: ToString>(path: &Path, reason: R) -> Error {
    Error::ConfigError { path: path.to_path_buf(), reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("sample.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("sample.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("sample.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("sample")), Format::Any);
    }

    #[test]
    fn test_any_format_falls_back_to_yaml() {
        let context = parse_context("name: demo\nversion: 2\n", Format::Any).unwrap();
        assert_eq!(context.get("name"), Some(&Value::from("demo")));
        assert_eq!(context.get("version"), Some(&Value::from(2)));
    }

    #[test]
    fn test_top_level_sequence_is_rejected() {
        assert!(parse_context("[1, 2, 3]", Format::Json).is_err());
        assert!(parse_context("- a\n- b\n", Format::Yaml).is_err());
    }
}
