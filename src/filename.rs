//! File name grammar.
//!
//! A template entry name decides both where the entry lands and whether its content goes
//! through the templating engine:
//!
//! | source name            | destination        | rendered |
//! |------------------------|--------------------|----------|
//! | `README.md`            | `README.md`        | no       |
//! | `README.md.mustache`   | `README.md`        | yes      |
//! | `README.skip.mustache` | `README.mustache`  | no       |

use crate::constants::{MUSTACHE_EXTENSION, SKIP_MUSTACHE_EXTENSION};
use crate::error::{Error, Result};

/// Outcome of running one raw name through [`preprocess_filename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameDecision {
    pub destination_name: String,
    pub should_render: bool,
}

impl FileNameDecision {
    fn new<S: Into<String>>(destination_name: S, should_render: bool) -> Self {
        Self { destination_name: destination_name.into(), should_render }
    }
}

/// Parses a single file or directory name against the naming grammar.
///
/// The skip form is checked first, otherwise `README.skip.mustache` would be
/// rendered and written as `README.skip`.
///
/// # Errors
/// * `Error::NamingError` if the name is empty or stripping the marker leaves nothing
pub fn preprocess_filename(raw_name: &str) -> Result<FileNameDecision> {
    if raw_name.is_empty() {
        return Err(naming_error(raw_name, "empty file name"));
    }

    if let Some(base) = raw_name.strip_suffix(SKIP_MUSTACHE_EXTENSION) {
        return Ok(FileNameDecision::new(format!("{base}{MUSTACHE_EXTENSION}"), false));
    }

    match raw_name.strip_suffix(MUSTACHE_EXTENSION) {
        Some("") => Err(naming_error(raw_name, "nothing left after stripping the template marker")),
        Some(base) => Ok(FileNameDecision::new(base, true)),
        None => Ok(FileNameDecision::new(raw_name, false)),
    }
}

/// Checks that a rendered name is a single, usable path component.
pub fn validate_rendered_name(raw_name: &str, rendered: &str) -> Result<()> {
    let reason = if rendered.trim().is_empty() {
        "rendered name is empty"
    } else if rendered == "." || rendered == ".." {
        "rendered name is a relative directory reference"
    } else if rendered.contains(['/', '\\']) {
        "rendered name contains a path separator"
    } else {
        return Ok(());
    };
    Err(naming_error(raw_name, reason))
}

fn naming_error(name: &str, reason: &str) -> Error {
    Error::NamingError { name: name.to_string(), reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rendered_name() {
        assert!(validate_rendered_name("{{name}}", "demo").is_ok());
        assert!(validate_rendered_name("{{name}}", "").is_err());
        assert!(validate_rendered_name("{{name}}", "  ").is_err());
        assert!(validate_rendered_name("{{name}}", "..").is_err());
        assert!(validate_rendered_name("{{name}}", "a/b").is_err());
        assert!(validate_rendered_name("{{name}}", "a\\b").is_err());
    }
}
