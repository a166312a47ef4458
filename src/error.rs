//! Error handling for molt.
//! Every failure carries the path it happened on, the first one aborts the whole run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::encoding::Encoding;
use crate::renderer::RenderError;

/// Custom error types for molt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A file name that cannot be turned into a destination name.
    #[error("Invalid file name '{name}': {reason}.")]
    NamingError { name: String, reason: String },

    /// Context file missing, unreadable, or not a mapping at the top level.
    #[error("Configuration error in '{}': {reason}.", .path.display())]
    ConfigError { path: PathBuf, reason: String },

    /// The templating engine rejected a template.
    #[error("Failed to render '{}': {source}.", .path.display())]
    RenderError {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("Failed to decode '{}' as {encoding}.", .path.display())]
    DecodeError { path: PathBuf, encoding: Encoding },

    #[error("Failed to encode rendered '{}' as {encoding}.", .path.display())]
    EncodeError { path: PathBuf, encoding: Encoding },

    /// Any read, write, list or mkdir failure.
    #[error("File system error at '{}': {source}.", .path.display())]
    FileSystemError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination already exists and would be clobbered.
    #[error("Path '{}' already exists.", .path.display())]
    PathConflict { path: PathBuf },

    #[error("Template directory '{}' does not exist.", .path.display())]
    TemplateNotFound { path: PathBuf },

    /// The output directory would be created inside the template being walked.
    #[error(
        "Output directory '{}' lies inside template directory '{}'.",
        .path.display(),
        .template_dir.display()
    )]
    OutputInsideTemplate { path: PathBuf, template_dir: PathBuf },
}

impl Error {
    /// Wraps an I/O failure together with the path it happened on.
    pub fn fs<P: AsRef<Path>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Error::FileSystemError { path, source }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        Error::FileSystemError { path, source: err.into() }
    }
}

/// Convenience type alias for Results with molt's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Text printed for a failed run.
///
/// Verbose runs get the full error structure, including every underlying cause; otherwise
/// a hint tells how to get it.
pub fn error_report(err: &Error, verbose: bool) -> String {
    if verbose {
        format!("{err}\n{err:#?}")
    } else {
        format!("{err}\nPass -v or --verbose for details.")
    }
}

/// Default error handler that prints the error and exits the program.
///
/// Only the binary calls this; the library never prints.
pub fn default_error_handler(err: Error, verbose: bool) {
    eprintln!("{}", error_report(&err, verbose));
    std::process::exit(1);
}
