use std::error::Error as _;
use std::io;
use std::path::PathBuf;

use molt::encoding::Encoding;
use molt::error::{error_report, Error};
use molt::renderer::RenderError;

#[test]
fn test_fs_error_keeps_path_and_cause() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err = Error::fs("template/README.md")(io_err);

    match &err {
        Error::FileSystemError { path, source } => {
            assert_eq!(path, &PathBuf::from("template/README.md"));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        _ => panic!("Expected FileSystemError variant"),
    }
    assert!(err.source().is_some());
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError {
        path: PathBuf::from("sample.json"),
        reason: "file not found".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error in 'sample.json': file not found.");

    let err = Error::RenderError {
        path: PathBuf::from("README.md.mustache"),
        source: RenderError::new("missing variable"),
    };
    assert_eq!(err.to_string(), "Failed to render 'README.md.mustache': missing variable.");

    let err = Error::DecodeError { path: PathBuf::from("logo.mustache"), encoding: Encoding::Utf8 };
    assert_eq!(err.to_string(), "Failed to decode 'logo.mustache' as utf-8.");

    let err = Error::PathConflict { path: PathBuf::from("output") };
    assert_eq!(err.to_string(), "Path 'output' already exists.");

    let err = Error::NamingError { name: ".mustache".to_string(), reason: "empty".to_string() };
    assert_eq!(err.to_string(), "Invalid file name '.mustache': empty.");

    let err = Error::OutputInsideTemplate {
        path: PathBuf::from("template/out"),
        template_dir: PathBuf::from("template"),
    };
    assert_eq!(
        err.to_string(),
        "Output directory 'template/out' lies inside template directory 'template'."
    );
}

#[test]
fn test_error_report() {
    let err = Error::RenderError {
        path: PathBuf::from("README.md.mustache"),
        source: RenderError::new("undefined name 'author' at line 3"),
    };

    let short = error_report(&err, false);
    assert!(short.starts_with("Failed to render 'README.md.mustache'"));
    assert!(short.ends_with("Pass -v or --verbose for details."));

    let long = error_report(&err, true);
    assert!(long.contains("RenderError {"));
    assert!(long.contains("at line 3"));
    assert!(!long.contains("Pass -v"));
}
