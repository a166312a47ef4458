//! Common constants used throughout molt.

/// Suffix marking a file (or directory) as a template to render.
pub const MUSTACHE_EXTENSION: &str = ".mustache";

/// Suffix marking a file whose `.mustache` name must be kept and whose content is copied as-is.
pub const SKIP_MUSTACHE_EXTENSION: &str = ".skip.mustache";

/// Per-directory context override file names. A directory may hold at most one of them.
pub const CONTEXT_FILES: [&str; 3] = [".molt.json", ".molt.yml", ".molt.yaml"];

/// Top-level key wrapping the context inside a configuration file.
pub const CONTEXT_KEY: &str = "context";

/// Output directory used when none is given on the command line.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// License text shown by `--license`.
pub const LICENSE: &str = include_str!("../LICENSE");
