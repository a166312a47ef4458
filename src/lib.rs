//! molt turns a template directory into a concrete project tree.
//! File names and contents may carry Mustache placeholders, filled in from a JSON or
//! YAML context.

/// Command-line interface module for the molt application
pub mod cli;

/// Context file loading
/// Supports JSON and YAML, plus per-directory .molt.json/.molt.yml/.molt.yaml overrides
pub mod config;

/// Common constants
pub mod constants;

/// Template context and override resolution
pub mod context;

/// Default output directory selection
pub mod dirchooser;

/// Strict text encodings for rendered files
pub mod encoding;

/// Error types and handling for the molt application
pub mod error;

/// File name grammar (.mustache / .skip.mustache)
pub mod filename;

/// Template tree traversal
/// Combines all components to generate the final output
pub mod molter;

/// Strict Mustache parser and renderer
pub mod mustache;

/// Render or copy of single files
pub mod processor;

/// Templating engine adapter
pub mod renderer;
