//! Directory tree molting.
//!
//! Walks a template directory depth-first and reproduces it under a fresh output
//! directory. Every entry name goes through [`preprocess_filename`]; entries carrying the
//! `.mustache` marker have their name and (for files) their content rendered with the
//! effective context of their directory.
//!
//! A directory's effective context is its parent's, overridden by the directory's own
//! `.molt.json`/`.molt.yml`/`.molt.yaml` file if present. Override files are not copied.
//!
//! Symbolic links are followed: a link to a directory is molted like a directory, a link
//! to a file like a file. Link cycles and dangling links abort the walk.
//!
//! The first failure aborts the walk. Whatever was written before it stays on disk.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::{is_context_override, load_context, read_context_override};
use crate::context::{resolve_context, Context};
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::filename::{preprocess_filename, validate_rendered_name};
use crate::processor::{create_dir, create_dir_all, Processor};
use crate::renderer::TemplateRenderer;

/// Per-invocation settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoltOptions {
    /// Encoding of files marked for rendering.
    pub encoding: Encoding,
}

/// Destination directory and effective context of a directory being walked.
struct Frame<'c> {
    target: PathBuf,
    context: Cow<'c, Context>,
}

pub struct Molter<'a> {
    renderer: &'a dyn TemplateRenderer,
    options: MoltOptions,
}

impl<'a> Molter<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, options: MoltOptions) -> Self {
        Self { renderer, options }
    }

    /// Loads the context from `config_path` (empty without one) and molts `template_dir`.
    pub fn molt(
        &self,
        template_dir: &Path,
        config_path: Option<&Path>,
        output_dir: &Path,
    ) -> Result<()> {
        let context = match config_path {
            Some(path) => load_context(path)?,
            None => {
                debug!("No configuration file given, using an empty context");
                Context::new()
            }
        };
        self.molt_dir(template_dir, &context, output_dir)
    }

    /// Reproduces every entry of `template_dir` beneath `output_dir`.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if `template_dir` is not a directory
    /// * `Error::PathConflict` if `output_dir` exists, or two entries land on the same path
    /// * `Error::OutputInsideTemplate` if `output_dir` would end up inside `template_dir`
    /// * any error of a single entry, which aborts the walk
    pub fn molt_dir(
        &self,
        template_dir: &Path,
        context: &Context,
        output_dir: &Path,
    ) -> Result<()> {
        if !template_dir.is_dir() {
            return Err(Error::TemplateNotFound { path: template_dir.to_path_buf() });
        }
        if output_dir.exists() {
            return Err(Error::PathConflict { path: output_dir.to_path_buf() });
        }
        let template_root = template_dir.canonicalize().map_err(Error::fs(template_dir))?;
        if resolve_path(output_dir)?.starts_with(&template_root) {
            return Err(Error::OutputInsideTemplate {
                path: output_dir.to_path_buf(),
                template_dir: template_dir.to_path_buf(),
            });
        }
        debug!("Molting {} into {}", template_dir.display(), output_dir.display());
        create_dir_all(output_dir)?;

        let processor = Processor::new(self.renderer, self.options.encoding);
        let mut frames: Vec<Frame<'_>> = Vec::new();

        for entry in WalkDir::new(template_dir).follow_links(true) {
            let entry = entry?;
            let depth = entry.depth();

            if depth == 0 {
                let overrides = read_context_override(entry.path())?;
                let context = resolve_context(Cow::Borrowed(context), overrides.as_ref());
                frames.push(Frame { target: output_dir.to_path_buf(), context });
                continue;
            }

            // Pre-order walk: the frame at `depth - 1` is this entry's parent directory.
            frames.truncate(depth);
            let parent = &frames[depth - 1];
            let name = entry_name(&entry)?;

            if entry.file_type().is_dir() {
                let (destination, _) = self.destination_name(entry.path(), name, &parent.context)?;
                let target = parent.target.join(destination);
                debug!("Creating directory: {}", target.display());
                create_dir(&target)?;

                let overrides = read_context_override(entry.path())?;
                let context = resolve_context(parent.context.clone(), overrides.as_ref());
                frames.push(Frame { target, context });
            } else {
                if is_context_override(name) {
                    debug!("Skipping context override file {}", entry.path().display());
                    continue;
                }
                let (destination, should_render) =
                    self.destination_name(entry.path(), name, &parent.context)?;
                let target = parent.target.join(destination);
                if target.exists() {
                    return Err(Error::PathConflict { path: target });
                }
                debug!("Processing source file: {}", entry.path().display());
                processor.process(entry.path(), target, should_render, &parent.context)?;
            }
        }

        Ok(())
    }

    /// Runs the name grammar, then renders the stripped name when the marker asked for it.
    fn destination_name(
        &self,
        source: &Path,
        raw_name: &str,
        context: &Context,
    ) -> Result<(String, bool)> {
        let decision = preprocess_filename(raw_name)?;
        if !decision.should_render {
            return Ok((decision.destination_name, false));
        }

        let rendered = self
            .renderer
            .render(&decision.destination_name, context)
            .map_err(|e| Error::RenderError { path: source.to_path_buf(), source: e })?;
        validate_rendered_name(raw_name, &rendered)?;
        Ok((rendered, true))
    }
}

/// Absolute form of a path that may not exist yet.
///
/// The longest existing ancestor is canonicalized, so symlinks and `..` in that part are
/// resolved; the missing components are appended as they are.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(Error::fs(path))?;
    let mut missing = Vec::new();
    let mut existing = absolute.as_path();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(missing.iter().rev().fold(canonical, |base, name| base.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(absolute.clone()),
        }
    }
}

fn entry_name(entry: &DirEntry) -> Result<&str> {
    entry.file_name().to_str().ok_or_else(|| Error::NamingError {
        name: entry.file_name().to_string_lossy().into_owned(),
        reason: "file name is not valid UTF-8".to_string(),
    })
}
