//! Render/copy execution for single template files.
//! Decides what bytes land at a destination and writes them there.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::context::Context;
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// What to do with one template file.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOperation {
    /// Copy the source bytes untouched.
    Copy { target: PathBuf },
    /// Write rendered, already encoded content.
    Write { target: PathBuf, content: Vec<u8> },
}

impl FileOperation {
    pub fn target(&self) -> &Path {
        match self {
            FileOperation::Copy { target } | FileOperation::Write { target, .. } => target,
        }
    }
}

pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    encoding: Encoding,
}

impl<'a> Processor<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, encoding: Encoding) -> Self {
        Self { renderer, encoding }
    }

    /// Computes the operation for `source` without touching the destination.
    ///
    /// Files that are not rendered are never read or decoded, so binary content is safe
    /// as long as its name carries no render marker.
    pub fn plan(
        &self,
        source: &Path,
        target: PathBuf,
        should_render: bool,
        context: &Context,
    ) -> Result<FileOperation> {
        if !should_render {
            return Ok(FileOperation::Copy { target });
        }

        let raw = fs::read(source).map_err(Error::fs(source))?;
        let text = self.encoding.decode(&raw).ok_or_else(|| Error::DecodeError {
            path: source.to_path_buf(),
            encoding: self.encoding,
        })?;
        let rendered = self
            .renderer
            .render(&text, context)
            .map_err(|e| Error::RenderError { path: source.to_path_buf(), source: e })?;
        let content = self.encoding.encode(&rendered).ok_or_else(|| Error::EncodeError {
            path: source.to_path_buf(),
            encoding: self.encoding,
        })?;

        Ok(FileOperation::Write { target, content })
    }

    /// Materializes a planned operation.
    pub fn apply(&self, source: &Path, operation: &FileOperation) -> Result<()> {
        match operation {
            FileOperation::Copy { target } => {
                debug!("Copying file: {}", target.display());
                copy_file(source, target)
            }
            FileOperation::Write { target, content } => {
                debug!("Writing file: {}", target.display());
                write_file(target, content)
            }
        }
    }

    /// Plans and applies in one go.
    pub fn process(
        &self,
        source: &Path,
        target: PathBuf,
        should_render: bool,
        context: &Context,
    ) -> Result<()> {
        let operation = self.plan(source, target, should_render, context)?;
        self.apply(source, &operation)
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).map_err(Error::fs(path))
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map(|_| ()).map_err(Error::fs(source))
}

pub(crate) fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => Error::PathConflict { path: path.to_path_buf() },
        _ => Error::FileSystemError { path: path.to_path_buf(), source: e },
    })
}

pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(Error::fs(path))
}
