//! Template rendering for molt.
use thiserror::Error;

use crate::context::Context;
use crate::mustache::Template;

/// Failure reported by a templating engine: undefined reference or invalid syntax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }
}

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String, RenderError>` - Rendered template string
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError>;
}

/// Mustache rendering engine.
///
/// Strict: a reference to a name missing from the context fails the render instead of
/// expanding to an empty string.
pub struct MustacheRenderer;

impl MustacheRenderer {
    pub fn new() -> Self {
        MustacheRenderer
    }
}

impl Default for MustacheRenderer {
    fn default() -> Self {
        MustacheRenderer::new()
    }
}

impl TemplateRenderer for MustacheRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        Template::compile(template)?.render(context)
    }
}
