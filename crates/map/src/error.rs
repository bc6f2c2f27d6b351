//! Error types for map rendering.

use thiserror::Error;

/// Result type alias for map operations.
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors that can occur while rendering a frame.
#[derive(Debug, Error)]
pub enum MapError {
    /// A popup template failed to compile
    #[error("Popup template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// A popup failed to render
    #[error("Popup render error: {0}")]
    Render(#[from] handlebars::RenderError),
}
