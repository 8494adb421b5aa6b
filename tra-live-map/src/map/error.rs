//! Map rendering error types.

/// Errors from rendering a map document.
///
/// Rendering is local and pure, so this only surfaces template engine
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}
