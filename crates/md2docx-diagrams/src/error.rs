//! Error types for diagram rendering.

/// Error from renderer setup or a single diagram render.
///
/// Per-diagram render errors never escape a conversion run: the renderer
/// logs them and falls back to a plain code fence. Only setup failures
/// (the image directory cannot be created) surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// HTTP transport error, timeout, or non-200 status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service responded 200 with something other than an image.
    #[error("unexpected content type '{0}'")]
    ContentType(String),

    /// Downloaded bytes could not be decoded as a raster image.
    #[error("image decode error: {0}")]
    Decode(String),

    /// Filesystem error while persisting the image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
