//! Error types for pageview-rs.

use thiserror::Error;

/// Result type alias using PageViewError.
pub type PageViewResult<T> = Result<T, PageViewError>;

/// Errors that can occur while zooming, rotating or presenting a page.
#[derive(Debug, Error)]
pub enum PageViewError {
    /// Zoom factor is non-positive or non-finite, or the zoom catalog is unusable.
    #[error("Invalid zoom factor: {0}")]
    InvalidZoomFactor(String),

    /// Invalid raster or surface dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match `width * height * 4`.
    #[error("Invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidPixelBuffer { expected: usize, actual: usize },

    /// The image transformer could not produce an output raster.
    #[error("Image transform failed: {0}")]
    Transform(String),

    /// Failed to decode a source image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// Viewer configuration could not be parsed or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Unknown host action name.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::EncodingError> for PageViewError {
    fn from(err: png::EncodingError) -> Self {
        PageViewError::PngError(err.to_string())
    }
}

impl From<image::ImageError> for PageViewError {
    fn from(err: image::ImageError) -> Self {
        PageViewError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for PageViewError {
    fn from(err: serde_json::Error) -> Self {
        PageViewError::Config(err.to_string())
    }
}
