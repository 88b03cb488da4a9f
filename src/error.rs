//! One error type for the whole crate.
//! Every variant states *where* things went wrong.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Raw frame layout the bridge cannot convert
    #[error("unsupported pixel format {layout} ({width}x{height})")]
    UnsupportedPixelFormat {
        layout: &'static str,
        width: usize,
        height: usize,
    },

    /// Raw frame data does not match its declared dimensions
    #[error("frame size mismatch: expected {expected} {unit}, got {actual}")]
    FrameSize {
        expected: usize,
        actual: usize,
        unit: &'static str,
    },

    #[error("failed to encode image as {format}")]
    ImageEncode {
        format: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode image")]
    ImageDecode(#[source] image::ImageError),

    #[error("image I/O failed for {path}")]
    ImageIo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// File name with an extension outside png/jpg/jpeg/tiff/bmp
    #[error("invalid image file name {0:?}")]
    InvalidFilename(String),

    #[error("cannot parse element from {text:?}: {reason}")]
    ElementText { text: String, reason: &'static str },

    #[error("invalid element JSON")]
    ElementJson(#[source] serde_json::Error),

    #[error("failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML in {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Creating the overlay window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the overlay window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// The thread owning the windows has exited
    #[error("overlay UI thread is gone")]
    UiThreadGone,
}
