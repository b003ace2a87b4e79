//! Error types for duck-tools operations

use thiserror::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for duck-tools operations
#[derive(Error, Debug)]
pub enum Error {
    /// The admin listing endpoint rejected the bearer token
    #[error("invalid admin token")]
    InvalidAdminToken,

    /// Transport failure or unexpected HTTP status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(String),

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// A composed QR code decoded to something other than what was encoded
    #[error("QR payload mismatch: expected '{expected}', found '{found}'")]
    PayloadMismatch {
        /// Payload that was encoded
        expected: String,
        /// Payload read back from the image
        found: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Json(e.to_string())
        } else {
            Error::Http(e.to_string())
        }
    }
}
