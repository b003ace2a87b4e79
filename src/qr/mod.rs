//! QR code encoding, decoding and icon overlay
//!
//! Duck codes are rendered at the highest error-correction level so that the
//! icon pasted over the center does not make them unreadable.

mod decoder;
mod encoder;
mod overlay;

pub use decoder::QrDecoder;
pub use encoder::QrEncoder;
pub use overlay::{overlay_centered, paste_position};

/// A QR code payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    /// The raw data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Frontend page URL for a single duck, the content of its QR code.
pub fn duck_url(frontend: &str, id: &str) -> String {
    format!("{frontend}/duck/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_payload_from_string() {
        let payload = QrPayload::from_string("https://ducks.example/duck/1".to_string());
        assert_eq!(payload.as_str(), Some("https://ducks.example/duck/1"));
        assert_eq!(payload.as_bytes(), b"https://ducks.example/duck/1");
    }

    #[test]
    fn test_qr_payload_from_bytes() {
        let payload = QrPayload::from_bytes(vec![0xFF, 0xFE]);
        assert!(payload.as_str().is_none());
        assert_eq!(payload.as_bytes(), &[0xFF, 0xFE]);
    }

    #[test]
    fn test_duck_url() {
        assert_eq!(
            duck_url("https://ducks.example", "64f0c2"),
            "https://ducks.example/duck/64f0c2"
        );
    }
}
