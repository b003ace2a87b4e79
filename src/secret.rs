//! Random secret tokens for session signing keys

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;

/// Text encoding of a generated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEncoding {
    /// Standard padded base64
    Base64,
    /// URL-safe base64 without padding
    UrlSafe,
}

impl TokenEncoding {
    /// `"url"` selects [`TokenEncoding::UrlSafe`]; anything else, or nothing, selects base64.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("url") => Self::UrlSafe,
            _ => Self::Base64,
        }
    }
}

/// `length` bytes from the operating system CSPRNG.
pub fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate `length` random bytes and encode them as text.
pub fn generate_token(length: usize, encoding: TokenEncoding) -> String {
    let bytes = random_bytes(length);
    match encoding {
        TokenEncoding::Base64 => STANDARD.encode(bytes),
        TokenEncoding::UrlSafe => URL_SAFE_NO_PAD.encode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mode() {
        assert_eq!(TokenEncoding::from_mode(Some("url")), TokenEncoding::UrlSafe);
        assert_eq!(TokenEncoding::from_mode(Some("URL")), TokenEncoding::Base64);
        assert_eq!(TokenEncoding::from_mode(Some("hex")), TokenEncoding::Base64);
        assert_eq!(TokenEncoding::from_mode(None), TokenEncoding::Base64);
    }

    #[test]
    fn test_base64_decodes_to_requested_length() {
        for length in [0, 1, 2, 3, 16, 31, 32, 64, 100] {
            let token = generate_token(length, TokenEncoding::Base64);
            let decoded = STANDARD.decode(&token).unwrap();
            assert_eq!(decoded.len(), length);
        }
    }

    #[test]
    fn test_url_safe_alphabet() {
        for length in [1, 16, 32, 47] {
            let token = generate_token(length, TokenEncoding::UrlSafe);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in {token}"
            );
            assert_eq!(URL_SAFE_NO_PAD.decode(&token).unwrap().len(), length);
        }
    }

    #[test]
    fn test_tokens_differ() {
        let a = generate_token(32, TokenEncoding::UrlSafe);
        let b = generate_token(32, TokenEncoding::UrlSafe);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(generate_token(0, TokenEncoding::Base64), "");
    }
}
