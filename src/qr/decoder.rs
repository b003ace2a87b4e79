//! QR code decoder using rqrr

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, GrayImage};

/// QR code decoder
#[derive(Debug, Default)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a new QR decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode the first QR code found in an image
    pub fn decode(&self, img: &DynamicImage) -> Result<QrPayload> {
        self.decode_gray(img.to_luma8())
    }

    /// Decode the first QR code found in a grayscale image
    pub fn decode_gray(&self, img: GrayImage) -> Result<QrPayload> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );

                Ok(QrPayload::from_bytes(content.into_bytes()))
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }

    /// Check that an image still decodes to `expected`.
    pub fn verify(&self, img: &DynamicImage, expected: &str) -> Result<()> {
        let payload = self.decode(img)?;
        let found = payload
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| String::from_utf8_lossy(payload.as_bytes()).into_owned());

        if found == expected {
            Ok(())
        } else {
            Err(Error::PayloadMismatch {
                expected: expected.to_string(),
                found,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrEncoder;

    #[test]
    fn test_blank_image_has_no_code() {
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 200, image::Luma([255])));
        let result = QrDecoder::new().decode(&blank);
        assert!(matches!(result, Err(Error::NoQrCodeFound)));
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let image = QrEncoder::new()
            .encode_string("https://ducks.example/duck/a")
            .unwrap();
        let decoder = QrDecoder::new();

        assert!(decoder.verify(&image, "https://ducks.example/duck/a").is_ok());
        match decoder.verify(&image, "https://ducks.example/duck/b") {
            Err(Error::PayloadMismatch { found, .. }) => {
                assert_eq!(found, "https://ducks.example/duck/a")
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }
}
