//! QR code encoder

use crate::config::QrOptions;
use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// QR code encoder with a fixed module size and quiet zone
#[derive(Debug, Clone)]
pub struct QrEncoder {
    ecc_level: EcLevel,
    box_size: u32,
    border: u32,
}

impl QrEncoder {
    /// Create an encoder with the duck code defaults: high ECC, 15 px modules, 2 module border
    pub fn new() -> Self {
        Self::from_options(&QrOptions::default())
    }

    /// Create an encoder from configured geometry; error correction stays at H
    pub fn from_options(options: &QrOptions) -> Self {
        Self {
            ecc_level: EcLevel::H,
            box_size: options.box_size.max(1),
            border: options.border,
        }
    }

    /// Pixel size of one module
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Encode data into an RGBA QR code image.
    ///
    /// The symbol version is the smallest that fits the payload, and the image
    /// side is `(modules + 2 * border) * box_size` pixels.
    pub fn encode(&self, payload: &QrPayload) -> Result<DynamicImage> {
        let code = QrCode::with_error_correction_level(&payload.data, self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))?;

        tracing::debug!(
            version = ?code.version(),
            modules = code.width(),
            length = payload.data.len(),
            "Encoded QR"
        );

        Ok(DynamicImage::ImageRgba8(self.rasterize(&code)))
    }

    /// Encode a string into a QR code image
    pub fn encode_string(&self, data: &str) -> Result<DynamicImage> {
        self.encode(&QrPayload::from_string(data.to_string()))
    }

    fn rasterize(&self, code: &QrCode) -> RgbaImage {
        let modules = code.width() as u32;
        let colors = code.to_colors();
        let side = (modules + 2 * self.border) * self.box_size;

        RgbaImage::from_fn(side, side, |x, y| {
            let column = (x / self.box_size).checked_sub(self.border);
            let row = (y / self.box_size).checked_sub(self.border);
            match (column, row) {
                (Some(c), Some(r)) if c < modules && r < modules => {
                    match colors[(r * modules + c) as usize] {
                        Color::Dark => DARK,
                        Color::Light => LIGHT,
                    }
                }
                _ => LIGHT,
            }
        })
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
