//! Icon overlay for rendered QR codes

use image::{DynamicImage, RgbaImage, imageops};

/// Offset of a centered icon along one axis.
///
/// Computed as `qr_side / 2 - icon_width / 2`, truncated toward zero. Icons
/// wider than the code give a negative offset and are clipped on paste.
pub fn paste_position(qr_side: u32, icon_width: u32) -> i64 {
    (i64::from(qr_side) - i64::from(icon_width)) / 2
}

/// Alpha-blend `icon` onto the center of `qr`.
///
/// The icon's width picks the offset for both axes, so a non-square icon
/// is anchored on the diagonal rather than centered vertically.
pub fn overlay_centered(qr: &mut RgbaImage, icon: &DynamicImage) -> i64 {
    let position = paste_position(qr.width(), icon.width());
    let icon = icon.to_rgba8();
    imageops::overlay(qr, &icon, position, position);
    position
}
