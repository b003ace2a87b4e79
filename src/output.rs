//! Output directory handling and PNG file naming

use crate::api::DuckRecord;
use crate::error::{Error, Result};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory receiving the generated QR codes
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
    sanitize: bool,
}

impl OutputDir {
    /// Create the directory (and parents) if needed.
    pub fn prepare(root: impl Into<PathBuf>, sanitize: bool) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create output directory {}: {e}", root.display()),
            ))
        })?;
        Ok(Self { root, sanitize })
    }

    /// Directory path
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Full path the record's image is written to.
    pub fn path_for(&self, record: &DuckRecord) -> PathBuf {
        self.root.join(file_name(record, self.sanitize))
    }

    /// Save `image` as the record's PNG and return where it went.
    pub fn write_png(&self, record: &DuckRecord, image: &RgbaImage) -> Result<PathBuf> {
        let path = self.path_for(record);
        image.save_with_format(&path, ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), "Wrote QR code");
        Ok(path)
    }
}

/// `<name>(<location>).png`, optionally with path-unsafe characters replaced.
pub fn file_name(record: &DuckRecord, sanitize: bool) -> String {
    let name = format!("{}({}).png", record.name, record.location);
    if sanitize {
        sanitize_component(&name)
    } else {
        name
    }
}

fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // A leading dot would hide the file or, as "..", escape the directory.
    match cleaned.strip_prefix('.') {
        Some(rest) => format!("_{rest}"),
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, location: &str) -> DuckRecord {
        DuckRecord {
            id: "id".to_string(),
            name: name.to_string(),
            location: location.to_string(),
            icon_url: "http://h/3x-i.png".to_string(),
        }
    }

    #[test]
    fn test_file_name_plain() {
        assert_eq!(file_name(&record("A", "loc1"), false), "A(loc1).png");
        assert_eq!(file_name(&record("小黄鸭", "一楼"), true), "小黄鸭(一楼).png");
    }

    #[test]
    fn test_file_name_unsanitized_keeps_separators() {
        assert_eq!(file_name(&record("a/b", "c"), false), "a/b(c).png");
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(file_name(&record("a/b", "c:d"), true), "a_b(c_d).png");
        assert_eq!(file_name(&record("../x", "y"), true), "_._x(y).png");
        assert_eq!(file_name(&record("tab\there", "?"), true), "tab_here(_).png");
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("qrcodes");

        OutputDir::prepare(&dir, false).unwrap();
        let out = OutputDir::prepare(&dir, false).unwrap();

        assert!(dir.is_dir());
        assert_eq!(out.path(), dir.as_path());
    }

    #[test]
    fn test_write_png() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path(), false).unwrap();
        let image = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]));

        let path = out.write_png(&record("A", "loc1"), &image).unwrap();

        assert_eq!(path, tmp.path().join("A(loc1).png"));
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 8);
    }
}
