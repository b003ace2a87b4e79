//! Runtime configuration for the QR generator

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory the generated PNG files are written to
pub const DEFAULT_OUTPUT_DIR: &str = "./qrcodes";

/// Top-level configuration structure loaded from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckQrConfig {
    /// Backend connection settings
    pub backend: BackendOptions,
    /// QR code geometry
    pub qr: QrOptions,
    /// Output directory and file handling
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl DuckQrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    ///
    /// Runs before logging is set up, so the chosen file is reported through
    /// [`DuckQrConfig::source`] rather than logged here.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["duckqr.toml", "duckqr.yaml", "duckqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("duckqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let mut config = Self::parse(&contents, &extension)
            .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration text in the format named by `extension`.
    pub fn parse(contents: &str, extension: &str) -> std::result::Result<Self, String> {
        let mut config: Self = match extension {
            "toml" => toml::from_str(contents).map_err(|e| format!("Failed to parse TOML: {e}"))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| format!("Failed to parse YAML: {e}"))?
            }
            other => {
                return Err(format!(
                    "Unsupported config format '{}', expected toml/yaml",
                    other
                ));
            }
        };
        config.qr.normalize();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.backend.apply_env_overrides();
        self.output.apply_env_overrides();
        self.logging.apply_env_overrides();
    }
}

/// Backend HTTP settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendOptions {
    /// Skip TLS certificate verification for the admin listing request.
    ///
    /// Only meant for backends running with self-signed certificates.
    pub insecure: bool,
}

impl BackendOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Some(flag) = env_flag("DUCKQR_INSECURE") {
            self.insecure = flag;
        }
    }
}

/// QR code rendering geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Pixel size of one QR module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            box_size: 15,
            border: 2,
        }
    }
}

impl QrOptions {
    fn normalize(&mut self) {
        self.box_size = self.box_size.max(1);
    }
}

/// Output directory and file naming settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory the PNG files are written to (created if missing)
    pub dir: PathBuf,
    /// Replace path-unsafe characters in record names before using them as file names
    pub sanitize_filenames: bool,
    /// Decode every composed image and check that it still carries its URL
    pub verify: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sanitize_filenames: false,
            verify: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("DUCKQR_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.dir = PathBuf::from(dir);
            }
        }
        if let Some(flag) = env_flag("DUCKQR_SANITIZE") {
            self.sanitize_filenames = flag;
        }
        if let Some(flag) = env_flag("DUCKQR_VERIFY") {
            self.verify = flag;
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `DUCKQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// ANSI colors on the console; unset means only when stderr is a terminal
    pub color: Option<bool>,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: None,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    /// Options for short-lived tools whose stdout is consumed by scripts.
    pub fn quiet() -> Self {
        Self {
            level: "warn".to_string(),
            ..Self::default()
        }
    }

    /// Apply the `DUCKQR_LOG_*` environment overrides to these options.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_env_overrides();
        self
    }

    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("DUCKQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("DUCKQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = env_flag("DUCKQR_LOG_COLOR") {
            self.color = Some(color);
        }
        if let Ok(rotation) = env::var("DUCKQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DuckQrConfig::default();
        assert_eq!(config.qr.box_size, 15);
        assert_eq!(config.qr.border, 2);
        assert_eq!(config.output.dir, PathBuf::from("./qrcodes"));
        assert!(!config.backend.insecure);
        assert!(!config.output.sanitize_filenames);
        assert_eq!(config.logging.color, None);
        assert!(config.source.is_none());
    }

    #[test]
    fn test_load_explicit_file_records_source() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("duckqr.toml");
        fs::write(&path, "[qr]\nborder = 3\n\n[logging]\ncolor = false\n").unwrap();

        let config = DuckQrConfig::load(Some(&path)).unwrap();

        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.qr.border, 3);
        assert_eq!(config.logging.color, Some(false));
    }

    #[test]
    fn test_parse_toml_partial() {
        let config = DuckQrConfig::parse(
            r#"
            [backend]
            insecure = true

            [output]
            dir = "/tmp/ducks"
            "#,
            "toml",
        )
        .unwrap();

        assert!(config.backend.insecure);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/ducks"));
        assert_eq!(config.qr.box_size, 15);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_yaml() {
        let config = DuckQrConfig::parse(
            "qr:\n  box_size: 0\n  border: 4\nlogging:\n  rotation: daily\n",
            "yaml",
        )
        .unwrap();

        assert_eq!(config.qr.box_size, 1);
        assert_eq!(config.qr.border, 4);
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = DuckQrConfig::parse("", "ini").unwrap_err();
        assert!(err.contains("Unsupported config format"));
    }

    #[test]
    fn test_from_file_reports_path() {
        let err = DuckQrConfig::from_file(Path::new("/nonexistent/duckqr.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("/nonexistent/duckqr.toml")));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
