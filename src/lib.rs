//! duck-tools - QR codes for duck exhibits and session secrets
//!
//! Two small tools share this library:
//!
//! - `gen-duck-qr` lists every duck from the backend admin API, downloads the
//!   high-resolution icon of each one and writes a PNG holding a QR code for the
//!   duck's frontend page with the icon pasted at its center.
//! - `gen-session-secret` prints a random base64 or URL-safe token.
//!
//! # Example
//!
//! ```no_run
//! use duck_tools::{ApiOptions, DuckQrConfig, DuckQrGenerator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = ApiOptions {
//!         endpoint: "https://api.ducks.example".to_string(),
//!         token: "admin-token".to_string(),
//!         insecure: false,
//!     };
//!     let generator =
//!         DuckQrGenerator::new(api, "https://ducks.example", DuckQrConfig::default())?;
//!
//!     for code in generator.run().await?.generated {
//!         println!("{} -> {}", code.url, code.path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod qr;
pub mod secret;

// Re-exports for convenience
pub use error::{Error, Result};

pub use api::{ApiOptions, DuckApi, DuckRecord, large_icon_url};
pub use config::{
    BackendOptions, DuckQrConfig, LogRotation, LoggingOptions, OutputOptions, QrOptions,
};
pub use generator::{DuckQrGenerator, GeneratedCode, GenerationReport};
pub use output::OutputDir;
pub use qr::{QrDecoder, QrEncoder, QrPayload, duck_url, overlay_centered, paste_position};
pub use secret::{TokenEncoding, generate_token};
