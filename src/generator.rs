//! The duck QR code pipeline: list, download, encode, overlay, write

use crate::api::{ApiOptions, DuckApi, DuckRecord};
use crate::config::DuckQrConfig;
use crate::error::Result;
use crate::output::OutputDir;
use crate::qr::{QrDecoder, QrEncoder, QrPayload, duck_url, overlay_centered};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// One generated QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Record id
    pub id: String,
    /// URL encoded in the code
    pub url: String,
    /// PNG written for it
    pub path: PathBuf,
}

/// Result of a full generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Codes in the order the backend listed the records
    pub generated: Vec<GeneratedCode>,
}

/// Generates one QR image per duck listed by the backend
pub struct DuckQrGenerator {
    api: DuckApi,
    encoder: QrEncoder,
    decoder: Option<QrDecoder>,
    frontend: String,
    config: DuckQrConfig,
}

impl DuckQrGenerator {
    /// Build a generator from resolved connection settings and configuration.
    pub fn new(api: ApiOptions, frontend: impl Into<String>, config: DuckQrConfig) -> Result<Self> {
        let api = DuckApi::new(api)?;
        let encoder = QrEncoder::from_options(&config.qr);
        let decoder = config.output.verify.then(QrDecoder::new);

        Ok(Self {
            api,
            encoder,
            decoder,
            frontend: frontend.into(),
            config,
        })
    }

    /// Run the pipeline. Records are handled one at a time; the first failure aborts the run.
    pub async fn run(&self) -> Result<GenerationReport> {
        let started = Instant::now();
        let ducks = self.api.fetch_ducks().await?;

        let out = OutputDir::prepare(&self.config.output.dir, self.config.output.sanitize_filenames)?;

        let mut report = GenerationReport::default();
        for duck in &ducks {
            let generated = self.generate_one(duck, &out).await?;
            report.generated.push(generated);
        }

        info!(
            count = report.generated.len(),
            dir = %out.path().display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "QR generation finished"
        );
        Ok(report)
    }

    async fn generate_one(&self, duck: &DuckRecord, out: &OutputDir) -> Result<GeneratedCode> {
        let url = duck_url(&self.frontend, &duck.id);
        println!("{url}");

        let icon = self.api.fetch_icon(&duck.icon_url).await?;
        let qr = self.encoder.encode(&QrPayload::from_string(url.clone()))?;

        let mut canvas = qr.into_rgba8();
        let position = overlay_centered(&mut canvas, &icon);
        tracing::debug!(id = %duck.id, side = canvas.width(), position, "Pasted icon");

        if let Some(decoder) = &self.decoder {
            decoder.verify(&image::DynamicImage::ImageRgba8(canvas.clone()), &url)?;
        }

        let path = out.write_png(duck, &canvas)?;
        info!(id = %duck.id, path = %path.display(), "Generated QR code");

        Ok(GeneratedCode {
            id: duck.id.clone(),
            url,
            path,
        })
    }
}
