//! Generate a QR code PNG for every duck listed by the backend

use anyhow::Context;
use clap::Parser;
use duck_tools::{ApiOptions, DuckQrConfig, DuckQrGenerator, Error, GenerationReport, logging};
use std::path::PathBuf;
use tracing::info;

/// Exit status reported when the backend refuses the admin token
const INVALID_TOKEN_EXIT: i32 = -1;

#[derive(Parser, Debug)]
#[command(
    name = "gen-duck-qr",
    version,
    about = "generate QR codes of the ducks",
    infer_long_args = true
)]
struct Cli {
    /// Backend base url
    #[arg(short = 'e', long, env = "DUCKQR_ENDPOINT", value_name = "URL")]
    endpoint: String,

    /// Admin token
    #[arg(
        short = 't',
        long,
        env = "DUCKQR_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    token: String,

    /// Frontend base url
    #[arg(short = 'f', long, env = "DUCKQR_FRONTEND_URL", value_name = "URL")]
    frontend_url: String,

    /// Optional configuration file (toml/yaml). Defaults to duckqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for the generated PNG files [default: ./qrcodes]
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Do NOT verify the backend's TLS certificate when listing ducks
    #[arg(long)]
    insecure: bool,

    /// Replace path-unsafe characters in duck names used as file names
    #[arg(long)]
    sanitize: bool,

    /// Decode each generated image and fail if it no longer carries its URL
    #[arg(long)]
    verify: bool,

    /// Override the log level (e.g. debug, duck_tools=trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Command-line flags take precedence over the file and environment.
    fn apply_overrides(&self, config: &mut DuckQrConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.insecure {
            config.backend.insecure = true;
        }
        if self.sanitize {
            config.output.sanitize_filenames = true;
        }
        if self.verify {
            config.output.verify = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Turn the run outcome into a process exit code.
///
/// A refused token is reported on stdout and mapped to [`INVALID_TOKEN_EXIT`];
/// every other failure is returned to `main`.
fn exit_code(outcome: duck_tools::Result<GenerationReport>) -> anyhow::Result<i32> {
    match outcome {
        Ok(_) => Ok(0),
        Err(Error::InvalidAdminToken) => {
            println!("invalid admin token");
            Ok(INVALID_TOKEN_EXIT)
        }
        Err(err) => Err(err).context("QR generation failed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = DuckQrConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    logging::init(&config.logging)?;
    match &config.source {
        Some(path) => info!("Using configuration file: {}", path.display()),
        None => tracing::debug!("No duckqr.toml / duckqr.yaml found, using defaults"),
    }

    let api = ApiOptions {
        endpoint: cli.endpoint,
        token: cli.token,
        insecure: config.backend.insecure,
    };
    info!(endpoint = %api.endpoint, frontend = %cli.frontend_url, "Starting duck QR generation");

    let generator = DuckQrGenerator::new(api, cli.frontend_url, config)?;

    let code = exit_code(generator.run().await)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
