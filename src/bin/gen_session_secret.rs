//! Print a random session secret

use clap::Parser;
use duck_tools::{LoggingOptions, TokenEncoding, generate_token, logging};

#[derive(Parser, Debug)]
#[command(
    name = "gen-session-secret",
    version,
    about = "generate a random session secret"
)]
struct Cli {
    /// Number of random bytes
    length: usize,

    /// Pass `url` for a URL-safe token instead of base64
    mode: Option<String>,
}

impl Cli {
    fn encoding(&self) -> TokenEncoding {
        TokenEncoding::from_mode(self.mode.as_deref())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&LoggingOptions::quiet().with_env_overrides())?;

    let encoding = cli.encoding();
    tracing::debug!(length = cli.length, ?encoding, "Generating secret");

    println!("{}", generate_token(cli.length, encoding));
    Ok(())
}
