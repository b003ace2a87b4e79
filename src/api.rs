//! Backend access: the admin duck listing and icon downloads

use crate::error::{Error, Result};
use image::DynamicImage;
use reqwest::StatusCode;
use serde::Deserialize;

/// Path of the admin endpoint listing every duck
pub const ALL_DUCKS_ENDPOINT: &str = "/admin/many-ducks";

/// Filename prefix of the high-resolution icon variant
pub const LARGE_ICON_PREFIX: &str = "3x-";

// ── Admin listing wire types ────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct Bilingual {
    cn: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawLocation {
    description: Bilingual,
}

/// One duck as returned by the admin listing. Fields not needed here are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDuck {
    id: String,
    title: Bilingual,
    location: RawLocation,
    duck_icon_url: String,
}

/// The parts of a duck needed to render its QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuckRecord {
    /// Backend identifier, used in the frontend URL
    pub id: String,
    /// Chinese display title
    pub name: String,
    /// Chinese location description
    pub location: String,
    /// High-resolution icon URL
    pub icon_url: String,
}

impl DuckRecord {
    /// Flatten a listing entry and point it at the large icon.
    pub fn from_raw(raw: RawDuck) -> Self {
        Self {
            id: raw.id,
            name: raw.title.cn,
            location: raw.location.description.cn,
            icon_url: large_icon_url(&raw.duck_icon_url),
        }
    }
}

/// Insert the large-icon prefix in front of the file name of `icon_url`.
///
/// `http://h/p/icon.png` becomes `http://h/p/3x-icon.png`.
pub fn large_icon_url(icon_url: &str) -> String {
    match icon_url.rsplit_once('/') {
        Some((path, name)) => format!("{path}/{LARGE_ICON_PREFIX}{name}"),
        None => format!("{LARGE_ICON_PREFIX}{icon_url}"),
    }
}

/// Parse an admin listing body into records.
pub fn parse_ducks(body: &[u8]) -> Result<Vec<DuckRecord>> {
    let raw: Vec<RawDuck> = serde_json::from_slice(body)?;
    Ok(raw.into_iter().map(DuckRecord::from_raw).collect())
}

// ── Client ──────────────────────────────────────────────────────────

/// Connection settings for [`DuckApi`]
#[derive(Debug, Clone)]
pub struct ApiOptions {
    /// Backend base URL, e.g. `https://api.ducks.example`
    pub endpoint: String,
    /// Admin bearer token
    pub token: String,
    /// Accept invalid TLS certificates on the admin listing request
    pub insecure: bool,
}

/// HTTP access to the duck backend
#[derive(Clone)]
pub struct DuckApi {
    admin: reqwest::Client,
    assets: reqwest::Client,
    endpoint: String,
    token: String,
}

impl DuckApi {
    /// Build the admin and asset clients.
    pub fn new(options: ApiOptions) -> Result<Self> {
        if options.insecure {
            tracing::warn!(
                endpoint = %options.endpoint,
                "TLS certificate verification is DISABLED for the admin listing request"
            );
        }

        let admin = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build admin client: {e}")))?;
        let assets = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Http(format!("Failed to build asset client: {e}")))?;

        Ok(Self {
            admin,
            assets,
            endpoint: options.endpoint,
            token: options.token,
        })
    }

    /// URL of the admin listing endpoint
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.endpoint, ALL_DUCKS_ENDPOINT)
    }

    /// Fetch every duck from the admin listing.
    ///
    /// Status 400 means the token was refused and maps to
    /// [`Error::InvalidAdminToken`]; any other failure status is [`Error::Http`].
    pub async fn fetch_ducks(&self) -> Result<Vec<DuckRecord>> {
        let url = self.listing_url();
        tracing::info!(%url, "Requesting duck listing");

        let resp = self
            .admin
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Listing request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST {
            return Err(Error::InvalidAdminToken);
        }
        if !status.is_success() {
            return Err(Error::Http(format!("Listing request returned {status}")));
        }

        let body = resp.bytes().await?;
        let ducks = parse_ducks(&body)?;
        tracing::info!(count = ducks.len(), "Fetched duck listing");
        Ok(ducks)
    }

    /// Download and decode an icon image.
    pub async fn fetch_icon(&self, url: &str) -> Result<DynamicImage> {
        let resp = self
            .assets
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Icon request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http(format!("Icon request to {url} returned {status}")));
        }

        let bytes = resp.bytes().await?;
        let icon = image::load_from_memory(&bytes)?;
        tracing::debug!(%url, width = icon.width(), height = icon.height(), "Fetched icon");
        Ok(icon)
    }
}
