//! Emoji catalog client and glyph pool construction.
//!
//! # Architecture
//!
//! - [`CatalogClient`] - HTTP client for the catalog (`/all`, `/all/category/{name}`,
//!   `/all/group/{name}`)
//! - [`payload`] - JSON payload decoding into [`Glyph`]s
//! - [`sampler`] - Reduction of a candidate list to a [`GlyphPool`] of unique glyphs
//!
//! # Error Handling
//!
//! Every failure is a [`CatalogError`]. Transport, status and payload problems all
//! classify as [`FailureKind::SourceUnavailable`]; a source with no glyphs is
//! [`FailureKind::EmptyPool`]. Nothing is retried here: a failed fetch is reported
//! and the player decides whether to try again.

pub mod payload;
pub mod sampler;

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

pub use seenit_types;
use seenit_types::{FailureKind, Glyph, GlyphPool, RoundStartFailure, SourceSelector};

/// Public EmojiHub API.
pub const DEFAULT_CATALOG_URL: &str = "https://emojihub.yurace.pro/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const MAX_REDIRECTS: usize = 3;

/// The full catalog is a few hundred KiB; anything far beyond that is not a catalog.
const MAX_PAYLOAD_BYTES: usize = 8 * 1024 * 1024;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("malformed catalog payload from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("source {selector} has no glyphs")]
    EmptyPool { selector: String },
}

impl CatalogError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            CatalogError::EmptyPool { .. } => FailureKind::EmptyPool,
            CatalogError::Client(_)
            | CatalogError::Transport { .. }
            | CatalogError::Status { .. }
            | CatalogError::Malformed { .. } => FailureKind::SourceUnavailable,
        }
    }

    #[must_use]
    pub fn to_failure(&self) -> RoundStartFailure {
        RoundStartFailure::new(self.kind(), self.to_string())
    }
}

fn base_client_builder() -> reqwest::ClientBuilder {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .user_agent(concat!("seenit/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

pub fn http_client_with_timeout(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Request paths (relative to the base URL) for a selector, in fetch order.
#[must_use]
pub fn request_paths(selector: &SourceSelector) -> Vec<String> {
    match selector {
        SourceSelector::All => vec!["all".to_string()],
        SourceSelector::Category(name) => vec![format!("all/category/{name}")],
        SourceSelector::Groups(groups) => groups
            .iter()
            .map(|group| format!("all/group/{group}"))
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, CatalogError> {
        let http = http_client_with_timeout(timeout_secs).map_err(CatalogError::Client)?;
        Ok(Self::with_http_client(http, base_url))
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Fetch every candidate glyph for `selector`.
    ///
    /// Group results are concatenated in selector order. Duplicates are kept;
    /// the sampler deals with them.
    pub async fn fetch_candidates(
        &self,
        selector: &SourceSelector,
    ) -> Result<Vec<Glyph>, CatalogError> {
        let mut candidates = Vec::new();
        for path in request_paths(selector) {
            let url = self.url_for(&path);
            let glyphs = self.fetch_glyphs(&url).await?;
            tracing::debug!(%url, count = glyphs.len(), "Fetched catalog page");
            candidates.extend(glyphs);
        }
        Ok(candidates)
    }

    /// Fetch candidates for `selector` and reduce them to a pool of up to
    /// `count` unique glyphs.
    pub async fn fetch_pool<R>(
        &self,
        selector: &SourceSelector,
        count: usize,
        rng: &mut R,
    ) -> Result<GlyphPool, CatalogError>
    where
        R: Rng + ?Sized,
    {
        let candidates = self.fetch_candidates(selector).await?;
        if candidates.is_empty() {
            return Err(CatalogError::EmptyPool {
                selector: selector.to_string(),
            });
        }
        let pool = sampler::draw_pool(&candidates, count, rng);
        tracing::info!(
            %selector,
            requested = count,
            candidates = candidates.len(),
            pool = pool.len(),
            "Built glyph pool"
        );
        Ok(pool)
    }

    async fn fetch_glyphs(&self, url: &str) -> Result<Vec<Glyph>, CatalogError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = read_capped_body(response, MAX_PAYLOAD_BYTES)
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;
        let Some(body) = body else {
            return Err(CatalogError::Malformed {
                url: url.to_string(),
                reason: format!("payload exceeds {MAX_PAYLOAD_BYTES} bytes"),
            });
        };

        payload::parse_glyphs(&body).map_err(|e| CatalogError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Read a response body, giving up with `Ok(None)` once it passes `limit` bytes.
async fn read_capped_body(
    response: reqwest::Response,
    limit: usize,
) -> Result<Option<Vec<u8>>, reqwest::Error> {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
        if body.len() > limit {
            return Ok(None);
        }
    }
    Ok(Some(body))
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
