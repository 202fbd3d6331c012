//! HTTP implementation of the fetch capability.
//!
//! Talks to the product data service: `GET {base_url}/products/{key}`
//! returning one JSON record. Handles retry, backoff, and error
//! classification; the orchestrator above it stays retry-free.

use std::thread;
use std::time::Duration;

use partsync_core::model::{ProductKey, ProductRecord};

use crate::error::FetchError;
use crate::pool::Fetch;

const MAX_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("partsync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct HttpFetcher {
    http: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpFetcher {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, FetchError> {
        // Validate eagerly so a bad base URL fails the run, not every key.
        url::Url::parse(base_url)
            .map_err(|e| FetchError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// GET with retry + exponential backoff on 429/5xx (honoring
    /// Retry-After) and immediate classification of other statuses.
    fn request(&self, request_url: &str) -> Result<serde_json::Value, FetchError> {
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let mut req = self.http.get(request_url);
            if let Some(ref token) = self.token {
                req = req.bearer_auth(token);
            }

            match req.send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 401 || status == 403 {
                        return Err(FetchError::Auth(format!("HTTP {status} from {request_url}")));
                    }
                    if status == 404 {
                        return Err(FetchError::NotFound(format!("HTTP 404 from {request_url}")));
                    }
                    if status >= 400 && status < 500 && status != 429 {
                        return Err(FetchError::Upstream(format!(
                            "HTTP {status} from {request_url}"
                        )));
                    }

                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            return Err(FetchError::Upstream(format!(
                                "HTTP {status} after {MAX_RETRIES} retries from {request_url}"
                            )));
                        }
                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(backoff_secs)
                        } else {
                            backoff_secs
                        };
                        thread::sleep(Duration::from_secs(wait));
                        backoff_secs *= 2;
                        continue;
                    }

                    // Success: read as text first to tolerate BOM-prefixed
                    // responses, then parse JSON.
                    let text = resp
                        .text()
                        .map_err(|e| FetchError::Upstream(format!("failed to read body: {e}")))?;
                    let trimmed = text.trim_start_matches('\u{feff}');
                    return serde_json::from_str(trimmed).map_err(|e| {
                        FetchError::Parse(format!(
                            "invalid JSON: {e} (body: {})",
                            &trimmed[..trimmed.len().min(200)],
                        ))
                    });
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(FetchError::Upstream(format!(
                            "request failed after {MAX_RETRIES} retries: {e}"
                        )));
                    }
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}

impl Fetch for HttpFetcher {
    fn fetch_one(&self, key: &ProductKey) -> Result<ProductRecord, FetchError> {
        let request_url = format!("{}/products/{}", self.base_url, key);
        let body = self.request(&request_url)?;
        record_from_json(key, &body)
    }
}

/// Map the service's JSON body into a record. Text fields are optional
/// in the payload; a missing field is an empty string, which downstream
/// comparison treats as unresolved rather than an error.
fn record_from_json(
    key: &ProductKey,
    body: &serde_json::Value,
) -> Result<ProductRecord, FetchError> {
    if !body.is_object() {
        return Err(FetchError::Parse(format!(
            "expected JSON object for {key}, got {body}"
        )));
    }
    let field = |name: &str| {
        body.get(name)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };
    Ok(ProductRecord {
        key: key.to_string(),
        url: field("url"),
        title: field("title"),
        alt_id: field("alt_id"),
        weight_raw: field("weight"),
        dimensions_raw: field("dimensions"),
        material_raw: field("material"),
        material_class_raw: field("material_class"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
