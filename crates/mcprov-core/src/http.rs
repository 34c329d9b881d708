//! HTTP capability used by every artifact source.
//!
//! Sources only ever issue `GET` requests; [`HttpClient`] is the seam that
//! lets the orchestrator run against the network or an in-memory fake.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{ProvisionError, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("mcprov/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Fetches raw bytes from a URL.
///
/// Implementations must surface non-2xx responses as
/// [`ProvisionError::Remote`] and transport failures as
/// [`ProvisionError::Network`].
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetch `url` and decode the body as JSON.
pub async fn get_json<H, T>(http: &H, url: &str) -> Result<T>
where
    H: HttpClient,
    T: DeserializeOwned,
{
    let body = http.get(url).await?;
    serde_json::from_slice(&body).map_err(|e| ProvisionError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Fetch `url` and decode the body as trimmed UTF-8 text.
pub async fn get_text<H: HttpClient>(http: &H, url: &str) -> Result<String> {
    let body = http.get(url).await?;
    let text = String::from_utf8(body).map_err(|e| ProvisionError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(text.trim().to_string())
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ProvisionError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProvisionError::Remote {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| network_error(url, &e))?;
        Ok(bytes.to_vec())
    }
}

fn network_error(url: &str, err: &reqwest::Error) -> ProvisionError {
    let message = if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    };
    ProvisionError::Network {
        url: url.to_string(),
        message,
    }
}
