//! HTTP transport for the upstream release API
//!
//! Every failure mode degrades to `None` so one repository's outage never
//! blocks the rest of the run:
//! - 403 is treated as rate-limit exhaustion (no retry, no backoff)
//! - other non-success statuses are logged with their raw body
//! - network failures and schema mismatches are logged and absorbed

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Default root of the release API
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// HTTP client for the upstream release API
pub struct ReleaseClient {
    client: reqwest::Client,
    api_base: String,
}

impl ReleaseClient {
    /// Create a client against the given API root
    ///
    /// The upstream API rejects requests without a User-Agent, so one is
    /// always set.
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("updraft/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Releases listing endpoint for a repository
    pub fn releases_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_base.trim_end_matches('/'),
            owner,
            repo
        )
    }

    /// Fetch `url` and deserialize the JSON body
    ///
    /// Returns `None` for every failure mode; callers treat `None` as
    /// "no data available this run" and move on.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url = %url, error = %e, "Request failed");
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            warn!(url = %url, "Rate limit exceeded, skipping this request");
            return None;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, body = %body, "Unexpected response");
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(url = %url, error = %e, "Response did not match the expected schema");
                None
            }
        }
    }
}
