use anyhow::{anyhow, bail, Result};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;

use crate::models::{EventRecord, LocationRecord};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: Url, status: StatusCode },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

/// Client for the trade-tracking API.
///
/// Every call forwards the caller's bearer token. There is no retry and no
/// request timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| anyhow!("Invalid API base URL {}: {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL {} cannot carry a path", base_url);
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, base_url })
    }

    /// `GET /item/map`, or `GET /item/map/:key` when scoped to one item.
    pub async fn fetch_locations(
        &self,
        scope_key: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<LocationRecord>, FetchError> {
        let url = match scope_key {
            Some(key) => self.endpoint(&["item", "map", key]),
            None => self.endpoint(&["item", "map"]),
        };
        self.get_list(url, auth_token).await
    }

    /// `GET /event/:key`
    pub async fn fetch_events(
        &self,
        key: &str,
        auth_token: &str,
    ) -> Result<Vec<EventRecord>, FetchError> {
        let url = self.endpoint(&["event", key]);
        self.get_list(url, auth_token).await
    }

    /// Fetch a JSON array, decoding each element on its own.
    ///
    /// A body that is not an array is a `Decode` error; an element that does
    /// not fit `T` is skipped with a warning.
    async fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        auth_token: &str,
    ) -> Result<Vec<T>, FetchError> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(auth_token)
            .send()
            .await
            .map_err(|source| {
                let mut error_msg = format!("Request to {} failed: {}", url, source);
                let mut cause = source.source();
                while let Some(err) = cause {
                    error_msg.push_str(&format!("\n  Caused by: {}", err));
                    cause = err.source();
                }
                tracing::warn!("{}", error_msg);
                FetchError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", url, status);
            return Err(FetchError::Status { url, status });
        }

        let elements = response
            .json::<Vec<Value>>()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;

        Ok(decode_elements(&url, elements))
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn decode_elements<T: DeserializeOwned>(url: &Url, elements: Vec<Value>) -> Vec<T> {
    let total = elements.len();
    let decoded: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping element {} from {}: {}", index, url, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::debug!("Decoded {} of {} elements from {}", decoded.len(), total, url);
    }
    decoded
}
