//! Giphy media resolver

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::application::errors::{ConfigError, MediaError};
use crate::application::messaging::strip_query;
use crate::domain::traits::MediaResolver;
use crate::infrastructure::config::Config;


/// Giphy search endpoint
pub const SEARCH_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    images: HashMap<String, Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: Option<String>,
}

/// Searches Giphy for one gif per query
pub struct GiphyResolver {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GiphyResolver {
    /// Idle connections live for `idle_timeout`; requests are never retried.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: &str,
        idle_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidValue(format!("giphy.endpoint: {}", e)))?;
        let client = Client::builder()
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(idle_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(
            config.giphy.api_key.clone(),
            &config.giphy.endpoint,
            config.idle_timeout(),
            config.request_timeout(),
        )
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("q", query)
            .append_pair("limit", "1")
            .append_pair("offset", "0")
            .append_pair("rating", "PG-13")
            .append_pair("lang", "en");
        url
    }
}

#[async_trait]
impl MediaResolver for GiphyResolver {
    async fn resolve_media(&self, query: &str) -> Result<String, MediaError> {
        let response = self.client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        tracing::debug!("Giphy answered {} for {:?}", response.status(), query);

        let body = response
            .bytes()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        extract_media_url(&body)
    }
}

/// Pull the first result's `downsized` URL out of a search response, minus
/// its query string (Giphy puts tracking parameters there).
pub fn extract_media_url(body: &[u8]) -> Result<String, MediaError> {
    let response: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| MediaError::Decode(e.to_string()))?;

    let results = response.data.ok_or(MediaError::MissingField("data"))?;
    let first = results.into_iter().next().ok_or(MediaError::NoResults)?;
    let image = first
        .images
        .get("downsized")
        .ok_or(MediaError::MissingField("downsized"))?;
    let raw = image.url.as_deref().ok_or(MediaError::MissingField("url"))?;

    strip_query(raw)
}
