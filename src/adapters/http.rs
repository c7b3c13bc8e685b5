use crate::config::toml_config::ApiConfig;
use crate::core::{LookupClient, LookupQuery, LookupResult};
use crate::utils::error::{EnrichError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// `LookupClient` for the Zefix company REST API.
///
/// The underlying `reqwest::Client` is shared by all lookups; it pools
/// connections and is safe to use from many tasks at once.
#[derive(Debug, Clone)]
pub struct ZefixClient {
    client: Client,
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
}

impl ZefixClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let endpoint = Url::parse(&api.endpoint).map_err(|e| EnrichError::InvalidConfigValueError {
            field: "api.endpoint".to_string(),
            value: api.endpoint.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        for (key, value) in &api.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                EnrichError::InvalidConfigValueError {
                    field: format!("api.headers.{}", key),
                    value: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                EnrichError::InvalidConfigValueError {
                    field: format!("api.headers.{}", key),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            username: api.username.clone().filter(|u| !u.is_empty()),
            password: api.password.clone().filter(|p| !p.is_empty()),
        })
    }

    /// Endpoint for `query`, with the path segment (if any) appended and escaped.
    pub fn url_for(&self, query: &LookupQuery) -> Result<Url> {
        let mut url = self.endpoint.clone();
        if let Some(segment) = &query.path_segment {
            url.path_segments_mut()
                .map_err(|_| EnrichError::InvalidConfigValueError {
                    field: "api.endpoint".to_string(),
                    value: self.endpoint.to_string(),
                    reason: "URL cannot take path segments".to_string(),
                })?
                .pop_if_empty()
                .push(segment);
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl LookupClient for ZefixClient {
    async fn lookup(&self, query: &LookupQuery) -> LookupResult {
        // an empty identifier cannot match; querying would hit the collection endpoint
        if query.path_segment.as_deref().is_some_and(|s| s.trim().is_empty()) {
            tracing::debug!("Skipping lookup with empty identifier");
            return LookupResult::matched(Vec::new());
        }

        let url = match self.url_for(query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Could not build lookup URL: {}", e);
                return LookupResult::failed();
            }
        };

        let mut request = self.client.get(url.clone()).query(&query.params);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Lookup request to {} failed: {}", url, e);
                return LookupResult::failed();
            }
        };

        let status = response.status();
        tracing::debug!("API response status: {} for {}", status, url);
        if !status.is_success() {
            tracing::warn!("Lookup {} answered {}", url, status);
            return LookupResult::failed();
        }

        match response.json::<serde_json::Value>().await {
            Ok(payload) => LookupResult::from_payload(payload),
            Err(e) => {
                tracing::warn!("Lookup {} returned an unreadable body: {}", url, e);
                LookupResult::failed()
            }
        }
    }
}
