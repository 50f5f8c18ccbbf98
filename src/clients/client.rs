use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{ApiError, DEFAULT_API_MESSAGE};
use crate::config::ApiConfig;

/// `{ success, data, error }` wrapper around every backend payload.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,

    data: Option<T>,

    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    code: Option<String>,

    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_error(self, status: Option<u16>) -> ApiError {
        let message = self
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_API_MESSAGE.to_string());
        ApiError::api(message, status)
            .with_server_code(self.code)
            .with_details(self.details)
    }
}

/// Thin HTTP wrapper: builds URLs against the configured origin and turns
/// envelopes, statuses and transport failures into `Result<T, ApiError>`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn from_parts(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::unknown(format!("Base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(segments, params)?;
        self.execute(self.client.get(url)).await
    }

    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(segments, &[])?;
        self.execute(self.client.request(method, url).json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments, &[])?;
        self.execute(self.client.delete(url)).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            debug!(error = %e, "Request failed without a response");
            if e.is_builder() {
                ApiError::unknown(e.to_string())
            } else {
                ApiError::network()
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            debug!(error = %e, "Failed to read response body");
            ApiError::network()
        })?;

        if !status.is_success() {
            let error = serde_json::from_slice::<Envelope<serde::de::IgnoredAny>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .map_or_else(
                    || ApiError::api(DEFAULT_API_MESSAGE, Some(status.as_u16())),
                    |error| error.into_error(Some(status.as_u16())),
                );
            debug!(status = status.as_u16(), message = %error.message, "Backend rejected request");
            return Err(error);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|e| ApiError::unknown(format!("Malformed response: {e}")))?;

        if !envelope.success {
            return Err(envelope.error.map_or_else(
                || ApiError::api(DEFAULT_API_MESSAGE, Some(status.as_u16())),
                |error| error.into_error(Some(status.as_u16())),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::unknown("Response contained no data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::from_parts(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn test_url_joins_path_and_params() {
        let api = client("http://localhost:3000/");
        let url = api
            .url(&["api", "meals"], &[("startDate", "2026-01-11".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/meals?startDate=2026-01-11");
    }

    #[test]
    fn test_url_without_params_has_no_query() {
        let api = client("http://localhost:3000");
        let url = api.url(&["api", "preferences"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/preferences");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_url_encodes_query_values() {
        let api = client("http://localhost:3000");
        let url = api
            .url(&["api", "meals", "search", "names"], &[("query", "phở bò".to_string())])
            .unwrap();
        assert!(url.as_str().contains("query=ph%E1%BB%9F+b%C3%B2"));
    }

    #[test]
    fn test_url_escapes_each_segment() {
        let api = client("http://localhost:3000");
        let url = api.url(&["api", "meals", "a b/c?d"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/meals/a%20b%2Fc%3Fd");
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let api = client("http://localhost:3000/backend/");
        let url = api.url(&["api", "preferences"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/backend/api/preferences");
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(ApiClient::new(&config).is_err());
    }
}
