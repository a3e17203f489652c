//! HTTP client for the Orion REST API.
//!
//! `ApiClient` turns an [`Endpoint`] plus an optional [`FilterBody`] into a
//! request, hands it to a [`Transport`] and interprets the status code:
//! 200 is decoded as JSON, 204 is returned as the raw bodyless response and
//! every other status becomes a [`FetchError::Http`].

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::ReqwestTransport;

use crate::endpoints::{Endpoint, HttpMethod};
use crate::query::{FetchError, FilterBody};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4200/api";

/// A fully resolved request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body; always `None` for GET
    pub body: Option<Value>,
}

/// Response as received from the transport, before status interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Outcome of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// 200 with a decoded JSON body
    Json(Value),
    /// 204; there is no body to decode
    NoContent(RawResponse),
}

impl QueryResponse {
    pub fn json(&self) -> Option<&Value> {
        match self {
            QueryResponse::Json(value) => Some(value),
            QueryResponse::NoContent(_) => None,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            QueryResponse::Json(_) => 200,
            QueryResponse::NoContent(raw) => raw.status,
        }
    }
}

/// Sends a resolved request and returns whatever the server answered.
///
/// Implementations only report transport failures as errors; status code
/// handling lives in [`ApiClient`]. Used as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, FetchError>;
}

/// Cheaply cloneable handle bundling a base URL and a transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    /// Client for `base_url` backed by reqwest with no request timeout.
    pub fn with_reqwest(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self::new(base_url, Arc::new(ReqwestTransport::new(None)?)))
    }

    /// Build a client from the `[api]` config section.
    pub fn from_config(config: &crate::config::ApiConfig) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(config.timeout_seconds)?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint and body into a wire request.
    pub fn build_request(&self, endpoint: &Endpoint, body: &FilterBody) -> ApiRequest {
        ApiRequest {
            method: endpoint.method,
            url: format!("{}{}", self.base_url, endpoint.url),
            body: endpoint.method.has_body().then(|| body.to_json()),
        }
    }

    /// Perform one round trip and interpret the status code.
    pub async fn request(
        &self,
        endpoint: &Endpoint,
        body: &FilterBody,
    ) -> Result<QueryResponse, FetchError> {
        let request = self.build_request(endpoint, body);
        let start = Instant::now();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "Sending API request"
        );

        let result = match self.transport.send(request).await {
            Ok(raw) => Self::interpret(raw),
            Err(e) => Err(e),
        };

        let latency = start.elapsed();
        metrics::histogram!("orion_query_latency_seconds", "endpoint" => endpoint.url)
            .record(latency.as_secs_f64());
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::counter!(
            "orion_query_fetches_total",
            "endpoint" => endpoint.url,
            "outcome" => outcome
        )
        .increment(1);

        match &result {
            Ok(response) => tracing::debug!(
                url = endpoint.url,
                status = response.status(),
                latency_ms = latency.as_millis() as u64,
                "API request completed"
            ),
            Err(e) => tracing::warn!(
                url = endpoint.url,
                error = %e,
                latency_ms = latency.as_millis() as u64,
                "API request failed"
            ),
        }

        result
    }

    fn interpret(raw: RawResponse) -> Result<QueryResponse, FetchError> {
        match raw.status {
            200 => serde_json::from_slice(&raw.body)
                .map(QueryResponse::Json)
                .map_err(|e| FetchError::Decode(e.to_string())),
            204 => Ok(QueryResponse::NoContent(raw)),
            status => Err(FetchError::Http {
                status,
                status_text: raw.status_text,
            }),
        }
    }
}
