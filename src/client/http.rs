//! reqwest-backed transport.

use super::{ApiRequest, RawResponse, Transport};
use crate::query::FetchError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// Production transport using a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_seconds: Option<u64>,
}

impl ReqwestTransport {
    /// Create a transport. `None` leaves requests unbounded in time.
    pub fn new(timeout_seconds: Option<u64>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            timeout_seconds,
        })
    }

    fn classify_error(&self, e: reqwest::Error) -> FetchError {
        match self.timeout_seconds {
            Some(secs) if e.is_timeout() => FetchError::Timeout(secs),
            _ => FetchError::Transport(e.to_string()),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, FetchError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        if let Some(body) = &request.body {
            // .json() also sets Content-Type: application/json
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.classify_error(e))?;

        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_error(e))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.to_vec(),
        })
    }
}
