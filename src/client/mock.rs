//! Scripted in-memory transport for unit tests.

use super::{ApiClient, ApiRequest, RawResponse, Transport};
use crate::query::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub(crate) const TEST_BASE_URL: &str = "http://orion.test/api";

type Reply = Result<RawResponse, FetchError>;

/// Replies from a queue, falling back to a fixed reply once it is empty.
/// Every request is recorded with the (tokio) instant it was sent.
pub(crate) struct MockTransport {
    queue: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    delay: Duration,
    sent: Mutex<Vec<(Instant, ApiRequest)>>,
}

impl MockTransport {
    pub fn reply(fallback: Reply) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            delay: Duration::ZERO,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn json(value: Value) -> Self {
        Self::reply(Ok(ok_json(value)))
    }

    pub fn status(status: u16, text: &str) -> Self {
        Self::reply(Ok(RawResponse::new(status, text)))
    }

    /// Queue a reply to be used before the fallback.
    pub fn then(self, reply: Reply) -> Self {
        self.queue.lock().unwrap().push_back(reply);
        self
    }

    /// Simulated network latency per request.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn sent_at(&self) -> Vec<Instant> {
        self.sent.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, FetchError> {
        self.sent.lock().unwrap().push((Instant::now(), request));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub(crate) fn ok_json(value: Value) -> RawResponse {
    RawResponse::new(200, "OK").with_body(serde_json::to_vec(&value).unwrap())
}

/// Client wired to `transport`, keeping a typed handle for inspection.
pub(crate) fn mock_client(transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::new(TEST_BASE_URL, transport.clone())
}
