//! Queries: one endpoint binding plus its latest response/error/loading state.
//!
//! A [`Query`] fetches once as soon as it is created. With a non-zero poll
//! interval it keeps fetching, waiting `poll_interval` after each fetch
//! *completes* before issuing the next one, so slow responses push later
//! polls out. State changes are published as [`QuerySnapshot`]s on a watch
//! channel.

mod error;
mod filter;


pub use error::*;
pub use filter::*;

use crate::client::{ApiClient, QueryResponse};
use crate::endpoints::Endpoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Smallest allowed non-zero poll interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 1000;

/// Options accepted when creating a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Delay after each completed fetch before the next one; 0 disables polling
    pub poll_interval_ms: u64,
}

impl QueryOptions {
    pub fn poll_every(poll_interval_ms: u64) -> Self {
        Self { poll_interval_ms }
    }

    /// Check that the poll interval is 0 or at least [`MIN_POLL_INTERVAL_MS`].
    ///
    /// # Examples
    ///
    /// ```
    /// use orion::query::QueryOptions;
    ///
    /// assert!(QueryOptions::poll_every(0).validate().is_ok());
    /// assert!(QueryOptions::poll_every(999).validate().is_err());
    /// assert!(QueryOptions::poll_every(1000).validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.poll_interval_ms > 0 && self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(QueryError::InvalidPollInterval {
                got: self.poll_interval_ms,
                min: MIN_POLL_INTERVAL_MS,
            });
        }
        Ok(())
    }

    pub fn is_polling(&self) -> bool {
        self.poll_interval_ms > 0
    }
}

/// Observable state of a query at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshot {
    pub loading: bool,
    /// Error from the most recent fetch, cleared when a fetch starts
    pub error: Option<FetchError>,
    /// Last successful response; kept across failed fetches
    pub response: Option<QueryResponse>,
    /// When the most recent fetch settled
    pub fetched_at: Option<DateTime<Utc>>,
    /// Number of fetches that have settled
    pub fetch_count: u64,
}

/// Handle to a query. Clones share the same state and timer.
#[derive(Clone)]
pub struct Query {
    inner: Arc<QueryInner>,
}

struct QueryInner {
    id: usize,
    endpoint: Endpoint,
    body: FilterBody,
    options: QueryOptions,
    client: ApiClient,
    state: watch::Sender<QuerySnapshot>,
    /// Token for the live polling task, if any
    timer: Mutex<Option<CancellationToken>>,
    runtime: Handle,
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("id", &self.inner.id)
            .field("endpoint", &self.inner.endpoint)
            .field("body", &self.inner.body)
            .field("options", &self.inner.options)
            .field("polling", &self.is_polling())
            .finish()
    }
}

impl Query {
    /// Create a query and kick off its first fetch without waiting for it.
    ///
    /// # Errors
    ///
    /// - `QueryError::MissingEndpoint` if `endpoint` is `None`
    /// - `QueryError::InvalidPollInterval` if the interval is in (0, 1000) ms
    /// - `QueryError::NoRuntime` if called outside a tokio runtime
    pub fn new(
        client: ApiClient,
        endpoint: Option<Endpoint>,
        body: FilterBody,
        options: QueryOptions,
        id: usize,
    ) -> Result<Self, QueryError> {
        let endpoint = endpoint.ok_or(QueryError::MissingEndpoint)?;
        options.validate()?;
        let runtime = Handle::try_current().map_err(|_| QueryError::NoRuntime)?;

        let (state, _) = watch::channel(QuerySnapshot::default());
        let query = Self {
            inner: Arc::new(QueryInner {
                id,
                endpoint,
                body,
                options,
                client,
                state,
                timer: Mutex::new(None),
                runtime,
            }),
        };

        tracing::debug!(
            query_id = id,
            method = %endpoint.method,
            url = endpoint.url,
            poll_interval_ms = options.poll_interval_ms,
            "Query created"
        );

        // The first polling cycle performs the initial fetch.
        if options.is_polling() {
            query.start_polling();
        } else {
            let q = query.clone();
            query.inner.runtime.spawn(async move {
                q.fetch().await;
            });
        }

        Ok(query)
    }

    pub fn id(&self) -> usize {
        self.inner.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    pub fn body(&self) -> &FilterBody {
        &self.inner.body
    }

    pub fn options(&self) -> QueryOptions {
        self.inner.options
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.inner.options.poll_interval_ms)
    }

    /// Current state.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.inner.state.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<FetchError> {
        self.inner.state.borrow().error.clone()
    }

    pub fn response(&self) -> Option<QueryResponse> {
        self.inner.state.borrow().response.clone()
    }

    /// Perform one round trip and record the outcome.
    ///
    /// Never fails: HTTP and transport errors land in the `error` field and
    /// the previous `response` is kept. `loading` is false once this returns.
    pub async fn fetch(&self) -> &Self {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self
            .inner
            .client
            .request(&self.inner.endpoint, &self.inner.body)
            .await;

        if let Err(e) = &result {
            tracing::debug!(query_id = self.inner.id, error = %e, "Query fetch failed");
        }

        self.inner.state.send_modify(|s| {
            match result {
                Ok(response) => s.response = Some(response),
                Err(e) => s.error = Some(e),
            }
            s.loading = false;
            s.fetched_at = Some(Utc::now());
            s.fetch_count += 1;
        });

        self
    }

    /// Cancel any scheduled fetch, then (if polling is configured) fetch now
    /// and keep fetching `poll_interval` after each completion.
    pub fn start_polling(&self) {
        // Swap under one guard so concurrent callers cannot orphan a loop.
        let mut timer = self.timer();
        if let Some(old) = timer.take() {
            old.cancel();
        }
        if !self.inner.options.is_polling() {
            return;
        }

        let token = CancellationToken::new();
        *timer = Some(token.clone());
        drop(timer);

        tracing::debug!(
            query_id = self.inner.id,
            poll_interval_ms = self.inner.options.poll_interval_ms,
            "Polling started"
        );

        let query = self.clone();
        self.inner.runtime.spawn(async move {
            query.poll(token).await;
        });
    }

    /// Cancel the scheduled fetch, if any. A fetch already in flight still
    /// completes and its result is applied.
    pub fn stop_polling(&self) {
        if let Some(token) = self.timer().take() {
            token.cancel();
            tracing::debug!(query_id = self.inner.id, "Polling stopped");
        }
    }

    /// Whether a polling cycle is currently scheduled.
    pub fn is_polling(&self) -> bool {
        self.timer().as_ref().is_some_and(|t| !t.is_cancelled())
    }

    async fn poll(self, token: CancellationToken) {
        let interval = self.poll_interval();
        loop {
            self.fetch().await;
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    fn timer(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        // The guarded value is a plain Option, so a poisoned lock is still usable.
        self.inner
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
