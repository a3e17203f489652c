//! Query Registry module.
//!
//! Tracks every polling query so they can be paused and resumed together
//! (e.g. when the host application is backgrounded). The registry is an
//! explicit object owned by the application root and shared as
//! `Arc<Registry>`; there is no global instance.

mod error;
mod scope;
#[cfg(test)]
mod tests;

pub use error::*;
pub use scope::QueryScope;

use crate::client::ApiClient;
use crate::endpoints::Endpoint;
use crate::query::{FilterBody, Query, QueryError, QueryOptions};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The Query Registry creates queries and keeps the polling ones.
///
/// Ids come from a counter that only ever grows, so an id is never handed
/// out twice even after its query has been disposed.
///
/// # Examples
///
/// ```no_run
/// use orion::client::ApiClient;
/// use orion::query::{FilterBody, QueryOptions};
/// use orion::registry::Registry;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = Registry::new(ApiClient::with_reqwest("http://localhost:4200/api")?);
///
/// let runs = registry.query_named(
///     "flow_runs",
///     FilterBody::new().limit(10),
///     QueryOptions::poll_every(5000),
/// )?;
/// assert_eq!(registry.len(), 1);
///
/// registry.dispose(runs.id())?;
/// assert!(registry.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct Registry {
    client: ApiClient,
    queries: DashMap<usize, Query>,
    next_id: AtomicUsize,
}

impl Registry {
    /// Create a new empty Registry issuing requests through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            queries: DashMap::new(),
            next_id: AtomicUsize::new(0),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Create a query and start its first fetch.
    ///
    /// The query is registered only when `options` asks for polling; it is
    /// returned either way.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingEndpoint`, `QueryError::InvalidPollInterval`
    /// or `QueryError::NoRuntime` before any id is allocated.
    pub fn query(
        &self,
        endpoint: Option<Endpoint>,
        body: FilterBody,
        options: QueryOptions,
    ) -> Result<Query, QueryError> {
        let endpoint = endpoint.ok_or(QueryError::MissingEndpoint)?;
        options.validate()?;
        tokio::runtime::Handle::try_current().map_err(|_| QueryError::NoRuntime)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let query = Query::new(self.client.clone(), Some(endpoint), body, options, id)?;

        if options.is_polling() {
            self.queries.insert(id, query.clone());
            tracing::debug!(
                query_id = id,
                url = endpoint.url,
                poll_interval_ms = options.poll_interval_ms,
                "Registered polling query"
            );
        }

        Ok(query)
    }

    /// Like [`Registry::query`], looking the endpoint up by name.
    pub fn query_named(
        &self,
        name: &str,
        body: FilterBody,
        options: QueryOptions,
    ) -> Result<Query, QueryError> {
        let endpoint =
            Endpoint::lookup(name).ok_or_else(|| QueryError::UnknownEndpoint(name.to_string()))?;
        self.query(Some(endpoint), body, options)
    }

    /// Get a registered query by id.
    pub fn get(&self, id: usize) -> Option<Query> {
        self.queries.get(&id).map(|entry| entry.value().clone())
    }

    /// Ids of all registered queries, ascending.
    pub fn ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.queries.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered (polling) queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Number of ids handed out so far, registered or not.
    pub fn issued(&self) -> usize {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Resume polling on every registered query.
    pub fn start_polling(&self) {
        let queries = self.snapshot();
        tracing::info!(queries = queries.len(), "Resuming all polling queries");
        for query in queries {
            query.start_polling();
        }
    }

    /// Pause polling on every registered query.
    pub fn stop_polling(&self) {
        let queries = self.snapshot();
        tracing::info!(queries = queries.len(), "Pausing all polling queries");
        for query in queries {
            query.stop_polling();
        }
    }

    /// Stop a query's polling and drop it from the registry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::QueryNotFound` if no query with that id is registered.
    pub fn dispose(&self, id: usize) -> Result<Query, RegistryError> {
        let (_, query) = self
            .queries
            .remove(&id)
            .ok_or(RegistryError::QueryNotFound(id))?;

        query.stop_polling();
        tracing::debug!(query_id = id, "Disposed query");
        Ok(query)
    }

    // Clone handles out so no shard lock is held while queries spawn tasks.
    fn snapshot(&self) -> Vec<Query> {
        self.queries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
