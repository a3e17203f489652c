//! Ownership scope for the queries of one view or component.

use super::Registry;
use crate::endpoints::Endpoint;
use crate::query::{FilterBody, Query, QueryError, QueryOptions};
use std::sync::Arc;

/// Groups the queries a component creates and disposes them together.
///
/// `teardown` (also run on drop) stops every owned query's polling and
/// removes it from the registry.
pub struct QueryScope {
    name: String,
    registry: Arc<Registry>,
    owned: Vec<Query>,
}

impl QueryScope {
    pub fn new(name: impl Into<String>, registry: Arc<Registry>) -> Self {
        Self {
            name: name.into(),
            registry,
            owned: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a query through the registry and take ownership of it.
    pub fn query(
        &mut self,
        endpoint: Option<Endpoint>,
        body: FilterBody,
        options: QueryOptions,
    ) -> Result<Query, QueryError> {
        let query = self.registry.query(endpoint, body, options)?;
        self.owned.push(query.clone());
        Ok(query)
    }

    pub fn query_named(
        &mut self,
        name: &str,
        body: FilterBody,
        options: QueryOptions,
    ) -> Result<Query, QueryError> {
        let query = self.registry.query_named(name, body, options)?;
        self.owned.push(query.clone());
        Ok(query)
    }

    /// Take ownership of a query created elsewhere.
    pub fn adopt(&mut self, query: Query) {
        self.owned.push(query);
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Stop and unregister every owned query. Returns how many were released.
    pub fn teardown(&mut self) -> usize {
        let released = self.owned.len();
        for query in self.owned.drain(..) {
            query.stop_polling();
            // Non-polling queries were never registered.
            let _ = self.registry.dispose(query.id());
        }

        if released > 0 {
            tracing::debug!(scope = %self.name, released, "Scope torn down");
        }
        released
    }
}

impl Drop for QueryScope {
    fn drop(&mut self) {
        self.teardown();
    }
}
