use super::*;
use crate::client::mock::{mock_client, MockTransport};
use crate::endpoints::EndpointName;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn registry_with(transport: &Arc<MockTransport>) -> Arc<Registry> {
    Arc::new(Registry::new(mock_client(transport)))
}

fn flow() -> Option<Endpoint> {
    Some(EndpointName::Flow.endpoint())
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_query_without_endpoint_rejected() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let result = registry.query(None, FilterBody::new(), QueryOptions::poll_every(1000));

    assert_eq!(result.unwrap_err(), QueryError::MissingEndpoint);
    assert_eq!(registry.issued(), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_query_named_unknown_endpoint() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let result = registry.query_named("flowz", FilterBody::new(), QueryOptions::default());

    assert_eq!(
        result.unwrap_err(),
        QueryError::UnknownEndpoint("flowz".to_string())
    );
}

#[test]
fn test_query_outside_runtime_consumes_no_id() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let result = registry.query(flow(), FilterBody::new(), QueryOptions::default());

    assert_eq!(result.unwrap_err(), QueryError::NoRuntime);
    assert_eq!(registry.issued(), 0);
}

proptest! {
    #[test]
    fn prop_registry_rejects_sub_second_interval(ms in 1u64..1000) {
        let transport = Arc::new(MockTransport::json(json!([])));
        let registry = registry_with(&transport);

        let result = registry.query(flow(), FilterBody::new(), QueryOptions::poll_every(ms));

        let rejected = matches!(result, Err(QueryError::InvalidPollInterval { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(registry.issued(), 0);
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_only_polling_queries_registered() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let once = registry
        .query(flow(), FilterBody::new(), QueryOptions::default())
        .unwrap();
    let polled = registry
        .query(flow(), FilterBody::new(), QueryOptions::poll_every(2000))
        .unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.get(once.id()).is_none());
    assert!(registry.get(polled.id()).is_some());
    assert_eq!(registry.ids(), vec![polled.id()]);

    registry.stop_polling();
}

#[tokio::test(start_paused = true)]
async fn test_ids_increase_and_are_never_reused() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);
    let options = QueryOptions::poll_every(1000);

    let a = registry.query(flow(), FilterBody::new(), options).unwrap();
    let b = registry.query(flow(), FilterBody::new(), options).unwrap();
    assert_eq!((a.id(), b.id()), (0, 1));

    registry.dispose(a.id()).unwrap();
    assert_eq!(registry.len(), 1);

    let c = registry.query(flow(), FilterBody::new(), options).unwrap();
    assert_eq!(c.id(), 2);
    assert_eq!(registry.issued(), 3);
    assert_eq!(registry.ids(), vec![1, 2]);

    registry.stop_polling();
}

#[tokio::test(start_paused = true)]
async fn test_dispose_unknown_id() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    assert_eq!(
        registry.dispose(42).unwrap_err(),
        RegistryError::QueryNotFound(42)
    );
}

#[tokio::test(start_paused = true)]
async fn test_dispose_stops_polling() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let query = registry
        .query(flow(), FilterBody::new(), QueryOptions::poll_every(1000))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let disposed = registry.dispose(query.id()).unwrap();
    assert!(!disposed.is_polling());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.count(), 1);
}

// ============================================================================
// Global pause / resume
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_flows_query_example() {
    let transport = Arc::new(MockTransport::json(json!([{"id": "a"}])));
    let registry = registry_with(&transport);

    let query = registry
        .query_named("flows", FilterBody::new().limit(10), QueryOptions::default())
        .unwrap();

    let mut rx = query.subscribe();
    let snapshot = rx.wait_for(|s| s.fetch_count == 1).await.unwrap().clone();

    let requests = transport.requests();
    assert_eq!(requests[0].url, "http://orion.test/api/flows/filter/");
    assert_eq!(requests[0].body, Some(json!({"limit": 10})));
    assert_eq!(
        snapshot.response.and_then(|r| r.json().cloned()),
        Some(json!([{"id": "a"}]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_global_stop_during_wait_prevents_second_fetch() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let query = registry
        .query_named("flow", FilterBody::new(), QueryOptions::poll_every(1000))
        .unwrap();
    query.subscribe().wait_for(|s| s.fetch_count == 1).await.unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    registry.stop_polling();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.count(), 1);
    assert_eq!(transport.requests()[0].url, "http://orion.test/api/flows/");
}

#[tokio::test(start_paused = true)]
async fn test_global_start_resumes_all() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);
    let options = QueryOptions::poll_every(1000);

    let a = registry.query_named("flow_runs", FilterBody::new(), options).unwrap();
    let b = registry.query_named("task_runs", FilterBody::new(), options).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.count(), 2);

    registry.stop_polling();
    assert!(!a.is_polling() && !b.is_polling());
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(transport.count(), 2);

    // Resuming fetches each query immediately
    registry.start_polling();
    assert!(a.is_polling() && b.is_polling());
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.count(), 4);

    registry.stop_polling();
}

// ============================================================================
// QueryScope
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_scope_teardown_releases_queries() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let mut scope = QueryScope::new("dashboard", Arc::clone(&registry));
    let polled = scope
        .query_named("flow_runs_count", FilterBody::new(), QueryOptions::poll_every(1000))
        .unwrap();
    scope
        .query_named("version", FilterBody::new(), QueryOptions::default())
        .unwrap();
    assert_eq!(scope.len(), 2);
    assert_eq!(registry.len(), 1);

    assert_eq!(scope.teardown(), 2);
    assert!(scope.is_empty());
    assert!(registry.is_empty());
    assert!(!polled.is_polling());
}

#[tokio::test(start_paused = true)]
async fn test_scope_drop_stops_polling() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let query = {
        let mut scope = QueryScope::new("run-detail", Arc::clone(&registry));
        scope
            .query(flow(), FilterBody::new(), QueryOptions::poll_every(1000))
            .unwrap()
    };

    assert!(registry.is_empty());
    assert!(!query.is_polling());
}

#[tokio::test(start_paused = true)]
async fn test_scope_adopt() {
    let transport = Arc::new(MockTransport::json(json!([])));
    let registry = registry_with(&transport);

    let query = registry
        .query(flow(), FilterBody::new(), QueryOptions::poll_every(1000))
        .unwrap();

    let mut scope = QueryScope::new("adopted", Arc::clone(&registry));
    scope.adopt(query.clone());
    drop(scope);

    assert!(registry.get(query.id()).is_none());
    assert!(!query.is_polling());
}
