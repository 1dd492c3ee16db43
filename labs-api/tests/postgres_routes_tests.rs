//! Router end to end against a live PostgreSQL database.
//!
//! Enabled with `--features db-tests`; connects to `LABS_DATABASE_URL`.

#![cfg(feature = "db-tests")]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use labs_api::{create_router, ApiConfig, AppState, Providers};
use labs_core::MarketInvalidResponse;
use labs_storage::{PostgresConfig, PostgresRecordStore};
use labs_test_utils::{
    fixtures, MockInvalidityClassifier, MockMarketLookup, MockSearchProvider,
    MockSummarizationProvider,
};
use tower::ServiceExt;

#[tokio::test]
async fn test_market_invalid_round_trips_through_postgres() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let n = nanos ^ u64::from(std::process::id());

    let store = PostgresRecordStore::connect(&PostgresConfig::from_env())
        .await
        .expect("Failed to connect to test database");
    let classifier = MockInvalidityClassifier::answering(true);
    let providers = Providers {
        markets: Arc::new(MockMarketLookup::with_markets(vec![fixtures::market(
            n,
            "Will this market resolve?",
        )])),
        search: Arc::new(MockSearchProvider::default()),
        summarizer: Arc::new(MockSummarizationProvider::new()),
        classifier: Arc::new(classifier.clone()),
    };
    let config = ApiConfig::default();
    let state = AppState::new(Arc::new(store), &config, providers)
        .await
        .unwrap();
    let router = create_router(state, &config);
    let uri = format!("/market-invalid?market_id={}", fixtures::market_id(n));

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        bodies.push(serde_json::from_slice::<MarketInvalidResponse>(&body).unwrap());
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0].invalid, Some(true));
    assert_eq!(classifier.calls(), 1);
}
