use crate::{AppState, build_app};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Duration};
use domain::{DEFAULT_TIMEZONE, HistoryMap, Reachability, StatusEvent};
use fleet_catalog::{Catalog, normalize_row};
use fleet_monitor::MonitorService;
use fleet_probe::{Probe, ProbeError, Prober};
use fleet_storage::{InMemoryHistoryStore, RetentionPolicy};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

struct StaticProbe;

#[async_trait]
impl Probe for StaticProbe {
    async fn probe(&self, identifier: &str) -> Result<Reachability, ProbeError> {
        if identifier.ends_with(".9") {
            Ok(Reachability::Offline)
        } else {
            Ok(Reachability::Online)
        }
    }
}

fn catalog() -> Catalog {
    let mut rows = BTreeMap::new();
    rows.insert(
        "North".to_string(),
        vec![
            normalize_row([("IP Address", "10.0.0.1"), ("Name", "Gate")]),
            normalize_row([("IP Address", "10.0.0.9"), ("Name", "Yard")]),
        ],
    );
    rows.insert(
        "South".to_string(),
        vec![normalize_row([("ip", "10.0.1.1")])],
    );
    Catalog::from_rows(rows)
}

fn app_with(store: InMemoryHistoryStore, catalog: Option<Catalog>) -> Router {
    let mut monitor = MonitorService::new(
        Prober::new(Arc::new(StaticProbe), 4),
        Arc::new(store),
        DEFAULT_TIMEZONE,
    );
    if let Some(catalog) = catalog {
        monitor = monitor.with_catalog(catalog);
    }
    build_app(AppState {
        monitor: Arc::new(monitor),
    })
}

async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_sets_request_headers() {
    let app = app_with(InMemoryHistoryStore::default(), None);
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-trace-id"));
}

#[tokio::test]
async fn missing_catalog_reports_unavailable() {
    let app = app_with(InMemoryHistoryStore::default(), None);
    for uri in ["/devices", "/api/regions", "/identifiers", "/devices/10.0.0.1/history"] {
        let (status, body) = call(app.clone(), "GET", uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["success"], true, "{uri}");
        assert!(body["data"].is_null(), "{uri}");
        assert_eq!(body["error"]["code"], "DATA.UNAVAILABLE", "{uri}");
    }
}

#[tokio::test]
async fn fetch_all_returns_summary_and_details() {
    let app = app_with(InMemoryHistoryStore::default(), Some(catalog()));
    let (status, body) = call(app, "GET", "/api/devices").await;
    assert_eq!(status, StatusCode::OK);

    let summary = &body["data"]["summary"];
    assert_eq!(summary["totalDevices"], 3);
    assert_eq!(summary["totalOnline"], 2);
    assert_eq!(summary["totalOffline"], 1);
    assert_eq!(summary["North"]["offline"], 1);

    let north = body["data"]["details"]["North"].as_array().expect("north");
    assert_eq!(north[0]["identifier"], "10.0.0.1");
    assert_eq!(north[0]["status"], "Online");
    assert_eq!(north[1]["displayName"], "Yard");
}

#[tokio::test]
async fn region_fetch_and_unknown_region() {
    let app = app_with(InMemoryHistoryStore::default(), Some(catalog()));
    let (status, body) = call(app.clone(), "GET", "/regions/south/devices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["totalDevices"], 1);

    let (status, body) = call(app, "GET", "/regions/West/devices").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE.NOT_FOUND");
}

#[tokio::test]
async fn catalog_listings() {
    let app = app_with(InMemoryHistoryStore::default(), Some(catalog()));
    let (_, body) = call(app.clone(), "GET", "/identifiers").await;
    assert_eq!(
        body["data"],
        serde_json::json!(["10.0.0.1", "10.0.0.9", "10.0.1.1"])
    );
    let (_, body) = call(app, "GET", "/regions").await;
    assert_eq!(body["data"][0]["name"], "North");
    assert_eq!(body["data"][0]["deviceCount"], 2);
}

#[tokio::test]
async fn history_and_stats_for_device() {
    let t0 = DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z").expect("t0");
    let mut seed = HistoryMap::new();
    seed.insert(
        "10.0.0.1".to_string(),
        vec![
            StatusEvent::new(Reachability::Offline, t0),
            StatusEvent::new(Reachability::Online, t0 + Duration::minutes(10)),
            StatusEvent::new(Reachability::Offline, t0 + Duration::minutes(40)),
        ],
    );
    let store = InMemoryHistoryStore::seeded(seed, RetentionPolicy::default());
    let app = app_with(store, Some(catalog()));

    let (status, body) = call(app.clone(), "GET", "/devices/10.0.0.1/history").await;
    assert_eq!(status, StatusCode::OK);
    let history = body["data"]["history"].as_array().expect("history");
    assert_eq!(history.len(), 3);
    assert_eq!(history[1]["status"], "Online");

    let (status, body) = call(app.clone(), "GET", "/api/devices/10.0.0.1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["uptime"], "0d 0h 30m");
    assert_eq!(body["data"]["uptimeMinutes"], 30);
    assert_eq!(body["data"]["totalDowntimeMinutes"], 10);

    let (status, _) = call(app, "GET", "/devices/10.9.9.9/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reload_without_source_is_bad_request() {
    let app = app_with(InMemoryHistoryStore::default(), None);
    let (status, body) = call(app, "POST", "/catalog/reload").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID.REQUEST");
}

#[tokio::test]
async fn metrics_snapshot_is_served() {
    let app = app_with(InMemoryHistoryStore::default(), Some(catalog()));
    call(app.clone(), "GET", "/devices").await;
    let (status, body) = call(app, "GET", "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["fetchCycles"].as_u64().expect("cycles") >= 1);
    assert!(body["data"]["probesDispatched"].as_u64().expect("probes") >= 3);
}
