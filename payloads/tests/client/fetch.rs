use payloads::diagnostics::NetworkHint;
use payloads::{Anonymous, DeviceStore};
use serde_json::json;
use test_helpers::{mock, spawn_backend, unreachable_address};

use crate::{client, ids, recorded, store, store_with_audience};

#[tokio::test]
async fn fetch_from_first_candidate() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond_json(
        "GET",
        "/api/devices",
        200,
        &json!([{"id": "1", "name": "A"}, {"id": "2", "name": "B"}]),
    );
    let store = store(&backend);

    store.fetch_devices(false).await;

    assert_eq!(ids(&store), ["1", "2"]);
    assert!(!store.is_loading());
    assert_eq!(store.error(), None);
    assert_eq!(backend.request_lines(), ["GET /api/devices"]);
    let request = &backend.requests()[0];
    assert_eq!(request.accept.as_deref(), Some("application/json"));
    assert_eq!(request.content_type, None);
    assert_eq!(request.authorization, None);
    Ok(())
}

#[tokio::test]
async fn singular_collection_fallback() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond_json(
        "GET",
        "/api/device",
        200,
        &json!({"data": [{"id": "2", "name": "B"}]}),
    );
    let store = store(&backend);

    store.fetch_devices(false).await;

    assert_eq!(ids(&store), ["2"]);
    assert_eq!(
        backend.request_lines(),
        ["GET /api/devices", "GET /api/device"]
    );
    Ok(())
}

#[tokio::test]
async fn api_segment_is_stripped_on_fallback() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond_json("GET", "/devices", 200, &json!([mock::laptop()]));
    let store = store(&backend);

    store.fetch_devices(false).await;

    assert_eq!(ids(&store), ["lap-001"]);
    assert_eq!(
        backend.request_lines(),
        ["GET /api/devices", "GET /api/device", "GET /devices"]
    );
    Ok(())
}

#[tokio::test]
async fn audience_host_is_tried_last() -> anyhow::Result<()> {
    let primary = spawn_backend().await;
    let audience = spawn_backend().await;
    audience.respond_json(
        "GET",
        "/devices",
        200,
        &json!({"items": [mock::tablet()]}),
    );
    let store = store_with_audience(&primary, &audience);

    store.fetch_devices(false).await;

    assert_eq!(ids(&store), ["tab-004"]);
    assert_eq!(primary.requests().len(), 4);
    assert_eq!(audience.request_lines(), ["GET /devices"]);
    Ok(())
}

#[tokio::test]
async fn every_candidate_is_tried_before_failing() -> anyhow::Result<()> {
    let primary = spawn_backend().await;
    let audience = spawn_backend().await;
    let store = store_with_audience(&primary, &audience);

    store.fetch_devices(false).await;

    assert_eq!(
        primary.request_lines(),
        [
            "GET /api/devices",
            "GET /api/device",
            "GET /devices",
            "GET /device"
        ]
    );
    assert_eq!(audience.request_lines(), ["GET /devices", "GET /device"]);
    let error = store.error().unwrap();
    assert!(error.contains("6 candidate URLs returned 404"), "{error}");
    assert!(store.devices().is_empty());
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn server_error_stops_probing() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond("GET", "/api/devices", 500, "database unavailable");
    backend.respond_json("GET", "/api/device", 200, &json!([mock::laptop()]));
    let store = store(&backend);

    store.fetch_devices(false).await;

    assert_eq!(backend.request_lines(), ["GET /api/devices"]);
    let error = store.error().unwrap();
    assert!(error.contains("500"), "{error}");
    assert!(error.contains("database unavailable"), "{error}");
    // HTTP errors are surfaced as-is, without a network hint
    assert!(!error.contains(NetworkHint::NetworkOrCors.message()));
    assert!(store.devices().is_empty());
    Ok(())
}

#[tokio::test]
async fn failure_keeps_previous_devices() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mock::seed_inventory(&backend);
    let store = store(&backend);
    store.fetch_devices(false).await;
    assert_eq!(store.devices().len(), 4);

    backend.respond("GET", "/api/devices", 503, "");
    store.fetch_devices(false).await;

    assert_eq!(store.devices().len(), 4);
    let error = store.error().unwrap();
    assert!(error.contains("503"), "{error}");

    // The next attempt clears the error before probing
    mock::seed_inventory(&backend);
    store.fetch_devices(false).await;
    assert_eq!(store.error(), None);
    Ok(())
}

#[tokio::test]
async fn concurrent_fetch_is_dropped_unless_forced() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mock::seed_inventory(&backend);
    let store = store(&backend);

    tokio::join!(store.fetch_devices(false), store.fetch_devices(false));
    assert_eq!(backend.requests().len(), 1);

    backend.clear_requests();
    tokio::join!(store.fetch_devices(false), store.fetch_devices(true));
    assert_eq!(backend.requests().len(), 2);
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn loading_is_published_around_the_fetch() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mock::seed_inventory(&backend);
    let (store, snapshots) = recorded(store(&backend));

    store.fetch_devices(false).await;

    let snapshots = snapshots.borrow();
    let first = snapshots.first().unwrap();
    assert!(first.loading);
    assert!(first.devices.is_empty());
    let last = snapshots.last().unwrap();
    assert!(!last.loading);
    assert_eq!(last.devices.len(), 4);
    Ok(())
}

#[tokio::test]
async fn unparseable_body_is_an_error() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond("GET", "/api/devices", 200, "<html>oops</html>");
    let store = store(&backend);

    store.fetch_devices(false).await;

    let error = store.error().unwrap();
    assert!(error.contains("Invalid JSON"), "{error}");
    assert_eq!(backend.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn unrecognized_body_is_an_empty_list() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond_json("GET", "/api/devices", 200, &json!({"foo": 1}));
    let store = store(&backend);

    store.fetch_devices(false).await;

    assert!(store.devices().is_empty());
    assert_eq!(store.error(), None);
    Ok(())
}

#[tokio::test]
async fn network_error_on_https_page_gets_mixed_content_hint()
-> anyhow::Result<()> {
    let base = format!("{}/api", unreachable_address());
    let store = DeviceStore::new(
        client(&base, None, Some("https://inventory.example.com/")),
        Anonymous,
    );

    store.fetch_devices(false).await;

    let error = store.error().unwrap();
    assert!(error.contains("Network error"), "{error}");
    assert!(error.contains(NetworkHint::MixedContent.message()), "{error}");
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn network_error_on_same_scheme_gets_generic_hint()
-> anyhow::Result<()> {
    let base = format!("{}/api", unreachable_address());
    let store = DeviceStore::new(
        client(&base, None, Some("http://127.0.0.1:5173/")),
        Anonymous,
    );

    store.fetch_devices(false).await;

    let error = store.error().unwrap();
    assert!(error.contains(NetworkHint::NetworkOrCors.message()), "{error}");
    Ok(())
}

#[tokio::test]
async fn network_error_falls_through_to_audience() -> anyhow::Result<()> {
    let audience = spawn_backend().await;
    audience.respond_json("GET", "/devices", 200, &json!([mock::camera()]));
    let base = format!("{}/api", unreachable_address());
    let store = DeviceStore::new(
        client(&base, Some(&audience.address), None),
        Anonymous,
    );

    store.fetch_devices(false).await;

    assert_eq!(ids(&store), ["cam-002"]);
    assert_eq!(store.error(), None);
    Ok(())
}
