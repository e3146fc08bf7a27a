use payloads::DeviceStore;
use test_helpers::{mock, spawn_backend};

use crate::{FakeIdentity, client};

#[tokio::test]
async fn bearer_token_is_sent_to_every_candidate() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond("GET", "/api/device", 200, "[]");
    let store = DeviceStore::new(
        client(&backend.url("/api"), None, None),
        FakeIdentity::signed_in("t0k3n"),
    );

    store.fetch_devices(false).await;

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.authorization.as_deref(), Some("Bearer t0k3n"));
    }
    Ok(())
}

#[tokio::test]
async fn token_is_requested_once_per_operation() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    backend.respond("POST", "/api/reserve", 200, "{}");
    let identity = FakeIdentity::signed_in("t0k3n");
    let store =
        DeviceStore::new(client(&backend.url("/api"), None, None), &identity);

    assert!(store.reserve_device("lap-001").await);
    store.fetch_devices(false).await;

    // five reserve candidates, then four fetch candidates all 404
    assert_eq!(backend.requests().len(), 5 + 4);
    assert_eq!(identity.token_calls.get(), 2);
    Ok(())
}

#[tokio::test]
async fn token_failure_degrades_to_anonymous() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mock::seed_inventory(&backend);
    let store = DeviceStore::new(
        client(&backend.url("/api"), None, None),
        FakeIdentity::broken_token(),
    );

    store.fetch_devices(false).await;

    assert_eq!(store.devices().len(), 4);
    assert_eq!(store.error(), None);
    assert_eq!(backend.requests()[0].authorization, None);
    Ok(())
}

#[tokio::test]
async fn signed_out_identity_is_not_asked_for_a_token() -> anyhow::Result<()> {
    let backend = spawn_backend().await;
    mock::seed_inventory(&backend);
    let identity = FakeIdentity::signed_out();
    let store =
        DeviceStore::new(client(&backend.url("/api"), None, None), &identity);

    store.fetch_devices(false).await;
    assert!(store.reserve_device("tab-004").await);

    assert_eq!(identity.token_calls.get(), 0);
    assert!(backend.requests().iter().all(|r| r.authorization.is_none()));
    Ok(())
}
