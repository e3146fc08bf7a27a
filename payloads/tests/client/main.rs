mod auth;
mod fetch;

use payloads::{
    APIClient, Anonymous, ClientConfig, DeviceState, DeviceStore, Identity,
    TokenError,
};
use secrecy::SecretString;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use test_helpers::MockBackend;

pub fn client(base: &str, audience: Option<&str>, page: Option<&str>) -> APIClient {
    APIClient::new(ClientConfig::new(base, audience, page).unwrap())
}

/// Store against `{backend}/api` with no audience and no session.
pub fn store(backend: &MockBackend) -> DeviceStore<Anonymous> {
    DeviceStore::new(client(&backend.url("/api"), None, None), Anonymous)
}

/// Store against `{primary}/api` falling back to `audience` as a host.
pub fn store_with_audience(
    primary: &MockBackend,
    audience: &MockBackend,
) -> DeviceStore<Anonymous> {
    DeviceStore::new(
        client(&primary.url("/api"), Some(&audience.address), None),
        Anonymous,
    )
}

/// Record every snapshot a store publishes.
pub fn recorded<I>(
    store: DeviceStore<I>,
) -> (DeviceStore<I>, Rc<RefCell<Vec<DeviceState>>>) {
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    let sink = snapshots.clone();
    let store = store.with_listener(move |state| sink.borrow_mut().push(state.clone()));
    (store, snapshots)
}

pub fn ids<I>(store: &DeviceStore<I>) -> Vec<String> {
    store.devices().into_iter().map(|d| d.id.0).collect()
}

/// Identity with a scripted session and token outcome.
pub struct FakeIdentity {
    pub authenticated: bool,
    pub token: Result<&'static str, &'static str>,
    pub token_calls: Cell<usize>,
}

impl FakeIdentity {
    pub fn signed_in(token: &'static str) -> Self {
        Self {
            authenticated: true,
            token: Ok(token),
            token_calls: Cell::new(0),
        }
    }

    pub fn broken_token() -> Self {
        Self {
            authenticated: true,
            token: Err("refresh token expired"),
            token_calls: Cell::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            authenticated: false,
            token: Ok("unused"),
            token_calls: Cell::new(0),
        }
    }
}

impl Identity for FakeIdentity {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn token(&self) -> Result<SecretString, TokenError> {
        self.token_calls.set(self.token_calls.get() + 1);
        self.token
            .map(|token| SecretString::from(token.to_string()))
            .map_err(|e| TokenError(e.to_string()))
    }
}
