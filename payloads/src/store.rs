//! Reactive state container for the device list and reservations.
//!
//! The store is single-threaded: state lives in a `RefCell` and no borrow is
//! held across an `.await`, so a fetch and any number of reservations for
//! distinct devices can interleave on one executor.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::identity::{Identity, bearer_token};
use crate::{APIClient, Device, DeviceId, diagnostics};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub devices: Vec<Device>,
    /// True while at least one fetch is in flight.
    pub loading: bool,
    /// Message from the last failed fetch, cleared when a fetch starts.
    pub error: Option<String>,
    /// Message from the last failed reservation, cleared when one starts.
    pub reservation_error: Option<String>,
    /// Devices with a reservation in flight.
    pub reserving: BTreeSet<DeviceId>,
}

type Listener = Box<dyn Fn(&DeviceState)>;

pub struct DeviceStore<I> {
    client: APIClient,
    identity: I,
    state: RefCell<DeviceState>,
    fetches_in_flight: Cell<usize>,
    listener: Option<Listener>,
}

impl<I> DeviceStore<I> {
    pub fn new(client: APIClient, identity: I) -> Self {
        Self {
            client,
            identity,
            state: RefCell::new(DeviceState::default()),
            fetches_in_flight: Cell::new(0),
            listener: None,
        }
    }

    /// Call `listener` with a snapshot after every state change.
    pub fn with_listener(mut self, listener: impl Fn(&DeviceState) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn client(&self) -> &APIClient {
        &self.client
    }

    pub fn state(&self) -> DeviceState {
        self.state.borrow().clone()
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state.borrow().devices.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn reservation_error(&self) -> Option<String> {
        self.state.borrow().reservation_error.clone()
    }

    pub fn is_reserving(&self, id: &DeviceId) -> bool {
        self.state.borrow().reserving.contains(id)
    }

    pub fn reserving(&self) -> BTreeSet<DeviceId> {
        self.state.borrow().reserving.clone()
    }

    fn update(&self, f: impl FnOnce(&mut DeviceState)) {
        f(&mut self.state.borrow_mut());
        if let Some(listener) = &self.listener {
            let snapshot = self.state.borrow().clone();
            listener(&snapshot);
        }
    }
}

impl<I: Identity> DeviceStore<I> {
    /// Load the device list.
    ///
    /// Dropped while another fetch is loading unless `force` is set. On
    /// failure the previous devices are kept and `error` is set.
    pub async fn fetch_devices(&self, force: bool) {
        if self.is_loading() && !force {
            tracing::debug!("Fetch already in progress, skipping");
            return;
        }
        let _loading = LoadingGuard::start(self);

        let token = bearer_token(&self.identity).await;
        match self.client.get_devices(token.as_ref()).await {
            Ok(devices) => {
                tracing::info!("Loaded {} devices", devices.len());
                self.update(|state| state.devices = devices);
            }
            Err(e) => {
                let message =
                    diagnostics::describe(&e, self.client.config.page_url());
                tracing::warn!("Failed to fetch devices: {message}");
                self.update(|state| state.error = Some(message));
            }
        }
    }

    /// Reserve a device, removing it from the list on success.
    ///
    /// Returns false without any request when a reservation for `id` is
    /// already in flight.
    pub async fn reserve_device(&self, id: impl Into<DeviceId>) -> bool {
        let id = id.into();
        if self.is_reserving(&id) {
            tracing::debug!("Reservation of {id} already in progress");
            return false;
        }
        let _reserving = ReservingGuard::start(self, id.clone());

        let token = bearer_token(&self.identity).await;
        match self.client.reserve_device(&id, token.as_ref()).await {
            Ok(()) => {
                tracing::info!("Reserved device {id}");
                self.update(|state| state.devices.retain(|d| d.id != id));
                true
            }
            Err(e) => {
                tracing::warn!("Failed to reserve device {id}: {e}");
                self.update(|state| {
                    state.reservation_error = Some(e.to_string())
                });
                false
            }
        }
    }
}

/// Keeps `loading` set for as long as any fetch holds a guard.
struct LoadingGuard<'a, I> {
    store: &'a DeviceStore<I>,
}

impl<'a, I> LoadingGuard<'a, I> {
    fn start(store: &'a DeviceStore<I>) -> Self {
        store.fetches_in_flight.set(store.fetches_in_flight.get() + 1);
        store.update(|state| {
            state.loading = true;
            state.error = None;
        });
        Self { store }
    }
}

impl<I> Drop for LoadingGuard<'_, I> {
    fn drop(&mut self) {
        let remaining = self.store.fetches_in_flight.get().saturating_sub(1);
        self.store.fetches_in_flight.set(remaining);
        if remaining == 0 {
            self.store.update(|state| state.loading = false);
        }
    }
}

/// Marks one device as reserving until dropped.
struct ReservingGuard<'a, I> {
    store: &'a DeviceStore<I>,
    id: DeviceId,
}

impl<'a, I> ReservingGuard<'a, I> {
    fn start(store: &'a DeviceStore<I>, id: DeviceId) -> Self {
        store.update(|state| {
            state.reserving.insert(id.clone());
            state.reservation_error = None;
        });
        Self { store, id }
    }
}

impl<I> Drop for ReservingGuard<'_, I> {
    fn drop(&mut self) {
        let id = &self.id;
        self.store.update(|state| {
            state.reserving.remove(id);
        });
    }
}
