use payloads::{ConfigError, Device, DeviceId, DeviceStore};
use std::collections::BTreeSet;
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::{BrowserIdentity, State, get_api_client};

type Store = Result<DeviceStore<BrowserIdentity>, ConfigError>;

/// Hook return type for the device inventory
pub struct DevicesHookReturn {
    pub devices: Vec<Device>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub reservation_error: Option<String>,
    pub reserving: BTreeSet<DeviceId>,
    /// Refetch the list; `true` forces a fetch even while one is loading.
    pub refetch: Callback<bool>,
    pub reserve: Callback<DeviceId>,
}

impl DevicesHookReturn {
    /// Returns true if this is the initial load (no data, no error, loading)
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && self.devices.is_empty() && self.error.is_none()
    }

    pub fn is_reserving(&self, id: &DeviceId) -> bool {
        self.reserving.contains(id)
    }
}

/// Hook exposing the device list and reservations.
///
/// A single `DeviceStore` lives for the lifetime of the component and
/// publishes every state change into the global yewdux `State`. The list is
/// fetched on mount.
#[hook]
pub fn use_devices() -> DevicesHookReturn {
    let (state, dispatch) = use_store::<State>();

    let store: Rc<Store> = use_memo((), move |_| {
        get_api_client().map(|client| {
            DeviceStore::new(client, BrowserIdentity).with_listener(
                move |snapshot| {
                    let snapshot = snapshot.clone();
                    dispatch.reduce_mut(|state| state.devices = snapshot);
                },
            )
        })
    });

    let refetch = {
        let store = store.clone();
        Callback::from(move |force: bool| {
            let store = store.clone();
            yew::platform::spawn_local(async move {
                if let Ok(store) = &*store {
                    store.fetch_devices(force).await;
                }
            });
        })
    };

    let reserve = {
        let store = store.clone();
        Callback::from(move |id: DeviceId| {
            let store = store.clone();
            yew::platform::spawn_local(async move {
                if let Ok(store) = &*store
                    && !store.reserve_device(id.clone()).await
                {
                    tracing::debug!("Reservation of {id} did not go through");
                }
            });
        })
    };

    // Auto-load devices on mount
    {
        let refetch = refetch.clone();
        use_effect_with((), move |_| {
            refetch.emit(false);
        });
    }

    let config_error = match &*store {
        Ok(_) => None,
        Err(e) => Some(format!("Invalid API configuration: {e}")),
    };
    let devices = &state.devices;

    DevicesHookReturn {
        devices: devices.devices.clone(),
        is_loading: devices.loading,
        error: config_error.or_else(|| devices.error.clone()),
        reservation_error: devices.reservation_error.clone(),
        reserving: devices.reserving.clone(),
        refetch,
        reserve,
    }
}
