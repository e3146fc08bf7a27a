use payloads::DeviceState;
use yewdux::prelude::*;

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    // === Devices (mirrored from the DeviceStore by use_devices) ===
    pub devices: DeviceState,
}

impl State {
    pub fn is_reserving(&self, id: &payloads::DeviceId) -> bool {
        self.devices.reserving.contains(id)
    }
}
