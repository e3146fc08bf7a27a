use crate::DeviceId;
use serde::{Deserialize, Serialize};

/// Body sent to the body-style reservation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveDevice {
    pub id: DeviceId,
}
