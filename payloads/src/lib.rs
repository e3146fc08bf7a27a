pub mod api_client;
pub mod config;
pub mod diagnostics;
pub mod endpoints;
pub mod identity;
pub mod requests;
pub mod responses;
pub mod store;

pub use api_client::{APIClient, ClientError};
pub use config::{ClientConfig, ConfigError};
pub use identity::{Anonymous, Identity, TokenError};
pub use store::{DeviceState, DeviceStore};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifier of a device, unique within one fetch result.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceStatus {
    #[default]
    #[display("available")]
    Available,
    #[display("on-loan")]
    OnLoan,
    #[display("maintenance")]
    Maintenance,
}

/// A device in the inventory as reported by the backend.
///
/// Devices are only ever replaced wholesale by a fetch or dropped from the
/// list once reserved; the client never edits individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Loan deposit in pence, when the backend prices devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_pence: Option<u32>,
}

impl Device {
    pub fn is_available(&self) -> bool {
        self.status == DeviceStatus::Available
    }
}
