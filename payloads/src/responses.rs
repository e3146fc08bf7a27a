//! Normalization of device list responses.
//!
//! Backends in the wild answer a device listing either with a bare array or
//! with the array wrapped in an envelope object. Every shape is reduced to a
//! plain `Vec<Device>` here, independent of which endpoint answered.

use serde_json::Value;

use crate::Device;

/// Envelope keys checked, in priority order, when the body is an object.
pub const ENVELOPE_KEYS: [&str; 3] = ["devices", "data", "items"];

/// Extract the device list from a response body.
///
/// Anything that does not resolve to an array yields an empty list. Entries
/// that do not parse as a [`Device`] are skipped.
pub fn normalize_devices(body: Value) -> Vec<Device> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut map) => {
            let Some(value) = ENVELOPE_KEYS
                .iter()
                .find_map(|key| map.remove(*key))
            else {
                tracing::debug!("Device response has no known envelope key");
                return Vec::new();
            };
            match value {
                Value::Array(entries) => entries,
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<Device>(entry) {
                Ok(device) => Some(device),
                Err(e) => {
                    tracing::warn!("Skipping device entry {index}: {e}");
                    None
                }
            }
        })
        .collect()
}
