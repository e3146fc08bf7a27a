//! Mock inventory data for the device client
//!
//! This module provides realistic test data that can be used across:
//! - Development server (dev-server)
//! - Client integration tests
//!
//! The inventory mixes every availability state, and scripts reservations so
//! that available devices can be reserved while devices on loan or in
//! maintenance are refused with 409.

use crate::MockBackend;
use serde_json::{Value, json};

/// Path prefix the mock API is mounted under.
pub const API_PREFIX: &str = "/api";

pub fn laptop() -> Value {
    json!({
        "id": "lap-001",
        "name": "ThinkPad X1 Carbon",
        "model": "Gen 11",
        "manufacturer": "Lenovo",
        "description": "14 inch, 32GB RAM, docking station included",
        "status": "available",
        "stock": 4,
        "pricePence": 15000
    })
}

pub fn camera() -> Value {
    json!({
        "id": "cam-002",
        "name": "Mirrorless camera kit",
        "model": "Alpha 7 IV",
        "manufacturer": "Sony",
        "status": "on-loan",
        "stock": 0
    })
}

pub fn projector() -> Value {
    json!({
        "id": "proj-003",
        "name": "Portable projector",
        "manufacturer": "Epson",
        "description": "Lamp due for replacement",
        "status": "maintenance"
    })
}

pub fn tablet() -> Value {
    json!({
        "id": "tab-004",
        "name": "Drawing tablet",
        "model": "Intuos Pro",
        "manufacturer": "Wacom",
        "status": "available",
        "stock": 2,
        "pricePence": 4000
    })
}

pub fn sample_devices() -> Vec<Value> {
    vec![laptop(), camera(), projector(), tablet()]
}

/// Script `backend` to serve the sample inventory under `/api/devices`.
pub fn seed_inventory(backend: &MockBackend) {
    let devices = sample_devices();
    backend.respond_json(
        "GET",
        &format!("{API_PREFIX}/devices"),
        200,
        &json!({ "devices": devices }),
    );

    for device in &devices {
        let Some(id) = device["id"].as_str() else {
            continue;
        };
        let path = format!("{API_PREFIX}/devices/{id}/reserve");
        if device["status"] == "available" {
            backend.respond_json(
                "POST",
                &path,
                200,
                &json!({ "id": id, "reserved": true }),
            );
        } else {
            backend.respond(
                "POST",
                &path,
                409,
                format!("Device {id} is not available"),
            );
        }
    }
}
