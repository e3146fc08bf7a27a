pub mod use_devices;

pub use use_devices::{DevicesHookReturn, use_devices};
