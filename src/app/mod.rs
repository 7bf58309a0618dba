//! Application layer: the sensor action app and the port boundary.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping the file system, the action engine and the sensor
//! task fully testable without real peripherals or a radio.

pub mod events;
pub mod ports;
pub mod service;
