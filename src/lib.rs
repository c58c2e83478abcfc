//! Runtime configuration for the EPEver solar charge controller monitor.
//!
//! The device settings live in a gitignored `secrets.yaml` (see
//! `secrets.template.yaml`) and are loaded once into an immutable
//! [`DeviceConfig`] shared behind an `Arc`.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod consts;
pub mod errors;
pub mod mqtt_connection;
pub mod mqtt_poll;

pub use config::DeviceConfig;
pub use errors::{ConfigError, SessionError};
