//! # Serial Push
//!
//! A small desktop front end for a serial device: type a line, push it to the
//! port, and watch the last line the device sent back.
//!
//! ## Architecture
//!
//! The view never touches the port. It reaches the host through an injected
//! [`bridge::HostBridge`], which offers command dispatch and named event
//! subscriptions. In this binary the host runs in-process on a Tokio runtime.
//!
//! - [`view`]: headless state of the single screen
//! - [`serial_ui`]: Bevy + egui rendering of the view
//! - [`console`]: terminal front end driving the same view
//! - [`bridge`]: host bridge trait, event bus, in-process bridge
//! - [`host`]: command registry and dispatcher task
//! - [`serial`]: port opening, line framing, writer and reader tasks
//! - [`config`]: command line configuration
//! - [`error`]: Custom error types for the application

#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod console;
pub mod error;
pub mod host;
pub mod serial;
pub mod serial_ui;
pub mod view;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::bridge::{EventBus, HostBridge, LocalBridge};
    pub use crate::config::AppConfig;
    pub use crate::error::*;
    pub use crate::serial_ui::{MainViewState, SerialUiPlugin};
    pub use crate::view::MainView;
}
