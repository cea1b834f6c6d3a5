//! # Error Module
//!
//! This module provides custom error types for the `serial_push` application.
//! It uses the `thiserror` crate for ergonomic error handling.

use thiserror::Error;

/// Result type alias for `serial_push` operations.
pub type Result<T> = std::result::Result<T, SerialPushError>;

/// Main error type for the `serial_push` application.
#[derive(Debug, Error)]
pub enum SerialPushError {
    /// Outbound command could not be delivered to the host, or the host failed it.
    #[error("Command dispatch failed: {0}")]
    CommandDispatch(String),

    /// Event channel could not be established.
    #[error("Subscription failed: {0}")]
    Subscription(String),

    /// No handler is registered under the requested command name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A command was invoked without a required string argument.
    #[error("Command '{command}' is missing string argument '{argument}'")]
    MissingArgument { command: String, argument: String },

    /// Failed to open serial port.
    #[error("Failed to open serial port '{port_name}': {reason}")]
    PortOpen { port_name: String, reason: String },

    /// Failed to read from serial port.
    #[error("Failed to read from serial port: {0}")]
    PortRead(String),

    /// Failed to write to serial port.
    #[error("Failed to write to serial port: {0}")]
    PortWrite(String),

    /// Channel communication error.
    #[error("Channel communication error: {0}")]
    Channel(String),

    /// Data encoding/decoding error.
    #[error("Data encoding error: {0}")]
    Encoding(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIo(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SerialPushError {
    /// Creates a new command dispatch error.
    #[must_use]
    pub fn command_dispatch(msg: impl Into<String>) -> Self {
        Self::CommandDispatch(msg.into())
    }

    /// Creates a new subscription error.
    #[must_use]
    pub fn subscription(msg: impl Into<String>) -> Self {
        Self::Subscription(msg.into())
    }

    /// Creates a new missing argument error.
    #[must_use]
    pub fn missing_argument(command: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            command: command.into(),
            argument: argument.into(),
        }
    }

    /// Creates a new port open error.
    #[must_use]
    pub fn port_open(port_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortOpen {
            port_name: port_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new channel error.
    #[must_use]
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Creates a new encoding error.
    #[must_use]
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_dispatch_error() {
        let error = SerialPushError::command_dispatch("host is gone");
        assert!(error.to_string().contains("host is gone"));
    }

    #[test]
    fn test_subscription_error() {
        let error = SerialPushError::subscription("bus closed");
        assert!(error.to_string().contains("bus closed"));
    }

    #[test]
    fn test_missing_argument_error() {
        let error = SerialPushError::missing_argument("send_p", "message");
        let msg = error.to_string();
        assert!(msg.contains("send_p"));
        assert!(msg.contains("message"));
    }

    #[test]
    fn test_port_open_error() {
        let error = SerialPushError::port_open("/dev/ttyUSB0", "Permission denied");
        let msg = error.to_string();
        assert!(msg.contains("/dev/ttyUSB0"));
        assert!(msg.contains("Permission denied"));
    }

    #[test]
    fn test_channel_error() {
        let error = SerialPushError::channel("Receiver dropped");
        assert!(error.to_string().contains("Receiver dropped"));
    }

    #[test]
    fn test_encoding_error() {
        let error = SerialPushError::encoding("Invalid String");
        assert!(error.to_string().contains("Invalid String"));
    }
}
