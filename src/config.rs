//! # Config Module
//!
//! Command line configuration. The first positional argument is the serial
//! device, matching how the tool is usually started (`serial_push /dev/ttyUSB0`).

use crate::error::{Result, SerialPushError};
use crate::serial::WriterTiming;
use crate::serial::port::{COMMON_BAUD_RATES, DEFAULT_BAUD_RATE, DEFAULT_TTY, PortSettings};
use clap::Parser;
use log::warn;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "serial_push", version, about)]
pub struct AppConfig {
    /// Serial device to open.
    #[arg(default_value = DEFAULT_TTY)]
    pub tty: String,

    /// Baud rate of the serial device.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud_rate: u32,

    /// Milliseconds between checks of the outbound queue.
    #[arg(long, default_value_t = 100)]
    pub poll_interval_ms: u64,

    /// Milliseconds to wait after opening the port before the first write.
    #[arg(long, default_value_t = 1000)]
    pub startup_delay_ms: u64,

    /// Log filter, e.g. `info` or `serial_push=debug`.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Run on the terminal instead of opening a window.
    #[arg(long)]
    pub console: bool,
}

impl AppConfig {
    /// Rejects values the host cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tty.trim().is_empty() {
            return Err(SerialPushError::InvalidConfig(
                "no serial device given".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(SerialPushError::InvalidConfig(
                "baud rate must be positive".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(SerialPushError::InvalidConfig(
                "poll interval must be positive".to_string(),
            ));
        }
        if !self.port_settings().is_common_baud_rate() {
            warn!(
                "baud rate {} is not one of {:?}, the device may not support it",
                self.baud_rate, COMMON_BAUD_RATES
            );
        }
        Ok(())
    }

    pub fn port_settings(&self) -> PortSettings {
        PortSettings::new(&self.tty, self.baud_rate)
    }

    pub fn writer_timing(&self) -> WriterTiming {
        WriterTiming {
            startup_delay: Duration::from_millis(self.startup_delay_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
