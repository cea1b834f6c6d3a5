use crate::error::{Result, SerialPushError};
use log::{error, info};
use tokio::time::Duration;
use tokio_serial::SerialPortBuilderExt;
pub use tokio_serial::{DataBits, FlowControl, Parity, SerialStream, StopBits};

/// default serial device
#[cfg(unix)]
pub const DEFAULT_TTY: &str = "/dev/cu.usbmodem11301";
/// default serial device
#[cfg(windows)]
pub const DEFAULT_TTY: &str = "COM1";
/// default serial device
#[cfg(not(any(unix, windows)))]
pub const DEFAULT_TTY: &str = "";

/// default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// serial port baud rate
pub const COMMON_BAUD_RATES: &[u32] = &[
    4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 500000, 576000, 921600, 1000000,
    1500000, 2000000,
];

/// serial port settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
    pub timeout: Duration,
}

impl PortSettings {
    /// 8N1 settings for `port_name` at `baud_rate`
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        PortSettings {
            port_name: port_name.into(),
            baud_rate,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
            timeout: Duration::from_millis(10),
        }
    }

    /// whether the baud rate is one of [`COMMON_BAUD_RATES`]
    pub fn is_common_baud_rate(&self) -> bool {
        COMMON_BAUD_RATES.contains(&self.baud_rate)
    }
}

impl Default for PortSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TTY, DEFAULT_BAUD_RATE)
    }
}

/// open serial port
///
/// Must be called from within a Tokio runtime context. On Unix the port is
/// opened non-exclusive so other tools can share it.
pub fn open_port(settings: &PortSettings) -> Result<SerialStream> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut stream = tokio_serial::new(&settings.port_name, settings.baud_rate)
        .data_bits(settings.data_bits)
        .parity(settings.parity)
        .stop_bits(settings.stop_bits)
        .flow_control(settings.flow_control)
        .timeout(settings.timeout)
        .open_native_async()
        .map_err(|e| {
            error!("Failed to open serial port {}: {}", settings.port_name, e);
            SerialPushError::port_open(&settings.port_name, e.to_string())
        })?;

    #[cfg(unix)]
    stream
        .set_exclusive(false)
        .map_err(|e| SerialPushError::port_open(&settings.port_name, e.to_string()))?;

    info!(
        "Opened serial port {} at {} baud",
        settings.port_name, settings.baud_rate
    );
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PortSettings::default();
        assert_eq!(settings.port_name, DEFAULT_TTY);
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.data_bits, DataBits::Eight);
        assert_eq!(settings.stop_bits, StopBits::One);
        assert_eq!(settings.parity, Parity::None);
        assert_eq!(settings.flow_control, FlowControl::None);
        assert!(settings.is_common_baud_rate());
    }

    #[test]
    fn test_uncommon_baud_rate() {
        assert!(!PortSettings::new("/dev/ttyUSB0", 1234).is_common_baud_rate());
    }

    #[tokio::test]
    async fn test_open_missing_port() {
        let settings = PortSettings::new("/dev/serial_push_does_not_exist", 9600);
        assert!(matches!(
            open_port(&settings),
            Err(SerialPushError::PortOpen { .. })
        ));
    }
}
