//! # Bridge Module
//!
//! The seam between the view and the host process. The view never owns the
//! transport: it is handed an `Arc<dyn HostBridge>` and talks through two
//! calls only, [`HostBridge::dispatch`] for outbound commands and
//! [`HostBridge::subscribe`] for inbound named events.
//!
//! - [`bus`]: named event bus with RAII subscription guards
//! - [`local`]: in-process bridge backed by the bus and a command queue

pub mod bus;
pub mod local;

use crate::error::Result;
use serde_json::{Map, Value};

pub use bus::{EventBus, Subscription};
pub use local::{CommandRequest, LocalBridge, PendingCommand};

/// Command that pushes text towards the serial port.
pub const SEND_COMMAND: &str = "send_p";

/// Name of the single argument of [`SEND_COMMAND`].
pub const MESSAGE_ARG: &str = "message";

/// Command that only logs its invocation.
pub const SIMPLE_COMMAND: &str = "simple_command";

/// Event channel carrying lines read from the serial port.
pub const SERIAL_RECEIVER: &str = "serial_receiver";

/// Event payload. Opaque to the view beyond its text rendering.
pub type Payload = Value;

/// Callback invoked by the bus for every event on a channel.
pub type EventHandler = Box<dyn FnMut(&Payload) + Send>;

/// Host capabilities the view depends on.
#[cfg_attr(test, mockall::automock)]
pub trait HostBridge: Send + Sync {
    /// Queues a named command on the host. Returns once the command has been
    /// handed over; the returned handle reports the host's verdict later.
    fn dispatch(&self, name: &str, args: CommandArgs) -> Result<PendingCommand>;

    /// Registers `handler` on `channel` until the returned guard is dropped.
    fn subscribe(&self, channel: &str, handler: EventHandler) -> Result<Subscription>;
}

/// Named arguments of a command invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandArgs(Map<String, Value>);

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a named argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String argument, `None` when absent or not a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders a payload the way a template string would.
///
/// Strings are taken verbatim, scalars print their literal, arrays join
/// their elements with `,` (null elements render empty) and objects collapse
/// to `[object Object]`.
///
/// # Examples
///
/// ```
/// use serial_push::bridge::payload_text;
/// use serde_json::json;
///
/// assert_eq!(payload_text(&json!("OK")), "OK");
/// assert_eq!(payload_text(&json!(42)), "42");
/// assert_eq!(payload_text(&json!([1, null, "a"])), "1,,a");
/// ```
#[must_use]
pub fn payload_text(payload: &Payload) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // Integral floats print without the fraction, like `1.0` -> `1`.
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.is_finite() => {
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{f:.0}")
                }
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => payload_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_args_with() {
        let args = CommandArgs::new().with(MESSAGE_ARG, "42");
        assert_eq!(args.len(), 1);
        assert_eq!(args.get_str(MESSAGE_ARG), Some("42"));
    }

    #[test]
    fn test_command_args_non_string() {
        let args = CommandArgs::new().with("count", 3);
        assert_eq!(args.get_str("count"), None);
        assert_eq!(args.get("count"), Some(&json!(3)));
        assert!(CommandArgs::new().is_empty());
    }

    #[test]
    fn test_payload_text_string_is_verbatim() {
        assert_eq!(payload_text(&json!("line\n")), "line\n");
        assert_eq!(payload_text(&json!("")), "");
    }

    #[test]
    fn test_payload_text_scalars() {
        assert_eq!(payload_text(&json!(null)), "null");
        assert_eq!(payload_text(&json!(true)), "true");
        assert_eq!(payload_text(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_payload_text_integral_float() {
        assert_eq!(payload_text(&json!(1.0)), "1");
        assert_eq!(payload_text(&json!(-0.0)), "0");
        assert_eq!(payload_text(&json!(-3.0)), "-3");
        assert_eq!(payload_text(&json!(1e20)), "100000000000000000000");
        assert_eq!(payload_text(&json!(2.25)), "2.25");
        assert_eq!(payload_text(&json!(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn test_payload_text_nested() {
        assert_eq!(payload_text(&json!([[1, 2], 3])), "1,2,3");
        assert_eq!(payload_text(&json!({"a": 1})), "[object Object]");
    }
}
