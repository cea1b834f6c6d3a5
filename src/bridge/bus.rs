//! # Event Bus
//!
//! Named channels with any number of listeners. Listeners are kept alive by
//! the [`Subscription`] returned from [`EventBus::listen`]; dropping the guard
//! removes the listener.

use super::{EventHandler, Payload};
use crate::error::{Result, SerialPushError};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Registered listener.
struct Listener {
    id: u64,
    handler: EventHandler,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    channels: HashMap<String, Vec<Listener>>,
}

/// Event bus shared between the host tasks and the bridge.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds `handler` to `channel`.
    ///
    /// Handlers run on the emitting thread while the bus is locked, so they
    /// must not call back into the bus.
    pub fn listen(self: &Arc<Self>, channel: &str, handler: EventHandler) -> Result<Subscription> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| SerialPushError::subscription("event bus lock poisoned"))?;
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .channels
            .entry(channel.to_string())
            .or_default()
            .push(Listener { id, handler });
        debug!("listener {id} added on '{channel}'");

        let bus = Arc::downgrade(self);
        let name = channel.to_string();
        Ok(Subscription::new(channel, move || {
            if let Some(bus) = bus.upgrade() {
                bus.unlisten(&name, id);
            }
        }))
    }

    /// Delivers `payload` to every listener of `channel`, in registration
    /// order. Returns how many listeners saw it.
    pub fn emit(&self, channel: &str, payload: &Payload) -> Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| SerialPushError::channel("event bus lock poisoned"))?;
        let Some(listeners) = inner.channels.get_mut(channel) else {
            return Ok(0);
        };
        for listener in listeners.iter_mut() {
            (listener.handler)(payload);
        }
        Ok(listeners.len())
    }

    /// Number of live listeners on `channel`.
    pub fn listener_count(&self, channel: &str) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.channels.get(channel).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn unlisten(&self, channel: &str, id: u64) {
        let Ok(mut inner) = self.inner.lock() else {
            warn!("event bus lock poisoned, listener {id} on '{channel}' leaked");
            return;
        };
        if let Some(listeners) = inner.channels.get_mut(channel) {
            listeners.retain(|listener| listener.id != id);
            if listeners.is_empty() {
                inner.channels.remove(channel);
            }
        }
        debug!("listener {id} removed from '{channel}'");
    }
}

/// Live registration on an event channel.
///
/// Cancels itself on drop; [`Subscription::unsubscribe`] may be called
/// earlier and is idempotent.
pub struct Subscription {
    channel: String,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wraps an unsubscribe function.
    pub fn new(channel: impl Into<String>, cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            channel: channel.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish()
    }
}
