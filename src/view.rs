//! # Main View
//!
//! Headless state of the single screen: the draft text bound to the input
//! field, the last received line, and the one subscription to
//! [`SERIAL_RECEIVER`] held while the view is mounted. Rendering lives in
//! [`crate::serial_ui`]; this type only knows the bridge.

use crate::bridge::{
    CommandArgs, EventHandler, HostBridge, MESSAGE_ARG, Payload, PendingCommand, SEND_COMMAND,
    SERIAL_RECEIVER, Subscription, payload_text,
};
use crate::error::Result;
use log::{debug, error};
use std::sync::{Arc, Mutex};

/// Prefix of the rendered inbound payload.
pub const RECEIVE_PREFIX: &str = "receive: ";

/// Newest payload delivered by the bus, waiting for the next
/// [`MainView::pump`]. Older ones are overwritten.
type Inbox = Arc<Mutex<Option<Payload>>>;

pub struct MainView {
    bridge: Arc<dyn HostBridge>,
    draft_text: String,
    last_received: String,
    last_error: Option<String>,
    inbox: Inbox,
    subscription: Option<Subscription>,
    pending: Vec<PendingCommand>,
}

impl MainView {
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self {
            bridge,
            draft_text: String::new(),
            last_received: String::new(),
            last_error: None,
            inbox: Arc::default(),
            subscription: None,
            pending: Vec::new(),
        }
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn last_received(&self) -> &str {
        &self.last_received
    }

    /// Most recent dispatch or subscription failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Commands whose outcome has not been seen yet.
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Subscribes to [`SERIAL_RECEIVER`]. Does nothing when already mounted,
    /// so calling it every frame never stacks handlers.
    pub fn mount(&mut self) -> Result<()> {
        if self.is_mounted() {
            return Ok(());
        }
        let inbox = Arc::clone(&self.inbox);
        let handler: EventHandler = Box::new(move |payload: &Payload| {
            if let Ok(mut inbox) = inbox.lock() {
                *inbox = Some(payload.clone());
            }
        });
        match self.bridge.subscribe(SERIAL_RECEIVER, handler) {
            Ok(subscription) => {
                debug!("main view mounted");
                self.subscription = Some(subscription);
                Ok(())
            }
            Err(e) => {
                error!("{e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Releases the subscription and forgets in-flight commands.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!("main view unmounted");
        }
        self.pending.clear();
        if let Ok(mut inbox) = self.inbox.lock() {
            *inbox = None;
        }
    }

    /// Controlled input: the field shows exactly this text.
    pub fn on_draft_change(&mut self, new_text: impl Into<String>) {
        self.draft_text = new_text.into();
    }

    /// Sends the current draft as `send_p { message }`. The draft is kept.
    pub fn on_submit(&mut self) -> Result<()> {
        let args = CommandArgs::new().with(MESSAGE_ARG, self.draft_text.clone());
        match self.bridge.dispatch(SEND_COMMAND, args) {
            Ok(pending) => {
                self.last_error = None;
                self.pending.push(pending);
                Ok(())
            }
            Err(e) => {
                error!("{e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Replaces the displayed line with the rendering of `payload`.
    pub fn on_event(&mut self, payload: &Payload) {
        self.last_received = format!("{RECEIVE_PREFIX}{}", payload_text(payload));
    }

    /// Applies the newest received event and collects finished commands.
    /// Returns whether anything visible changed.
    pub fn pump(&mut self) -> bool {
        let latest = self.inbox.lock().ok().and_then(|mut inbox| inbox.take());
        let mut changed = latest.is_some();
        if let Some(payload) = &latest {
            self.on_event(payload);
        }

        let mut failures = Vec::new();
        self.pending.retain_mut(|pending| match pending.try_complete() {
            None => true,
            Some(Ok(())) => false,
            Some(Err(e)) => {
                failures.push(e);
                false
            }
        });
        if let Some(e) = failures.pop() {
            error!("{e}");
            self.last_error = Some(e.to_string());
            changed = true;
        }
        changed
    }
}
