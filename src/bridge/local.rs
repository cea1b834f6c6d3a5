//! In-process host bridge: commands travel over an unbounded channel to the
//! dispatcher task, events come back through the shared [`EventBus`].

use super::{CommandArgs, EventBus, EventHandler, HostBridge, Subscription};
use crate::error::{Result, SerialPushError};
use log::debug;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Command invocation on its way to the dispatcher.
#[derive(Debug)]
pub struct CommandRequest {
    pub name: String,
    pub args: CommandArgs,
    pub reply: oneshot::Sender<Result<()>>,
}

/// Completion handle of a dispatched command.
///
/// Dropping it cancels interest in the result; the host still runs the
/// command.
#[derive(Debug)]
pub struct PendingCommand {
    name: String,
    reply: oneshot::Receiver<Result<()>>,
}

impl PendingCommand {
    pub fn new(name: impl Into<String>, reply: oneshot::Receiver<Result<()>>) -> Self {
        Self {
            name: name.into(),
            reply,
        }
    }

    /// Handle that is already resolved with `result`.
    pub fn ready(name: impl Into<String>, result: Result<()>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self::new(name, rx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-blocking check. `None` while the host is still working on it.
    pub fn try_complete(&mut self) -> Option<Result<()>> {
        match self.reply.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(
                SerialPushError::command_dispatch(format!("host dropped '{}'", self.name)),
            )),
        }
    }
}

/// Bridge living in the same process as the host tasks.
#[derive(Clone)]
pub struct LocalBridge {
    bus: Arc<EventBus>,
    commands: mpsc::UnboundedSender<CommandRequest>,
}

impl LocalBridge {
    /// Creates the bridge and the request stream the dispatcher consumes.
    pub fn new(bus: Arc<EventBus>) -> (Self, mpsc::UnboundedReceiver<CommandRequest>) {
        let (commands, requests) = mpsc::unbounded_channel();
        (Self { bus, commands }, requests)
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

impl HostBridge for LocalBridge {
    fn dispatch(&self, name: &str, args: CommandArgs) -> Result<PendingCommand> {
        let (reply, completion) = oneshot::channel();
        self.commands
            .send(CommandRequest {
                name: name.to_string(),
                args,
                reply,
            })
            .map_err(|_| SerialPushError::command_dispatch(format!("host is not running, '{name}' not sent")))?;
        debug!("dispatched '{name}'");
        Ok(PendingCommand::new(name, completion))
    }

    fn subscribe(&self, channel: &str, handler: EventHandler) -> Result<Subscription> {
        self.bus.listen(channel, handler)
    }
}
