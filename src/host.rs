//! # Host Module
//!
//! Command side of the host process: a registry of named async handlers and
//! the dispatcher task that runs them for each [`CommandRequest`].

use crate::bridge::{CommandArgs, CommandRequest, MESSAGE_ARG, SEND_COMMAND, SIMPLE_COMMAND};
use crate::error::{Result, SerialPushError};
use crate::serial::TxQueue;
use futures::future::BoxFuture;
use log::{info, warn};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::mpsc;

type CommandFn = Box<dyn Fn(CommandArgs) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Named command handlers.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(CommandArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.handlers
            .insert(name.into(), Box::new(move |args| Box::pin(handler(args))));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub async fn invoke(&self, name: &str, args: CommandArgs) -> Result<()> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| SerialPushError::UnknownCommand(name.to_string()))?;
        handler(args).await
    }
}

/// Registry with the commands the front end uses: `send_p` queues its
/// `message` for the serial writer, `simple_command` only logs.
pub fn default_registry(queue: TxQueue) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(SEND_COMMAND, move |args: CommandArgs| {
        let queue = queue.clone();
        async move {
            let message = args
                .get_str(MESSAGE_ARG)
                .ok_or_else(|| SerialPushError::missing_argument(SEND_COMMAND, MESSAGE_ARG))?
                .to_string();
            queue.push(message).await;
            Ok::<(), SerialPushError>(())
        }
    });
    registry.register(SIMPLE_COMMAND, |_args: CommandArgs| async {
        info!("I was invoked from the front end!");
        Ok::<(), SerialPushError>(())
    });
    registry
}

/// Runs every incoming request to completion, in arrival order, and replies
/// with the handler's result. Returns when all bridges are gone.
pub async fn run_dispatcher(
    registry: CommandRegistry,
    mut requests: mpsc::UnboundedReceiver<CommandRequest>,
) {
    while let Some(CommandRequest { name, args, reply }) = requests.recv().await {
        let result = registry.invoke(&name, args).await;
        if let Err(e) = &result {
            warn!("command '{name}' failed: {e}");
        }
        // The caller may have stopped waiting.
        let _ = reply.send(result);
    }
    info!("command dispatcher stopped");
}
