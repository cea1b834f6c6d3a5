//! # Serial Module
//!
//! Host side of the serial link:
//!
//! - [`port`]: port settings and opening
//! - [`codec`]: newline framing
//! - [`TxQueue`]: text waiting to be written, filled by the `send_p` command
//! - [`run_writer`] / [`run_reader`]: the two tasks driving the port

pub mod codec;
pub mod port;

use crate::bridge::{EventBus, Payload, SERIAL_RECEIVER};
use crate::error::{Result, SerialPushError};
use codec::LineCodec;
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{error, info, warn};
use port::SerialStream;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tokio_util::codec::Decoder;

/// Outbound messages shared between the command handler and the writer.
#[derive(Clone, Debug, Default)]
pub struct TxQueue(Arc<RwLock<Vec<String>>>);

impl TxQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, message: String) {
        self.0.write().await.push(message);
    }

    /// Takes everything queued so far, oldest first.
    pub async fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.write().await)
    }

    pub async fn len(&self) -> usize {
        self.0.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.0.read().await.is_empty()
    }
}

/// Pacing of the writer task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterTiming {
    /// Wait before the first write, letting the device settle after open.
    pub startup_delay: Duration,
    /// Interval between queue checks.
    pub poll_interval: Duration,
}

impl Default for WriterTiming {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Writes every queued message once. Messages that fail go back on the queue
/// for the next round. Returns how many were written.
pub async fn write_pending<S>(sink: &mut S, queue: &TxQueue) -> usize
where
    S: Sink<String, Error = SerialPushError> + Unpin,
{
    let mut written = 0;
    for message in queue.drain().await {
        match sink.send(message.clone()).await {
            Ok(()) => {
                info!("send: {message}");
                written += 1;
            }
            Err(err) => {
                error!("{err}");
                queue.push(message).await;
            }
        }
    }
    written
}

/// Writer loop. Runs until the task is aborted.
pub async fn run_writer<S>(mut sink: S, queue: TxQueue, timing: WriterTiming)
where
    S: Sink<String, Error = SerialPushError> + Unpin,
{
    sleep(timing.startup_delay).await;
    loop {
        sleep(timing.poll_interval).await;
        if queue.is_empty().await {
            continue;
        }
        write_pending(&mut sink, &queue).await;
    }
}

/// Reader loop. Emits each received line on [`SERIAL_RECEIVER`] until the
/// stream ends or fails.
pub async fn run_reader<S>(mut lines: S, bus: Arc<EventBus>) -> Result<()>
where
    S: Stream<Item = Result<String>> + Unpin,
{
    while let Some(line) = lines.next().await {
        let line = line.map_err(|e| match e {
            SerialPushError::FileIo(io) => SerialPushError::PortRead(io.to_string()),
            other => other,
        })?;
        info!("receive: {}", line.trim_end());
        let listeners = bus.emit(SERIAL_RECEIVER, &Payload::String(line))?;
        if listeners == 0 {
            warn!("no listener on '{SERIAL_RECEIVER}', line dropped");
        }
    }
    info!("serial stream closed");
    Ok(())
}

/// Handles of the two port tasks.
pub struct SerialTasks {
    pub writer: JoinHandle<()>,
    pub reader: JoinHandle<()>,
}

impl SerialTasks {
    pub fn abort(&self) {
        self.writer.abort();
        self.reader.abort();
    }
}

/// Splits the opened port into framed halves and spawns writer and reader.
/// Must be called from within a Tokio runtime context.
pub fn spawn_serial_host(
    port: SerialStream,
    queue: TxQueue,
    bus: Arc<EventBus>,
    timing: WriterTiming,
) -> SerialTasks {
    let (sink, lines) = LineCodec.framed(port).split();
    let writer = tokio::spawn(run_writer(sink, queue, timing));
    let reader = tokio::spawn(async move {
        if let Err(e) = run_reader(lines, bus).await {
            error!("serial reader stopped: {e}");
        }
    });
    SerialTasks { writer, reader }
}
