//! # Console Front End
//!
//! Drives the same [`MainView`] from a terminal: each stdin line is typed
//! into the draft and pushed, each newly received line is printed.

use crate::error::Result;
use crate::view::MainView;
use log::{error, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Duration, interval};

/// How often the view is pumped while waiting for input.
const REFRESH: Duration = Duration::from_millis(50);

/// Runs until `input` reaches EOF. The view is unmounted on return.
pub async fn run_console<R, W>(view: &mut MainView, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    view.mount()?;
    info!("console ready, type a line and press enter to push it");

    let mut lines = input.lines();
    let mut refresh = interval(REFRESH);
    let mut shown_received = String::new();
    let mut shown_error: Option<String> = None;

    let result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    view.on_draft_change(line);
                    if let Err(e) = view.on_submit() {
                        error!("{e}");
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e.into()),
            },
            _ = refresh.tick() => {
                view.pump();
                if view.last_received() != shown_received {
                    shown_received = view.last_received().to_string();
                    output.write_all(format!("{}\n", shown_received.trim_end()).as_bytes()).await?;
                    output.flush().await?;
                }
                let error = view.last_error().map(str::to_string);
                if error != shown_error {
                    if let Some(e) = &error {
                        output.write_all(format!("error: {e}\n").as_bytes()).await?;
                        output.flush().await?;
                    }
                    shown_error = error;
                }
            }
        }
    };

    // Show anything that arrived together with EOF.
    view.pump();
    if view.last_received() != shown_received {
        output
            .write_all(format!("{}\n", view.last_received().trim_end()).as_bytes())
            .await?;
        output.flush().await?;
    }
    view.unmount();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{EventBus, LocalBridge, SERIAL_RECEIVER};
    use crate::host::{default_registry, run_dispatcher};
    use crate::serial::TxQueue;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_lines_are_pushed() {
        let bus = EventBus::new();
        let queue = TxQueue::new();
        let (bridge, requests) = LocalBridge::new(Arc::clone(&bus));
        tokio::spawn(run_dispatcher(default_registry(queue.clone()), requests));
        let mut view = MainView::new(Arc::new(bridge));

        let input = BufReader::new(&b"42\nhello\n"[..]);
        let mut output = Vec::new();
        run_console(&mut view, input, &mut output).await.unwrap();

        for _ in 0..100 {
            if queue.len().await == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(queue.drain().await, vec!["42", "hello"]);
        assert!(!view.is_mounted());
        assert_eq!(bus.listener_count(SERIAL_RECEIVER), 0);
    }

    #[tokio::test]
    async fn test_received_line_is_printed() {
        let bus = EventBus::new();
        let (bridge, _requests) = LocalBridge::new(Arc::clone(&bus));
        let mut view = MainView::new(Arc::new(bridge));

        // Deliver an event as soon as the view is listening.
        let emitter = {
            let bus = Arc::clone(&bus);
            tokio::spawn(async move {
                while bus.listener_count(SERIAL_RECEIVER) == 0 {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
                bus.emit(SERIAL_RECEIVER, &json!("OK\r\n")).unwrap();
            })
        };

        let (mut writer, reader) = tokio::io::duplex(64);
        let mut output = Vec::new();
        let console = run_console(&mut view, BufReader::new(reader), &mut output);
        let closer = async {
            emitter.await.unwrap();
            tokio::time::sleep(REFRESH * 3).await;
            writer.shutdown().await.unwrap();
        };
        let (result, ()) = tokio::join!(console, closer);
        result.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "receive: OK\n");
    }
}
