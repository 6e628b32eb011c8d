//! Line-delimited stdio transport.
//!
//! Each request runs on its own task so a slow tool does not hold up the
//! rest. A single writer task serializes responses in completion order.

use super::dispatch::McpServer;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

/// Errors that end the transport loop.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading or writing the stream failed.
    #[error("stdio transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The writer task stopped unexpectedly.
    #[error("response writer task failed: {0}")]
    Writer(#[from] JoinError),
}

/// Serves requests from `reader` and writes responses to `writer` until the
/// input ends and every in-flight request has been answered.
///
/// Requests already accepted are still answered when reading fails.
///
/// # Errors
///
/// Returns [`TransportError`] when the streams fail.
pub async fn serve<C, R, W>(
    server: Arc<McpServer<C>>,
    reader: R,
    writer: W,
) -> Result<(), TransportError>
where
    C: Clock + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(write_responses(receiver, writer));
    let mut in_flight = JoinSet::new();

    let read_outcome = read_requests(&server, reader, &sender, &mut in_flight).await;
    if let Err(err) = &read_outcome {
        error!(error = %err, "failed to read from input");
    }

    debug!(pending = in_flight.len(), "input closed, draining in-flight requests");
    while let Some(finished) = in_flight.join_next().await {
        log_task_outcome(finished);
    }
    drop(sender);
    writer_task.await??;
    read_outcome?;
    info!("stdio transport finished");
    Ok(())
}

async fn read_requests<C, R>(
    server: &Arc<McpServer<C>>,
    mut reader: R,
    sender: &mpsc::UnboundedSender<String>,
    in_flight: &mut JoinSet<()>,
) -> std::io::Result<()>
where
    C: Clock + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }
        while let Some(finished) = in_flight.try_join_next() {
            log_task_outcome(finished);
        }
        if line.trim_ascii().is_empty() {
            continue;
        }
        let task_server = Arc::clone(server);
        let task_sender = sender.clone();
        in_flight.spawn(async move {
            let Some(response) = task_server.handle_bytes(&line).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(encoded) => {
                    if task_sender.send(encoded).is_err() {
                        error!("response writer closed before response was sent");
                    }
                }
                Err(err) => error!(error = %err, "failed to encode response"),
            }
        });
    }
}

/// Serves over the process's stdin and stdout.
///
/// # Errors
///
/// Returns [`TransportError`] when the standard streams fail.
pub async fn serve_stdio<C>(server: Arc<McpServer<C>>) -> Result<(), TransportError>
where
    C: Clock + Send + Sync + 'static,
{
    serve(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

async fn write_responses<W>(
    mut receiver: mpsc::UnboundedReceiver<String>,
    mut writer: W,
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(encoded) = receiver.recv().await {
        writer.write_all(encoded.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

fn log_task_outcome(outcome: Result<(), JoinError>) {
    if let Err(err) = outcome {
        error!(error = %err, "request task failed");
    }
}
