//! Driver spawns and manages the telemetry reader task

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::assembler::FrameAssembler;
use crate::decoder::TelemetryDecoder;
use crate::lifecycle::{ConnectionState, Lifecycle};
use crate::source::ByteSource;
use crate::types::TelemetryEvent;

/// Bounded depth of the event queue. The consumer and the link strictly
/// alternate in practice; the bound only matters when the consumer stalls,
/// where it applies backpressure instead of buffering without limit.
const EVENT_QUEUE_DEPTH: usize = 256;

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Receiver for per-frame outcome events, in stream order
    pub events: mpsc::Receiver<TelemetryEvent>,
    /// Liveness signal; polarity flips once per successful decode
    pub heartbeat: watch::Receiver<bool>,
    /// Cancellation token for stopping the reader
    pub cancel: CancellationToken,
}

/// Driver spawns the single reader task for a connection.
///
/// The task owns the byte source, the frame assembler, and the lifecycle:
/// chunk arrival, frame assembly, and decode all happen on this one
/// sequential path, so nothing else ever mutates the assembly buffer or the
/// connection state while the task runs.
pub struct Driver;

impl Driver {
    /// Spawn the reader task for an opened source.
    ///
    /// The lifecycle must be in `Open`; the task moves it to `Streaming`
    /// before the first read and to a terminal state on every exit path.
    pub fn spawn<S>(source: S, lifecycle: Lifecycle) -> DriverChannels
    where
        S: ByteSource,
    {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (heartbeat_tx, heartbeat_rx) = watch::channel(false);

        let cancel = CancellationToken::new();
        let cancel_reader = cancel.clone();

        tokio::spawn(async move {
            Self::reader_task(source, lifecycle, event_tx, heartbeat_tx, cancel_reader).await;
        });

        DriverChannels { events: event_rx, heartbeat: heartbeat_rx, cancel }
    }

    /// Reader task: one in-flight read at a time, frames decoded in order.
    async fn reader_task<S>(
        mut source: S,
        mut lifecycle: Lifecycle,
        events: mpsc::Sender<TelemetryEvent>,
        heartbeat: watch::Sender<bool>,
        cancel: CancellationToken,
    ) where
        S: ByteSource,
    {
        info!("telemetry reader task started");

        // The first read is about to be issued.
        if let Err(err) = lifecycle.transition(ConnectionState::Streaming) {
            error!(%err, "reader spawned against a lifecycle that is not Open");
            return;
        }

        let mut assembler = FrameAssembler::new();
        let mut snapshot_count = 0u64;
        let mut rejected_count = 0u64;

        'read: loop {
            // Cancellation drops the in-flight read; its result is discarded
            // rather than fed to the assembler.
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("reader cancelled");
                    let _ = lifecycle.close();
                    break 'read;
                }
                result = source.next_chunk() => result,
            };

            match result {
                Ok(Some(chunk)) => {
                    trace!(len = chunk.len(), "chunk received");

                    for frame in assembler.feed(&chunk) {
                        let event = match TelemetryDecoder::decode(&frame) {
                            Ok(snapshot) => {
                                snapshot_count += 1;
                                // Liveness flip on success only; failures
                                // leave the heartbeat unchanged so staleness
                                // stays visible.
                                heartbeat.send_modify(|beat| *beat = !*beat);
                                TelemetryEvent::Snapshot(snapshot)
                            }
                            Err(err) => {
                                rejected_count += 1;
                                warn!(%err, frame = %frame.text(), "frame rejected");
                                TelemetryEvent::DecodeFailed(err)
                            }
                        };

                        if events.send(event).await.is_err() {
                            debug!("event receiver dropped, shutting down");
                            let _ = lifecycle.close();
                            break 'read;
                        }
                    }
                }
                Ok(None) => {
                    if assembler.pending_len() > 0 {
                        debug!(
                            pending = assembler.pending_len(),
                            "discarding unterminated bytes at end of stream"
                        );
                    }
                    info!("transport reported end of stream");
                    if let Err(err) = lifecycle.transition(ConnectionState::Closed) {
                        error!(%err, "failed to record end of stream");
                    }
                    break 'read;
                }
                Err(err) => {
                    error!(%err, "transport error, ending stream");
                    if let Err(err) = lifecycle.fail(err.to_string()) {
                        error!(%err, "failed to record transport error");
                    }
                    break 'read;
                }
            }
        }

        // Dropping the sender terminates the event stream for the consumer.
        info!(snapshots = snapshot_count, rejected = rejected_count, "telemetry reader task ended");
    }
}
