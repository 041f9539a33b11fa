//! Consumer-facing telemetry connection.
//!
//! A connection wires an opened [`ByteSource`] to the reader task and hands
//! the consumer three things: the ordered event stream (snapshots and
//! non-fatal decode failures), the heartbeat watch, and the lifecycle state
//! watch. One connection per physical connection attempt; a terminated
//! connection is never restarted - construct a new one.


use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::{ReceiverStream, WatchStream};
use tokio_util::sync::CancellationToken;
use tracing::debug;
#[cfg(feature = "serial")]
use tracing::info;

use crate::driver::Driver;
use crate::error::{Result, TelemetryError};
use crate::lifecycle::{ConnectionState, Lifecycle};
use crate::source::ByteSource;
#[cfg(feature = "serial")]
use crate::source::SerialConfig;
use crate::sources::ReplaySource;
#[cfg(feature = "serial")]
use crate::sources::SerialSource;
use crate::stream::PaceExt;
use crate::types::{TelemetryEvent, TelemetrySnapshot, UpdateRate};

/// Live handle to one telemetry connection.
///
/// The event stream is lazy and finite: it suspends while awaiting the next
/// chunk and terminates when the transport reports end-of-stream, fails, or
/// the connection is closed. It is also single-consumption - events arrive
/// in order over one queue, so a second call to [`events`](Self::events) or
/// [`snapshots`](Self::snapshots) returns
/// [`TelemetryError::StreamConsumed`].
#[derive(Debug)]
pub struct TelemetryConnection {
    /// Event receiver, taken by the first stream accessor
    events: Option<mpsc::Receiver<TelemetryEvent>>,

    /// Heartbeat watch receiver
    heartbeat: watch::Receiver<bool>,

    /// Lifecycle state watch receiver
    state: watch::Receiver<ConnectionState>,

    /// Cancellation token for stopping the reader task
    cancel: CancellationToken,
}

impl TelemetryConnection {
    /// Open a physical serial link and start streaming from it.
    ///
    /// Walks the lifecycle through `Requesting` and `Open`; on an open
    /// failure the lifecycle records `Failed` and the error is returned to
    /// the caller. No automatic retry - reconnect policy belongs to the
    /// caller.
    #[cfg(feature = "serial")]
    pub async fn open_serial(config: SerialConfig) -> Result<Self> {
        info!(path = %config.path, "requesting serial telemetry connection");

        let (mut lifecycle, state_rx) = Lifecycle::new();
        lifecycle.transition(ConnectionState::Requesting)?;

        // Opening the device is blocking; keep it off the async runtime.
        let opened = match tokio::task::spawn_blocking(move || SerialSource::open(&config)).await {
            Ok(result) => result,
            Err(join) => Err(TelemetryError::open_failed(format!("open task failed: {join}"))),
        };

        match opened {
            Ok(source) => {
                lifecycle.transition(ConnectionState::Open)?;
                Ok(Self::spawn(source, lifecycle, state_rx))
            }
            Err(err) => {
                let _ = lifecycle.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Open a recorded byte log and stream it through the full pipeline.
    pub async fn replay<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let (mut lifecycle, state_rx) = Lifecycle::new();
        lifecycle.transition(ConnectionState::Requesting)?;

        match ReplaySource::open(path).await {
            Ok(source) => {
                lifecycle.transition(ConnectionState::Open)?;
                Ok(Self::spawn(source, lifecycle, state_rx))
            }
            Err(err) => {
                let _ = lifecycle.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Wire an already-opened custom byte source into a connection.
    ///
    /// The source is treated as opened by the caller; the lifecycle walks
    /// straight to `Open` and the reader starts immediately.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: ByteSource,
    {
        let (mut lifecycle, state_rx) = Lifecycle::new();
        lifecycle.transition(ConnectionState::Requesting)?;
        lifecycle.transition(ConnectionState::Open)?;
        Ok(Self::spawn(source, lifecycle, state_rx))
    }

    fn spawn<S>(source: S, lifecycle: Lifecycle, state: watch::Receiver<ConnectionState>) -> Self
    where
        S: ByteSource,
    {
        let channels = Driver::spawn(source, lifecycle);
        Self {
            events: Some(channels.events),
            heartbeat: channels.heartbeat,
            state,
            cancel: channels.cancel,
        }
    }

    /// Take the ordered event stream: every decoded snapshot and every
    /// non-fatal decode failure, in arrival order.
    pub fn events(&mut self) -> Result<ReceiverStream<TelemetryEvent>> {
        let rx = self.events.take().ok_or(TelemetryError::StreamConsumed)?;
        Ok(ReceiverStream::new(rx))
    }

    /// Take the snapshot stream: successful decodes only, optionally paced
    /// for a display consumer.
    ///
    /// `UpdateRate::Native` delivers every snapshot; `UpdateRate::Max(hz)`
    /// applies latest-wins pacing. Decode failures are dropped here - use
    /// [`events`](Self::events) to observe them.
    pub fn snapshots(
        &mut self,
        rate: UpdateRate,
    ) -> Result<BoxStream<'static, TelemetrySnapshot>> {
        let rx = self.events.take().ok_or(TelemetryError::StreamConsumed)?;
        let snapshots =
            ReceiverStream::new(rx).filter_map(|event| async move { event.into_snapshot() });

        Ok(match rate.throttle_interval() {
            None => snapshots.boxed(),
            Some(period) => snapshots.paced(period).boxed(),
        })
    }

    /// Liveness watch: polarity flips once per successfully decoded frame.
    ///
    /// A heartbeat unchanged for longer than the consumer's staleness
    /// budget means the link is silent or producing garbage; interpreting
    /// the duration is the consumer's job.
    pub fn heartbeat(&self) -> watch::Receiver<bool> {
        self.heartbeat.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Lifecycle transitions as a stream.
    ///
    /// Yields the current state immediately, then every subsequent
    /// transition as it happens.
    pub fn state_changes(&self) -> WatchStream<ConnectionState> {
        WatchStream::new(self.state.clone())
    }

    /// Close the connection: stop issuing reads and release the byte
    /// source. Idempotent - closing twice has the same observable effect as
    /// closing once.
    ///
    /// A read already in flight is allowed to complete on its own; its
    /// result is discarded rather than fed to the assembler.
    pub fn close(&self) {
        debug!("closing telemetry connection");
        self.cancel.cancel();
    }
}

impl Drop for TelemetryConnection {
    fn drop(&mut self) {
        debug!("dropping telemetry connection");
        // Cancel the reader on drop so the source is always released.
        self.cancel.cancel();
    }
}
