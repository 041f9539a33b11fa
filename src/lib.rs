//! Streaming frame decoder and connection lifecycle for serial GPS
//! telemetry links.
//!
//! Groundtrack turns the unstructured byte stream of a point-to-point
//! serial link into a clean, ordered sequence of validated telemetry
//! snapshots, plus the liveness signals a live display needs.
//!
//! # Features
//!
//! - **Chunk-tolerant framing**: newline-delimited JSON records reassembled
//!   from byte deliveries of arbitrary size and boundary
//! - **Resynchronization**: a link opened mid-record drops leading garbage
//!   and locks onto the next record start
//! - **Field normalization**: missing or unparseable fields become
//!   sentinels instead of invalidating the record
//! - **Lifecycle + liveness**: validated connection state transitions and a
//!   heartbeat that flips once per successfully decoded record
//! - **Cross-platform replay**: recorded byte logs run the full pipeline
//!   without hardware
//!
//! # Quick Start
//!
//! ## Live link (feature `serial`)
//!
//! ```rust,no_run
//! use groundtrack::{Groundtrack, SerialConfig, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> groundtrack::Result<()> {
//!     let config = SerialConfig::new("/dev/ttyUSB0");
//!     let mut connection = Groundtrack::connect(config).await?;
//!
//!     let mut snapshots = connection.snapshots(UpdateRate::Max(10))?;
//!     while let Some(snapshot) = snapshots.next().await {
//!         println!("{:.5}, {:.5} at {:.1} m", snapshot.latitude, snapshot.longitude, snapshot.altitude);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Replay (cross-platform)
//!
//! ```rust,no_run
//! use groundtrack::{Groundtrack, TelemetryEvent};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> groundtrack::Result<()> {
//!     let mut connection = Groundtrack::replay("flight.log").await?;
//!
//!     let mut events = connection.events()?;
//!     while let Some(event) = events.next().await {
//!         match event {
//!             TelemetryEvent::Snapshot(snapshot) => println!("sats: {}", snapshot.satellite_count),
//!             TelemetryEvent::DecodeFailed(err) => eprintln!("rejected: {}", err),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
pub mod types;

// Decode pipeline
pub mod assembler;
pub mod decoder;
pub mod lifecycle;

// Stream-based connection architecture
pub mod connection;
pub mod driver;
pub mod source;
pub mod sources;
pub mod stream;

// Core exports
pub use error::{DecodeError, Result, TelemetryError};
pub use types::*;

// Pipeline exports
pub use assembler::FrameAssembler;
pub use decoder::TelemetryDecoder;
pub use lifecycle::ConnectionState;

// Connection exports
pub use connection::TelemetryConnection;
pub use source::{ByteSource, DEFAULT_BAUD_RATE, RawChunk, SerialConfig};
pub use sources::ReplaySource;
#[cfg(feature = "serial")]
pub use sources::SerialSource;

/// Unified entry point for telemetry connections.
///
/// This factory provides a consistent API for connecting to a live serial
/// link and for replaying a recorded byte log.
///
/// # Examples
///
/// ## Live link (feature `serial`)
/// ```rust,no_run
/// use groundtrack::{Groundtrack, SerialConfig};
///
/// #[tokio::main]
/// async fn main() -> groundtrack::Result<()> {
///     let connection = Groundtrack::connect(SerialConfig::new("/dev/ttyUSB0")).await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
///
/// ## Replay (cross-platform)
/// ```rust,no_run
/// use groundtrack::Groundtrack;
///
/// #[tokio::main]
/// async fn main() -> groundtrack::Result<()> {
///     let connection = Groundtrack::replay("flight.log").await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
pub struct Groundtrack;

impl Groundtrack {
    /// Connect to a live serial telemetry link.
    ///
    /// Opens the device described by `config` and starts the reader. The
    /// returned connection is already streaming; take
    /// [`events`](TelemetryConnection::events) or
    /// [`snapshots`](TelemetryConnection::snapshots) to consume it.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened (missing, busy, or
    /// permission denied). Open failures are not retried here; reconnect
    /// policy belongs to the caller.
    #[cfg(feature = "serial")]
    pub async fn connect(config: SerialConfig) -> Result<TelemetryConnection> {
        TelemetryConnection::open_serial(config).await
    }

    /// Replay a recorded byte log through the full pipeline.
    ///
    /// The log is delivered in paced chunks, so framing, decoding,
    /// heartbeat, and lifecycle behave exactly as they would on a live
    /// link. Useful for development and post-flight analysis on any
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist or is not readable.
    pub async fn replay<P: AsRef<std::path::Path>>(path: P) -> Result<TelemetryConnection> {
        TelemetryConnection::replay(path).await
    }
}
