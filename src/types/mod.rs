//! Core types for the telemetry decode pipeline.
//!
//! The pipeline moves exactly one unit per stage:
//! - a raw chunk ([`crate::source::RawChunk`]) arrives from the transport
//!   with no boundary relationship to any record,
//! - the assembler turns chunks into [`Frame`]s,
//! - the decoder turns each frame into a [`TelemetrySnapshot`] or a decode
//!   failure, both delivered in order as [`TelemetryEvent`]s.
//!
//! Snapshots and events are serde-serializable so an application shell can
//! forward them to its display layer verbatim.

mod event;
mod frame;
mod snapshot;
mod update_rate;

pub use event::TelemetryEvent;
pub use frame::Frame;
pub use snapshot::{FIELD_SENTINEL, SIGNAL_SENTINEL, TelemetrySnapshot};
pub use update_rate::UpdateRate;
