//! Per-frame outcome events delivered to the consumer

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::types::TelemetrySnapshot;

/// Per-frame outcome delivered in stream order.
///
/// A decode failure is a distinguishable, non-fatal event: the stream
/// continues past it and the heartbeat does not flip. Consumers rendering a
/// live display typically map `DecodeFailed` to a transient visual cue and
/// nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    /// A frame decoded successfully.
    Snapshot(TelemetrySnapshot),

    /// A frame failed structural parsing and was discarded.
    DecodeFailed(DecodeError),
}

impl TelemetryEvent {
    /// The snapshot, if this event is a successful decode.
    pub fn into_snapshot(self) -> Option<TelemetrySnapshot> {
        match self {
            TelemetryEvent::Snapshot(snapshot) => Some(snapshot),
            TelemetryEvent::DecodeFailed(_) => None,
        }
    }

    /// Whether this event is a successful decode.
    pub fn is_snapshot(&self) -> bool {
        matches!(self, TelemetryEvent::Snapshot(_))
    }
}
