//! Display pacing for snapshot streams

use serde::{Deserialize, Serialize};

/// Pacing for a snapshot stream handed to a display.
///
/// A map view repainting at a handful of Hz has no use for every record a
/// fast link produces; `Max` caps delivery with latest-wins semantics. The
/// full event stream is never paced - this only applies to
/// [`crate::TelemetryConnection::snapshots`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Every successfully decoded snapshot, as fast as the link produces them.
    Native,

    /// At most this many snapshots per second; intermediate snapshots are
    /// superseded by the latest.
    Max(u32),
}

impl UpdateRate {
    /// Throttle interval, if this rate caps delivery at all.
    ///
    /// `Max(0)` is treated as `Native` rather than a divide-by-zero.
    pub fn throttle_interval(self) -> Option<std::time::Duration> {
        match self {
            UpdateRate::Native | UpdateRate::Max(0) => None,
            UpdateRate::Max(hz) => Some(std::time::Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn native_is_unpaced() {
        assert_eq!(UpdateRate::Native.throttle_interval(), None);
    }

    #[test]
    fn zero_hz_degrades_to_native() {
        assert_eq!(UpdateRate::Max(0).throttle_interval(), None);
    }

    #[test]
    fn capped_rate_interval() {
        assert_eq!(UpdateRate::Max(5).throttle_interval(), Some(Duration::from_millis(200)));
    }
}
