//! Validated telemetry snapshot produced by the decoder

use serde::{Deserialize, Serialize};

/// Sentinel substituted for any field (except signal strength) that is
/// missing or fails numeric coercion. Real altitudes can be negative but
/// real satellite counts never are, so a full record of `-1`s is visibly
/// out-of-band on a display.
pub const FIELD_SENTINEL: f64 = -1.0;

/// Sentinel for an unknown or invalid signal strength reading. Real RSSI
/// values are negative dB near this range but rarely exactly `-999`.
pub const SIGNAL_SENTINEL: f64 = -999.0;

/// One validated position/attitude report.
///
/// Constructed once per successfully decoded frame, immutable, and handed to
/// the consumer by value. Every field is numeric after decode: a field that
/// failed coercion carries its sentinel instead of being absent. No semantic
/// validation (latitude range, speed plausibility) happens here; those are
/// display-time concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Altitude in meters.
    pub altitude: f64,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Ground speed in meters per second, non-negative in real readings.
    pub speed: f64,

    /// Packed UTC time as `HHMMSSCC` (hours/minutes/seconds/centiseconds,
    /// two digits each, most-significant first).
    pub time_code: i64,

    /// Number of satellites in the fix.
    pub satellite_count: i32,

    /// Signal strength in dB; [`SIGNAL_SENTINEL`] means unknown.
    pub signal_strength: f64,
}

impl TelemetrySnapshot {
    /// Whether the signal strength field carries a real reading.
    pub fn has_signal_reading(&self) -> bool {
        self.signal_strength != SIGNAL_SENTINEL
    }
}
