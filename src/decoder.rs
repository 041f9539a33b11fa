//! Frame decoding and field normalization.
//!
//! One [`Frame`] in, exactly one [`TelemetrySnapshot`] or one
//! [`DecodeError`] out. The decoder holds no state across calls; decoding a
//! frame has no side effects beyond its result.

use serde_json::Value;

use crate::error::DecodeError;
use crate::types::{FIELD_SENTINEL, Frame, SIGNAL_SENTINEL, TelemetrySnapshot};

/// Stateless decoder from candidate JSON records to telemetry snapshots.
///
/// Structural failure (the frame is not a JSON object) rejects the whole
/// frame with [`DecodeError::Malformed`]. Field failure does not: a missing
/// key or a value that won't coerce to a number is replaced by a per-field
/// sentinel, so one bad field never invalidates the rest of the record.
pub struct TelemetryDecoder;

impl TelemetryDecoder {
    /// Decode one frame.
    ///
    /// Values are accepted as JSON numbers or as numeric strings (some
    /// firmware quotes every field); anything else falls back to the field's
    /// sentinel: [`FIELD_SENTINEL`] for all fields except `rssi`, which uses
    /// [`SIGNAL_SENTINEL`] so an unknown reading stays distinguishable from
    /// a real one.
    pub fn decode(frame: &Frame) -> Result<TelemetrySnapshot, DecodeError> {
        let value: Value = serde_json::from_slice(frame.bytes())
            .map_err(|err| DecodeError::malformed(err.to_string()))?;

        let record = value
            .as_object()
            .ok_or_else(|| DecodeError::malformed("record is not a JSON object"))?;

        Ok(TelemetrySnapshot {
            altitude: coerce(record.get("alt"), FIELD_SENTINEL),
            latitude: coerce(record.get("lat"), FIELD_SENTINEL),
            longitude: coerce(record.get("lng"), FIELD_SENTINEL),
            speed: coerce(record.get("mps"), FIELD_SENTINEL),
            time_code: coerce(record.get("time"), FIELD_SENTINEL) as i64,
            satellite_count: coerce(record.get("sats"), FIELD_SENTINEL) as i32,
            signal_strength: coerce(record.get("rssi"), SIGNAL_SENTINEL),
        })
    }
}

/// Coerce a raw JSON value to a finite number, or fall back to `sentinel`.
fn coerce(value: Option<&Value>, sentinel: f64) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match coerced {
        Some(n) if n.is_finite() => n,
        _ => sentinel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> Frame {
        Frame::from(text)
    }

    const FULL_RECORD: &str =
        r#"{"alt":120.5,"lat":41.2,"lng":-87.9,"mps":3.4,"time":12345678,"sats":9,"rssi":-71.5}"#;

    #[test]
    fn full_record_decodes() {
        let snapshot = TelemetryDecoder::decode(&frame(FULL_RECORD)).expect("valid record");
        assert_eq!(snapshot.altitude, 120.5);
        assert_eq!(snapshot.latitude, 41.2);
        assert_eq!(snapshot.longitude, -87.9);
        assert_eq!(snapshot.speed, 3.4);
        assert_eq!(snapshot.time_code, 12345678);
        assert_eq!(snapshot.satellite_count, 9);
        assert_eq!(snapshot.signal_strength, -71.5);
        assert!(snapshot.has_signal_reading());
    }

    #[test]
    fn uncoercible_field_gets_sentinel_without_rejecting_record() {
        let snapshot = TelemetryDecoder::decode(&frame(
            r#"{"alt":"x","lat":1,"lng":2,"mps":3,"time":4,"sats":5,"rssi":6}"#,
        ))
        .expect("record stays valid");
        assert_eq!(snapshot.altitude, -1.0);
        assert_eq!(snapshot.latitude, 1.0);
        assert_eq!(snapshot.longitude, 2.0);
        assert_eq!(snapshot.speed, 3.0);
        assert_eq!(snapshot.time_code, 4);
        assert_eq!(snapshot.satellite_count, 5);
        assert_eq!(snapshot.signal_strength, 6.0);
    }

    #[test]
    fn missing_keys_get_sentinels() {
        let snapshot = TelemetryDecoder::decode(&frame(r#"{"lat":10,"lng":20}"#))
            .expect("partial record stays valid");
        assert_eq!(snapshot.altitude, FIELD_SENTINEL);
        assert_eq!(snapshot.speed, FIELD_SENTINEL);
        assert_eq!(snapshot.time_code, -1);
        assert_eq!(snapshot.satellite_count, -1);
        assert_eq!(snapshot.signal_strength, SIGNAL_SENTINEL);
        assert!(!snapshot.has_signal_reading());
    }

    #[test]
    fn numeric_strings_are_tolerated() {
        let snapshot = TelemetryDecoder::decode(&frame(
            r#"{"alt":"120.5","lat":"41.2","lng":"-87.9","mps":"0","time":"12345678","sats":"9","rssi":"-71"}"#,
        ))
        .expect("quoted numbers coerce");
        assert_eq!(snapshot.altitude, 120.5);
        assert_eq!(snapshot.time_code, 12345678);
        assert_eq!(snapshot.satellite_count, 9);
        assert_eq!(snapshot.signal_strength, -71.0);
    }

    #[test]
    fn malformed_syntax_is_rejected() {
        let err = TelemetryDecoder::decode(&frame("not json")).expect_err("syntax error");
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let err = TelemetryDecoder::decode(&frame(r#"{"alt":1,"lat"#)).expect_err("truncated");
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn non_object_document_is_rejected() {
        for text in ["[1,2,3]", "42", "\"alt\"", "null"] {
            let err = TelemetryDecoder::decode(&frame(text)).expect_err("not an object");
            assert!(matches!(err, DecodeError::Malformed { .. }));
        }
    }

    #[test]
    fn extra_keys_are_ignored() {
        let snapshot = TelemetryDecoder::decode(&frame(
            r#"{"alt":1,"lat":2,"lng":3,"mps":4,"time":5,"sats":6,"rssi":7,"fix":"3D"}"#,
        ))
        .expect("extra keys fine");
        assert_eq!(snapshot.altitude, 1.0);
    }

    #[test]
    fn decoding_is_pure() {
        let first = TelemetryDecoder::decode(&frame(FULL_RECORD)).expect("valid");
        let second = TelemetryDecoder::decode(&frame(FULL_RECORD)).expect("valid");
        assert_eq!(first, second);
    }
}
