//! Byte source trait for transport backends

use serde::{Deserialize, Serialize};

use crate::Result;

/// An immutable run of bytes as delivered by the transport.
///
/// Carries no boundary relationship to any frame: a chunk may hold a
/// fraction of a record or several records. Consumed immediately by the
/// frame assembler, never retained.
pub type RawChunk = Vec<u8>;

/// Trait for raw byte transports.
///
/// Sources abstract over different links (physical serial, recorded replay,
/// scripted tests) and handle their own pacing internally. The trait is
/// designed for simplicity - one suspending read covers all needs.
///
/// Exactly one read is in flight at any time; the driver task is the sole
/// caller. Dropping the source releases the underlying handle.
#[async_trait::async_trait]
pub trait ByteSource: Send + 'static {
    /// Get the next chunk of raw bytes.
    ///
    /// Returns:
    /// - `Ok(Some(chunk))` - bytes delivered, of arbitrary size and boundary
    /// - `Ok(None)` - end of stream (normal termination)
    /// - `Err(e)` - transport failure; the connection moves to `Failed`
    async fn next_chunk(&mut self) -> Result<Option<RawChunk>>;
}

/// Configuration for opening a physical serial link.
///
/// `baud_rate` is the only transport option this core interprets; it sets
/// the link's symbol rate. Deserializable so an application can load it from
/// its own config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,

    /// Symbol rate of the link.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Baud rate used when none is configured, matching the usual rate of the
/// telemetry firmware this decoder was built against.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl SerialConfig {
    /// Config for `path` at the default baud rate.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), baud_rate: DEFAULT_BAUD_RATE }
    }

    /// Override the baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_common_baud() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(SerialConfig::new("/dev/ttyACM0").baud_rate(9_600).baud_rate, 9_600);
    }

    #[test]
    fn config_deserializes_with_default_baud() {
        let config: SerialConfig =
            serde_json::from_str(r#"{"path":"/dev/ttyUSB0"}"#).expect("minimal config");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);

        let config: SerialConfig =
            serde_json::from_str(r#"{"path":"COM3","baud_rate":57600}"#).expect("full config");
        assert_eq!(config.baud_rate, 57_600);
    }
}
