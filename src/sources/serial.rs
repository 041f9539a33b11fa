//! Physical serial link byte source

use std::io::{ErrorKind, Read};

use tracing::{debug, info};

use crate::error::{Result, TelemetryError};
use crate::source::{ByteSource, RawChunk, SerialConfig};

/// Read buffer size per poll. Chunks handed to the assembler are at most
/// this large; the assembler accepts any boundary.
const READ_CHUNK: usize = 1024;

/// Poll timeout for a single blocking read. Short enough that a pending
/// read returns to the async runtime quickly after cancellation.
const POLL_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(100);

/// Byte source over a physical (or virtual) serial device.
///
/// `serialport` reads are blocking; each poll runs on the blocking thread
/// pool with a short timeout, and the async side loops on timeouts. A read
/// still in flight when the connection is cancelled completes on its thread
/// and its result is discarded. Dropping the source closes the device.
pub struct SerialSource {
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl std::fmt::Debug for SerialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSource")
            .field("port", &self.port.is_some())
            .finish()
    }
}

enum ReadOutcome {
    Data(RawChunk),
    TimedOut,
    Eof,
}

impl SerialSource {
    /// Open the device described by `config`. 8N1 framing; `baud_rate` is
    /// the only configurable transport option.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        info!(path = %config.path, baud = config.baud_rate, "opening serial link");

        let port = serialport::new(&config.path, config.baud_rate)
            .timeout(POLL_TIMEOUT)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()
            .map_err(|err| {
                TelemetryError::open_failed_with_source(
                    format!("{} at {} baud", config.path, config.baud_rate),
                    Box::new(err),
                )
            })?;

        Ok(Self { port: Some(port) })
    }
}

#[async_trait::async_trait]
impl ByteSource for SerialSource {
    async fn next_chunk(&mut self) -> Result<Option<RawChunk>> {
        loop {
            let mut port = self
                .port
                .take()
                .ok_or_else(|| TelemetryError::read_failed("serial port already released"))?;

            let (port, outcome) = tokio::task::spawn_blocking(move || {
                let mut buf = vec![0u8; READ_CHUNK];
                let outcome = match port.read(&mut buf) {
                    Ok(0) => Ok(ReadOutcome::Eof),
                    Ok(n) => {
                        buf.truncate(n);
                        Ok(ReadOutcome::Data(buf))
                    }
                    // Timeouts are normal polling; EINTR shows up around
                    // shutdown signals and is not a link failure.
                    Err(err)
                        if err.kind() == ErrorKind::TimedOut
                            || err.kind() == ErrorKind::Interrupted =>
                    {
                        Ok(ReadOutcome::TimedOut)
                    }
                    Err(err) => Err(err),
                };
                (port, outcome)
            })
            .await
            .map_err(|join| {
                TelemetryError::read_failed(format!("serial reader task failed: {join}"))
            })?;

            self.port = Some(port);

            match outcome {
                Ok(ReadOutcome::Data(chunk)) => return Ok(Some(chunk)),
                // Nothing arrived within the poll window; loop so a pending
                // cancellation gets a chance to run between polls.
                Ok(ReadOutcome::TimedOut) => continue,
                Ok(ReadOutcome::Eof) => {
                    debug!("serial link reported end of stream");
                    return Ok(None);
                }
                Err(err) => {
                    return Err(TelemetryError::read_failed_with_source(
                        "serial read failed",
                        Box::new(err),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_is_an_open_error() {
        let config = SerialConfig::new("/dev/nonexistent-telemetry-link");
        let err = SerialSource::open(&config).expect_err("device does not exist");
        assert!(matches!(err, TelemetryError::Open { .. }));
        assert!(err.is_retryable());
    }
}
