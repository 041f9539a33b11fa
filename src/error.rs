//! Error types for telemetry link processing.
//!
//! Two error families exist with deliberately different severities:
//!
//! - [`TelemetryError`] covers transport and lifecycle failures. These are
//!   fatal to the connection: an open failure is surfaced to the caller, a
//!   read failure moves the lifecycle to `Failed` and terminates the event
//!   stream.
//! - [`DecodeError`] covers a single frame that failed structural parsing.
//!   It is recovered locally - the frame is discarded, the stream continues,
//!   and the failure is reported as a non-fatal [`crate::TelemetryEvent`].
//!
//! Errors provide methods to determine whether a caller-level retry makes
//! sense:
//!
//! ```rust
//! use groundtrack::TelemetryError;
//!
//! let error = TelemetryError::open_failed("device busy");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::lifecycle::ConnectionState;

/// Result type alias for telemetry link operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Fatal error type for transport and lifecycle operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("failed to open byte source: {reason}")]
    Open {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("transport read failed: {reason}")]
    Read {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("replay log error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: ConnectionState, to: ConnectionState },

    #[error("telemetry event stream already consumed")]
    StreamConsumed,
}

impl TelemetryError {
    /// Returns whether a fresh connection attempt is worth trying.
    ///
    /// This core never retries on its own; the classification exists for the
    /// caller's reconnect policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Open { .. } => true,
            TelemetryError::Read { .. } => true,
            TelemetryError::File { .. } => false,
            TelemetryError::InvalidTransition { .. } => false,
            TelemetryError::StreamConsumed => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::Open { .. } => vec![
                "Check the device is plugged in and the path is correct",
                "Check read permission on the device node (dialout group on Linux)",
                "Close other programs holding the port",
                "Verify the configured baud rate matches the device",
            ],
            TelemetryError::Read { .. } => vec![
                "Check the cable and the device power",
                "Open a new connection; read failures end the current one",
            ],
            TelemetryError::File { .. } => vec![
                "Check the replay log exists and is readable",
            ],
            TelemetryError::InvalidTransition { .. } => vec![
                "Create a new connection instead of reusing a terminated one",
            ],
            TelemetryError::StreamConsumed => vec![
                "Take the event stream once and share downstream instead",
            ],
        }
    }

    /// Helper constructor for open failures.
    pub fn open_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Open { reason: reason.into(), source: None }
    }

    /// Helper constructor for open failures with a source.
    pub fn open_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Open { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for read failures.
    pub fn read_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Read { reason: reason.into(), source: None }
    }

    /// Helper constructor for read failures with a source.
    pub fn read_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Read { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for replay log errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::Read { reason: err.kind().to_string(), source: Some(Box::new(err)) }
    }
}

/// Per-frame decode failure. Non-fatal: the stream continues past it.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("malformed frame: {details}")]
    Malformed { details: String },
}

impl DecodeError {
    /// Helper constructor for malformed frames.
    pub fn malformed(details: impl Into<String>) -> Self {
        DecodeError::Malformed { details: details.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_contain_their_context(
            reason in "[^\\x00-\\x1f]*",
            path_tail in "\\w+",
          ) {
            let open_error = TelemetryError::open_failed(reason.clone());
            prop_assert!(open_error.to_string().contains(&reason));

            let read_error = TelemetryError::read_failed(reason.clone());
            prop_assert!(read_error.to_string().contains(&reason));

            let path = PathBuf::from(format!("/tmp/{}.log", path_tail));
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
            let file_error = TelemetryError::file_error(path.clone(), io_err);
            prop_assert!(file_error.to_string().contains(&path.display().to_string()));

            let decode_error = DecodeError::malformed(reason.clone());
            prop_assert!(decode_error.to_string().contains(&reason));
          }

          #[test]
          fn error_source_chaining_preserves_information(base_message in "[a-z ]{1,40}") {
            let base: Box<dyn std::error::Error + Send + Sync> =
              Box::new(std::io::Error::other(base_message.clone()));
            let top = TelemetryError::read_failed_with_source("link dropped", base);

            let source = std::error::Error::source(&top)
              .expect("read error should expose its source");
            prop_assert!(source.to_string().contains(&base_message));
          }
        }
    }

    #[test]
    fn error_constructors_validation() {
        let open_error = TelemetryError::open_failed("test");
        assert!(matches!(open_error, TelemetryError::Open { .. }));

        let read_error = TelemetryError::read_failed("test");
        assert!(matches!(read_error, TelemetryError::Read { .. }));

        let file_error = TelemetryError::file_error(
            PathBuf::from("/test"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
        );
        assert!(matches!(file_error, TelemetryError::File { .. }));
    }

    #[test]
    fn error_traits_validation() {
        // Compile-time check: both error types must be Send + Sync + 'static
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<TelemetryError>();
        assert_send_sync_static::<DecodeError>();

        let error = TelemetryError::open_failed("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn retry_classification() {
        assert!(TelemetryError::open_failed("busy").is_retryable());
        assert!(TelemetryError::read_failed("unplugged").is_retryable());
        assert!(!TelemetryError::StreamConsumed.is_retryable());
        assert!(
            !TelemetryError::InvalidTransition {
                from: ConnectionState::Closed,
                to: ConnectionState::Streaming,
            }
            .is_retryable()
        );

        for error in [
            TelemetryError::open_failed("busy"),
            TelemetryError::read_failed("unplugged"),
            TelemetryError::StreamConsumed,
        ] {
            assert!(!error.recovery_suggestions().is_empty());
        }
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let converted: TelemetryError = io_err.into();
        match converted {
            TelemetryError::Read { source, .. } => {
                assert_eq!(source.expect("io source kept").to_string(), "pipe closed");
            }
            other => panic!("expected Read error, got {:?}", other),
        }
    }
}
