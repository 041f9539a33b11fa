//! Streaming frame assembly from arbitrarily-chunked byte deliveries.
//!
//! The transport delivers bytes with no boundary relationship to records: a
//! single record may span many chunks, many records may arrive in one chunk.
//! [`FrameAssembler`] accumulates bytes and emits complete newline-delimited
//! [`Frame`]s in the order their terminators appear in the cumulative stream.
//!
//! Resynchronization: when the link is opened after the device has already
//! begun a record, the first delivery starts mid-record. While the assembly
//! buffer is empty, bytes are dropped until a `{` (the record opening
//! delimiter) is seen. Once a record is open, every byte is appended
//! unfiltered until the terminator - malformed content is the decoder's
//! problem, not the assembler's.

use tracing::trace;

use crate::types::Frame;

/// Incremental newline-delimited frame assembler.
///
/// The assembly buffer holds either a prefix of some record in progress or
/// nothing; it never holds a complete, already-emitted frame. No length cap
/// is enforced: a pathological stream that never terminates a record grows
/// the buffer without bound. That risk is left to the integrator - a cap is
/// a policy decision, and any value chosen here would silently drop frames
/// on links with legitimately long records.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self { buffer: Vec::with_capacity(256) }
    }

    /// Append a chunk and extract every frame it completes, in arrival order.
    ///
    /// A trailing partial frame stays in the buffer for the next call. The
    /// terminator is stripped from each emitted frame, along with one `\r`
    /// immediately preceding it on CRLF-configured links.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();

        for &byte in chunk {
            if self.buffer.is_empty() && byte != b'{' {
                // Resync: not inside a record, drop until a record opens.
                continue;
            }

            if byte == b'\n' {
                let mut bytes = std::mem::take(&mut self.buffer);
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                trace!(len = bytes.len(), "frame assembled");
                frames.push(Frame::new(bytes));
            } else {
                self.buffer.push(byte);
            }
        }

        frames
    }

    /// Bytes buffered for a record still in progress.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }
}
