//! Frame type for the streaming decode pipeline

use std::borrow::Cow;

/// One newline-delimited candidate record extracted from the byte stream.
///
/// This is the unit that flows from the assembler to the decoder. The line
/// terminator (and a `\r` immediately preceding it on CRLF links) is already
/// stripped; the remaining bytes are the candidate JSON text exactly as it
/// arrived, valid or not. A frame is decoded once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Create a frame from terminator-stripped bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Raw frame bytes, without the terminator.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame text for display and diagnostics. Invalid UTF-8 is replaced,
    /// not rejected; structural validity is the decoder's concern.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Length of the frame in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the frame carries no bytes (a bare terminator).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for Frame {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}
