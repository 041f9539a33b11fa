//! Replay byte source for recorded telemetry logs

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::error::{Result, TelemetryError};
use crate::source::{ByteSource, RawChunk};

/// Default chunk size for replay delivery. Deliberately small so replayed
/// records span several chunks, like a real link at display-update rates.
const DEFAULT_CHUNK_SIZE: usize = 64;

/// Default pacing between replayed chunks.
const DEFAULT_PACE: Duration = Duration::from_millis(10);

/// Byte source replaying a recorded byte log from a file.
///
/// Delivers the log in paced, fixed-size chunks so the whole pipeline runs
/// without hardware, on any platform. Chunk boundaries fall wherever the
/// size cut lands - the assembler never learns whether bytes came from a
/// device or a file.
#[derive(Debug)]
pub struct ReplaySource {
    file: tokio::fs::File,
    chunk_size: usize,
    pace: Interval,
}

impl ReplaySource {
    /// Open a recorded byte log with default chunking and pacing.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_pacing(path, DEFAULT_CHUNK_SIZE, DEFAULT_PACE).await
    }

    /// Open a recorded byte log, choosing chunk size and inter-chunk pacing.
    pub async fn with_pacing<P: AsRef<Path>>(
        path: P,
        chunk_size: usize,
        pace_interval: Duration,
    ) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening replay log");

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| TelemetryError::file_error(path.to_path_buf(), err))?;

        let mut pace = interval(pace_interval.max(Duration::from_micros(1)));
        pace.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Self { file, chunk_size: chunk_size.max(1), pace })
    }
}

#[async_trait::async_trait]
impl ByteSource for ReplaySource {
    async fn next_chunk(&mut self) -> Result<Option<RawChunk>> {
        self.pace.tick().await;

        let mut buf = vec![0u8; self.chunk_size];
        let n = self.file.read(&mut buf).await.map_err(|err| {
            TelemetryError::read_failed_with_source("replay log read failed", Box::new(err))
        })?;

        if n == 0 {
            debug!("replay log exhausted");
            return Ok(None);
        }

        buf.truncate(n);
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn replays_whole_log_in_bounded_chunks() {
        let mut log = tempfile::NamedTempFile::new().expect("temp log");
        log.write_all(b"{\"alt\":1}\n{\"alt\":2}\n").expect("write log");

        let mut source = ReplaySource::with_pacing(log.path(), 4, Duration::from_micros(1))
            .await
            .expect("open log");

        let mut replayed = Vec::new();
        while let Some(chunk) = source.next_chunk().await.expect("read chunk") {
            assert!(chunk.len() <= 4);
            replayed.extend(chunk);
        }
        assert_eq!(replayed, b"{\"alt\":1}\n{\"alt\":2}\n");

        // End of stream is stable once reached.
        assert!(source.next_chunk().await.expect("eof").is_none());
    }

    #[tokio::test]
    async fn missing_log_is_a_file_error() {
        let err = ReplaySource::open("/nonexistent/telemetry.log")
            .await
            .expect_err("missing file");
        assert!(matches!(err, TelemetryError::File { .. }));
    }
}
