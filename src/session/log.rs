//! Append-only per-target log of available usernames

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{HandleForgeError, Result};
use crate::types::Target;

/// Destination for log lines
pub(crate) trait LogSink: Write + Send {
    /// Push buffered data to durable storage
    fn sync(&mut self) -> io::Result<()>;
}

impl LogSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// One open log shared by every check of a run.
///
/// Each `record` writes a whole line under the lock, so concurrent writers never
/// interleave bytes. `close` consumes the log, which means nothing can record
/// into it afterwards.
pub struct SessionLog {
    path: PathBuf,
    sink: Mutex<Box<dyn LogSink>>,
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog").field("path", &self.path).finish_non_exhaustive()
    }
}

impl SessionLog {
    /// Open `<dir>/<target>.log` for appending, creating it if absent
    pub fn open(dir: &Path, target: &Target) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            HandleForgeError::io(e.to_string(), Some(dir.to_string_lossy().to_string()))
        })?;

        let path = dir.join(target.log_file_name());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| HandleForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string())))?;

        tracing::debug!(path = %path.display(), "Opened session log");

        Ok(Self::with_sink(path, Box::new(file)))
    }

    pub(crate) fn with_sink(path: PathBuf, sink: Box<dyn LogSink>) -> Self {
        Self {
            path,
            sink: Mutex::new(sink),
        }
    }

    /// Append one username as its own line
    pub fn record(&self, username: &str) -> Result<()> {
        let line = format!("{}\n", username);
        let mut sink = self.sink.lock();
        sink.write_all(line.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(|e| self.io_error(e))
    }

    /// Flush everything to disk and release the handle
    pub fn close(self) -> Result<()> {
        let mut sink = self.sink.into_inner();
        sink.sync().map_err(|e| HandleForgeError::io(e.to_string(), Some(self.path.to_string_lossy().to_string())))?;
        tracing::debug!(path = %self.path.display(), "Closed session log");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: io::Error) -> HandleForgeError {
        HandleForgeError::io(err.to_string(), Some(self.path.to_string_lossy().to_string()))
    }
}
