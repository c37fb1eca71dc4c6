//! Sink that re-emits forwarded lines as `tracing` events.

use std::io;

use tracing::Level;

/// An [`io::Write`] that turns every complete line written to it into one
/// `tracing` event at a fixed level, with the line as the `record` field.
///
/// Bytes after the last newline are held until the next write completes the
/// line, or until [`flush`](io::Write::flush) emits them as-is.
#[derive(Debug)]
pub struct TracingSink {
    level: Level,
    pending: Vec<u8>,
}

impl TracingSink {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            pending: Vec::new(),
        }
    }

    fn emit(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let record = line.trim_end_matches(['\r', '\n']);
        if record.is_empty() {
            return;
        }
        if self.level == Level::ERROR {
            tracing::error!(target: "serrs", record);
        } else if self.level == Level::WARN {
            tracing::warn!(target: "serrs", record);
        } else if self.level == Level::INFO {
            tracing::info!(target: "serrs", record);
        } else if self.level == Level::DEBUG {
            tracing::debug!(target: "serrs", record);
        } else {
            tracing::trace!(target: "serrs", record);
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl io::Write for TracingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.emit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest);
        }
        Ok(())
    }
}
