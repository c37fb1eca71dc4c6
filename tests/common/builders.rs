//! Test builders — ergonomic constructors for stores and failing sinks.
//!
//! These are designed for readability in test assertions, not for production
//! use. They panic on invalid input rather than returning `Result`.

use serrs::{Attr, LogLevel, RenderConfig, Store};
use std::io;

use super::fixtures::{sample_attrs, test_time, SAMPLE_LEVELS};

// ---------------------------------------------------------------------------
// StoreBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Store`] fixtures. Every record gets [`test_time`].
///
/// # Example
///
/// ```rust
/// let store = StoreBuilder::json()
///     .record(LogLevel::Error, "timeout", vec![Attr::new("attempt", 3)])
///     .build();
/// ```
pub struct StoreBuilder {
    config: RenderConfig,
    records: Vec<(LogLevel, String, Vec<Attr>)>,
}

impl StoreBuilder {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
        }
    }

    pub fn json() -> Self {
        Self::new(RenderConfig::json())
    }

    pub fn text() -> Self {
        Self::new(RenderConfig::text())
    }

    pub fn record(mut self, level: LogLevel, message: &str, attrs: Vec<Attr>) -> Self {
        self.records.push((level, message.to_string(), attrs));
        self
    }

    /// Add one record per message, all at `level`, without attributes.
    pub fn messages(mut self, level: LogLevel, messages: &[&str]) -> Self {
        for m in messages {
            self.records.push((level, m.to_string(), Vec::new()));
        }
        self
    }

    pub fn build(self) -> Store {
        self.build_with_sink(io::sink())
    }

    pub fn build_with_sink<W>(self, sink: W) -> Store<W> {
        let mut store = Store::with_sink(sink, self.config);
        for (level, message, attrs) in self.records {
            store.add(test_time(), level, message, attrs);
        }
        store
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// The four-record Debug/Info/Warn/Error fixture with `a = 1..=4` and `m = {b: 2}`.
pub fn sample_store<W>(config: RenderConfig, sink: W) -> Store<W> {
    let mut builder = StoreBuilder::new(config);
    for (i, level) in SAMPLE_LEVELS.iter().enumerate() {
        builder = builder.record(*level, "m", sample_attrs(i as i64 + 1));
    }
    builder.build_with_sink(sink)
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// A writer that accepts `allowed` writes and then fails every call with
/// `BrokenPipe`.
#[derive(Debug, Default)]
pub struct FlakySink {
    pub written: Vec<u8>,
    allowed: usize,
    calls: usize,
}

impl FlakySink {
    pub fn failing_after(allowed: usize) -> Self {
        Self {
            written: Vec::new(),
            allowed,
            calls: 0,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.written.clone()).expect("sink received invalid UTF-8")
    }
}

impl io::Write for FlakySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.calls >= self.allowed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink went away"));
        }
        self.calls += 1;
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
