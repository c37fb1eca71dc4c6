//! Store — ordered, in-memory accumulation of [`Record`] values.
//!
//! A [`Store`] keeps records in insertion order together with the highest
//! [`LogLevel`] seen, and offers two consumption paths that share one
//! formatter:
//!
//! - **buffered**: [`Store::render_all`], [`Store::render_each`],
//!   [`Store::to_json`] and the [`serde::Serialize`] impl return the rendering
//!   to the caller;
//! - **live**: [`Store::flush`] writes every rendered record to the sink the
//!   store was built with.
//!
//! Neither path touches the record sequence.
//!
//! # Merging
//!
//! ```text
//! a = [r1, r2]   b = [r3, r4]
//! a.append(&b)   -> [r1, r2, r3, r4]   (chronological)
//! a.prepend(&b)  -> [r3, r4, r1, r2]   (stack: lower-level causes first)
//! ```
//!
//! # Concurrency
//!
//! The store does no internal locking. It is meant to be owned by one flow of
//! work and merged into its caller's store afterwards; sharing one store
//! between threads needs external synchronisation.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::{Error, Result};
use crate::format::{Format, RecordFormatter, RenderConfig};
use crate::types::{attrs_from_args, Arg, Attr, LogLevel, Record};

pub struct Store<W = io::Sink> {
    config: RenderConfig,
    formatter: Box<dyn RecordFormatter>,
    sink: W,
    highest: Option<LogLevel>,
    records: Vec<Record>,
}

impl Store<io::Sink> {
    /// Create an empty store whose live sink discards everything.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_sink(io::sink(), config)
    }
}

impl Default for Store<io::Sink> {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl<W> std::fmt::Debug for Store<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("highest", &self.highest)
            .field("records", &self.records.len())
            .finish()
    }
}

impl<W> Store<W> {
    /// Create an empty store that forwards to `sink` on [`Store::flush`].
    pub fn with_sink(sink: W, config: RenderConfig) -> Self {
        Self {
            config,
            formatter: config.formatter(),
            sink,
            highest: None,
            records: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Adding records
    // -----------------------------------------------------------------------

    /// Append one record built from explicit attributes.
    pub fn add(
        &mut self,
        time: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.push(Record::new(time, level, message, attrs));
    }

    /// Append one record built from a flat `key, value, key, value` list.
    ///
    /// A malformed list is rejected with [`Error::MalformedArgs`] and nothing
    /// is appended.
    pub fn add_from_args(
        &mut self,
        time: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<()> {
        let attrs = attrs_from_args(args)?;
        self.add(time, level, message, attrs);
        Ok(())
    }

    pub fn debug(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.add(time, LogLevel::Debug, message, attrs);
    }

    pub fn info(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.add(time, LogLevel::Info, message, attrs);
    }

    pub fn warn(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.add(time, LogLevel::Warn, message, attrs);
    }

    pub fn error(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        self.add(time, LogLevel::Error, message, attrs);
    }

    pub fn debug_from_args(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<()> {
        self.add_from_args(time, LogLevel::Debug, message, args)
    }

    pub fn info_from_args(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<()> {
        self.add_from_args(time, LogLevel::Info, message, args)
    }

    pub fn warn_from_args(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<()> {
        self.add_from_args(time, LogLevel::Warn, message, args)
    }

    pub fn error_from_args(
        &mut self,
        time: DateTime<Utc>,
        message: impl Into<String>,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<()> {
        self.add_from_args(time, LogLevel::Error, message, args)
    }

    fn push(&mut self, record: Record) {
        self.highest = self.highest.max(Some(record.level()));
        self.records.push(record);
    }

    // -----------------------------------------------------------------------
    // Merging
    // -----------------------------------------------------------------------

    /// `[self..., other...]`. `other` is left untouched.
    pub fn append<V>(&mut self, other: &Store<V>) {
        self.records.extend_from_slice(&other.records);
        self.highest = self.highest.max(other.highest);
        tracing::trace!(
            added = other.records.len(),
            total = self.records.len(),
            "appended store"
        );
    }

    /// `[other..., self...]`: `other`'s records go underneath this store's.
    /// `other` is left untouched.
    #[doc(alias = "stack")]
    pub fn prepend<V>(&mut self, other: &Store<V>) {
        let mut merged = Vec::with_capacity(other.records.len() + self.records.len());
        merged.extend_from_slice(&other.records);
        merged.append(&mut self.records);
        self.records = merged;
        self.highest = self.highest.max(other.highest);
        tracing::trace!(
            added = other.records.len(),
            total = self.records.len(),
            "prepended store"
        );
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Highest level among all records, `None` while the store is empty.
    pub fn highest_level(&self) -> Option<LogLevel> {
        self.highest
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn first(&self) -> Result<&Record> {
        self.records.first().ok_or(Error::EmptyStore)
    }

    pub fn last(&self) -> Result<&Record> {
        self.records.last().ok_or(Error::EmptyStore)
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    // -----------------------------------------------------------------------
    // Buffered rendering
    // -----------------------------------------------------------------------

    /// Every record rendered in order and concatenated, one line each.
    pub fn render_all(&self) -> Result<String> {
        let mut all = String::new();
        for_each_line(&*self.formatter, &self.records, |line| {
            all.push_str(line);
            Ok(())
        })?;
        Ok(all)
    }

    /// One rendered line per record, without the trailing newline.
    pub fn render_each(&self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(self.records.len());
        for_each_line(&*self.formatter, &self.records, |line| {
            lines.push(strip_newline(line).to_string());
            Ok(())
        })?;
        Ok(lines)
    }

    /// The store as a JSON array of its records' JSON renderings.
    ///
    /// Only JSON-configured stores can do this; a text-configured store fails
    /// with [`Error::NotJson`] rather than producing an invalid document.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        if self.config.format != Format::Json {
            return Err(Error::NotJson);
        }
        let mut out = Vec::new();
        out.push(b'[');
        let mut first = true;
        for_each_line(&*self.formatter, &self.records, |line| {
            if !first {
                out.push(b',');
            }
            first = false;
            out.extend_from_slice(strip_newline(line).as_bytes());
            Ok(())
        })?;
        out.push(b']');
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Live forwarding
// ---------------------------------------------------------------------------

impl<W: Write> Store<W> {
    /// Write every record, in order, to the live sink.
    ///
    /// Stops at the first render or write error and returns it; records already
    /// written stay written. The sink is flushed once everything went through.
    pub fn flush(&mut self) -> Result<()> {
        let Self {
            formatter,
            sink,
            records,
            ..
        } = self;

        let mut forwarded = 0usize;
        let result = for_each_line(&**formatter, records, |line| {
            sink.write_all(line.as_bytes())?;
            forwarded += 1;
            Ok(())
        })
        .and_then(|()| sink.flush().map_err(Error::from));

        match &result {
            Ok(()) => tracing::debug!(forwarded, "forwarded records to live sink"),
            Err(err) => tracing::debug!(forwarded, error = %err, "live forwarding stopped"),
        }
        result
    }
}

// ---------------------------------------------------------------------------
// JSON embedding
// ---------------------------------------------------------------------------

/// Serializes as a JSON array of the exact rendered records, so a store can sit
/// inside any `serde_json`-serialized structure. Text-configured stores fail.
impl<W> Serialize for Store<W> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.config.format != Format::Json {
            return Err(S::Error::custom(Error::NotJson));
        }
        let mut raw: Vec<Box<RawValue>> = Vec::with_capacity(self.records.len());
        for_each_line(&*self.formatter, &self.records, |line| {
            raw.push(RawValue::from_string(strip_newline(line).to_string())?);
            Ok(())
        })
        .map_err(S::Error::custom)?;
        serializer.collect_seq(raw)
    }
}

// ---------------------------------------------------------------------------
// Scoped rendering
// ---------------------------------------------------------------------------

/// Render each record into a scratch buffer owned by this call and hand the
/// line to `consume`. The buffer is cleared after every record, success or not.
fn for_each_line(
    formatter: &dyn RecordFormatter,
    records: &[Record],
    mut consume: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    let mut scratch = String::new();
    for record in records {
        let consumed = formatter
            .render(record, &mut scratch)
            .and_then(|()| consume(&scratch));
        scratch.clear();
        consumed?;
    }
    Ok(())
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}
