//! Error type for serrs-core.
//!
//! Every fallible operation in this crate returns [`Result`]. Rendering and
//! forwarding never swallow errors; the caller decides what to do with them.

use thiserror::Error;

/// Errors produced by the record store, the formatters and configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// `first`/`last` was called on a store with no records.
    #[error("record store is empty")]
    EmptyStore,

    /// A flat key/value argument list could not be grouped into attributes.
    /// `position` is the index of the offending argument.
    #[error("malformed argument list at position {position}: {reason}")]
    MalformedArgs { position: usize, reason: &'static str },

    /// An attribute value has no representation in the target format
    /// (e.g. a NaN float in JSON).
    #[error("unsupported value for key {key:?}: {detail}")]
    UnsupportedValue { key: String, detail: String },

    /// JSON output was requested from a store configured for text rendering.
    #[error("store is configured for text output and cannot be rendered as a JSON array")]
    NotJson,

    #[error("unknown log level {0:?}")]
    UnknownLevel(String),

    #[error("unknown output format {0:?} (expected \"text\" or \"json\")")]
    UnknownFormat(String),

    #[error("unknown key case {0:?} (expected \"preserve\", \"upper\" or \"lower\")")]
    UnknownKeyCase(String),

    /// The live sink rejected a write, or a config file could not be created.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result alias used throughout serrs-core.
pub type Result<T> = std::result::Result<T, Error>;
