//! Core types for serrs-core.
//!
//! This module defines the data the store accumulates: the [`Record`], its
//! [`LogLevel`], and the attribute model ([`Attr`], [`Value`], [`Arg`]).

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Log severity level.
///
/// The derive order is the severity order, so `max` over levels yields the
/// most severe one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Upper-case name as it appears in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(Error::UnknownLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// An attribute value.
///
/// Scalars render natively in both formats. `Any` carries arbitrary JSON-shaped
/// data (maps, arrays, null); its inner keys are data, not attribute keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Any(serde_json::Value),
    /// A nested set of attributes, flattened with dotted keys in text and
    /// nested as an object in JSON.
    Group(Vec<Attr>),
}

/// A single key/value pair attached to a record. Keys need not be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self {
            key: key.into(),
            value: Value::Group(attrs.into_iter().collect()),
        }
    }
}

/// One element of a flat, interleaved key/value argument list.
///
/// A loose [`Value`] takes part in positional pairing (`key, value, key, value`);
/// a ready-made [`Attr`] occupies a single position on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    Attr(Attr),
}

impl From<Attr> for Arg {
    fn from(attr: Attr) -> Self {
        Arg::Attr(attr)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from($v: $t) -> Self {
                    $conv
                }
            }

            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_scalar! {
    &str => |v| Value::Str(v.to_string()),
    String => |v| Value::Str(v),
    &String => |v| Value::Str(v.clone()),
    i8 => |v| Value::Int(v.into()),
    i16 => |v| Value::Int(v.into()),
    i32 => |v| Value::Int(v.into()),
    i64 => |v| Value::Int(v),
    u8 => |v| Value::Int(v.into()),
    u16 => |v| Value::Int(v.into()),
    u32 => |v| Value::Int(v.into()),
    u64 => |v| Value::Uint(v),
    usize => |v| Value::Uint(v as u64),
    f32 => |v| Value::Float(v.into()),
    f64 => |v| Value::Float(v),
    bool => |v| Value::Bool(v),
    DateTime<Utc> => |v| Value::Time(v),
    serde_json::Value => |v| Value::Any(v),
}

/// Build a `Vec<Arg>` from a mixed list of keys, values and attributes.
///
/// ```rust
/// use serrs_core::{args, Attr};
/// let args = args!["user", "alice", "attempt", 3, Attr::new("ok", false)];
/// assert_eq!(args.len(), 5);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Arg>::new() };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Group a flat argument list into attributes.
///
/// `args[0]`/`args[1]` form the first pair, and so on; an [`Arg::Attr`] is taken
/// as-is and shifts the pairing by one. A trailing key without a value, a
/// non-string key, or an attribute in value position is rejected with
/// [`Error::MalformedArgs`].
pub fn attrs_from_args(args: impl IntoIterator<Item = Arg>) -> Result<Vec<Attr>> {
    let mut attrs = Vec::new();
    let mut iter = args.into_iter().enumerate();

    while let Some((position, arg)) = iter.next() {
        let key = match arg {
            Arg::Attr(attr) => {
                attrs.push(attr);
                continue;
            }
            Arg::Value(Value::Str(key)) => key,
            Arg::Value(_) => {
                return Err(Error::MalformedArgs {
                    position,
                    reason: "key must be a string",
                })
            }
        };

        match iter.next() {
            Some((_, Arg::Value(value))) => attrs.push(Attr { key, value }),
            Some((position, Arg::Attr(_))) => {
                return Err(Error::MalformedArgs {
                    position,
                    reason: "expected a value, found an attribute",
                })
            }
            None => {
                return Err(Error::MalformedArgs {
                    position,
                    reason: "key has no value",
                })
            }
        }
    }

    Ok(attrs)
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One structured log entry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    time: DateTime<Utc>,
    level: LogLevel,
    message: String,
    attrs: Vec<Attr>,
}

impl Record {
    pub fn new(
        time: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            attrs: attrs.into_iter().collect(),
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attributes in insertion order, duplicates included.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}
