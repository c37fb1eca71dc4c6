//! Record formatters.
//!
//! A [`RecordFormatter`] turns one [`Record`] into one newline-terminated line.
//! Both the buffered render path and the live-forward path of the store go
//! through the same formatter instance, so their bytes only differ in where
//! they end up.
//!
//! # Text line
//!
//! ```text
//! time=2000-01-02T03:04:05.000Z level=DEBUG msg=m a=1 m=map[b:2]
//! ```
//!
//! # JSON line
//!
//! ```text
//! {"time":"2000-01-02T03:04:05Z","level":"DEBUG","msg":"m","a":1,"m":{"b":2}}
//! ```
//!
//! Text timestamps always carry millisecond precision and an offset (`Z` for
//! UTC). JSON timestamps carry full sub-second precision with trailing zeros
//! trimmed.

use std::borrow::Cow;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{Attr, Record, Value};

const TIME_KEY: &str = "time";
const LEVEL_KEY: &str = "level";
const MESSAGE_KEY: &str = "msg";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Output format of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    #[default]
    Json,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Rewrite applied to attribute keys before emission.
///
/// Applies to the fixed `time`/`level`/`msg` keys and to every non-group
/// attribute key, including attributes nested inside groups. Group keys and
/// keys inside [`Value::Any`] maps are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    #[default]
    Preserve,
    Upper,
    Lower,
}

impl KeyCase {
    pub fn apply<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match self {
            KeyCase::Preserve => Cow::Borrowed(key),
            KeyCase::Upper => Cow::Owned(key.to_uppercase()),
            KeyCase::Lower => Cow::Owned(key.to_lowercase()),
        }
    }
}

impl FromStr for KeyCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(KeyCase::Preserve),
            "upper" => Ok(KeyCase::Upper),
            "lower" => Ok(KeyCase::Lower),
            _ => Err(Error::UnknownKeyCase(s.to_string())),
        }
    }
}

/// Fixed render configuration of a store: output format plus key rewrite.
///
/// The default is JSON with keys preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderConfig {
    pub format: Format,
    pub key_case: KeyCase,
}

impl RenderConfig {
    pub fn text() -> Self {
        Self {
            format: Format::Text,
            key_case: KeyCase::Preserve,
        }
    }

    pub fn json() -> Self {
        Self {
            format: Format::Json,
            key_case: KeyCase::Preserve,
        }
    }

    pub fn with_key_case(mut self, key_case: KeyCase) -> Self {
        self.key_case = key_case;
        self
    }

    /// Build the formatter this configuration selects.
    pub fn formatter(&self) -> Box<dyn RecordFormatter> {
        match self.format {
            Format::Text => Box::new(TextFormatter::new(self.key_case)),
            Format::Json => Box::new(JsonFormatter::new(self.key_case)),
        }
    }
}

// ---------------------------------------------------------------------------
// Formatter capability
// ---------------------------------------------------------------------------

/// Renders a single record as one newline-terminated line.
pub trait RecordFormatter: std::fmt::Debug + Send + Sync {
    fn format(&self) -> Format;

    /// Append the rendering of `record` to `out`. On error, `out` may hold a
    /// partial line; callers discard it.
    fn render(&self, record: &Record, out: &mut String) -> Result<()>;
}

/// `key=value` line formatter.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    key_case: KeyCase,
}

impl TextFormatter {
    pub fn new(key_case: KeyCase) -> Self {
        Self { key_case }
    }

    fn write_attr(&self, out: &mut String, prefix: &str, attr: &Attr) {
        match &attr.value {
            Value::Group(attrs) if is_empty_group(attrs) => {}
            Value::Group(attrs) => {
                let prefix = if attr.key.is_empty() {
                    prefix.to_string()
                } else {
                    format!("{prefix}{}.", attr.key)
                };
                for nested in attrs {
                    self.write_attr(out, &prefix, nested);
                }
            }
            value => {
                out.push(' ');
                let key = format!("{prefix}{}", self.key_case.apply(&attr.key));
                push_text_str(out, &key);
                out.push('=');
                write_text_value(out, value);
            }
        }
    }
}

impl RecordFormatter for TextFormatter {
    fn format(&self) -> Format {
        Format::Text
    }

    fn render(&self, record: &Record, out: &mut String) -> Result<()> {
        push_text_str(out, &self.key_case.apply(TIME_KEY));
        out.push('=');
        out.push_str(&text_time(record.time()));

        out.push(' ');
        push_text_str(out, &self.key_case.apply(LEVEL_KEY));
        out.push('=');
        out.push_str(record.level().as_str());

        out.push(' ');
        push_text_str(out, &self.key_case.apply(MESSAGE_KEY));
        out.push('=');
        push_text_str(out, record.message());

        for attr in record.attrs() {
            self.write_attr(out, "", attr);
        }
        out.push('\n');
        Ok(())
    }
}

/// One-JSON-object-per-line formatter.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    key_case: KeyCase,
}

impl JsonFormatter {
    pub fn new(key_case: KeyCase) -> Self {
        Self { key_case }
    }

    /// `needs_sep` tracks whether a member has already been written to the
    /// enclosing object.
    fn write_attr(&self, out: &mut String, attr: &Attr, needs_sep: &mut bool) -> Result<()> {
        match &attr.value {
            Value::Group(attrs) if is_empty_group(attrs) => {}
            Value::Group(attrs) if attr.key.is_empty() => {
                for nested in attrs {
                    self.write_attr(out, nested, needs_sep)?;
                }
            }
            Value::Group(attrs) => {
                if *needs_sep {
                    out.push(',');
                }
                push_json_str(out, &attr.key)?;
                out.push_str(":{");
                let mut inner = false;
                for nested in attrs {
                    self.write_attr(out, nested, &mut inner)?;
                }
                out.push('}');
                *needs_sep = true;
            }
            value => {
                if *needs_sep {
                    out.push(',');
                }
                push_json_str(out, &self.key_case.apply(&attr.key))?;
                out.push(':');
                write_json_value(out, &attr.key, value)?;
                *needs_sep = true;
            }
        }
        Ok(())
    }
}

impl RecordFormatter for JsonFormatter {
    fn format(&self) -> Format {
        Format::Json
    }

    fn render(&self, record: &Record, out: &mut String) -> Result<()> {
        out.push('{');
        push_json_str(out, &self.key_case.apply(TIME_KEY))?;
        out.push_str(":\"");
        out.push_str(&json_time(record.time()));
        out.push_str("\",");

        push_json_str(out, &self.key_case.apply(LEVEL_KEY))?;
        out.push(':');
        push_json_str(out, record.level().as_str())?;
        out.push(',');

        push_json_str(out, &self.key_case.apply(MESSAGE_KEY))?;
        out.push(':');
        push_json_str(out, record.message())?;

        let mut needs_sep = true;
        for attr in record.attrs() {
            self.write_attr(out, attr, &mut needs_sep)?;
        }
        out.push_str("}\n");
        Ok(())
    }
}

/// A group renders nothing when every member is itself an empty group.
fn is_empty_group(attrs: &[Attr]) -> bool {
    attrs.iter().all(|attr| match &attr.value {
        Value::Group(nested) => is_empty_group(nested),
        _ => false,
    })
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

fn text_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn json_time(t: DateTime<Utc>) -> String {
    let full = t.to_rfc3339_opts(SecondsFormat::Nanos, true);
    match full.split_once('.') {
        Some((secs, rest)) => {
            let frac = rest.trim_end_matches('Z').trim_end_matches('0');
            if frac.is_empty() {
                format!("{secs}Z")
            } else {
                format!("{secs}.{frac}Z")
            }
        }
        None => full,
    }
}

// ---------------------------------------------------------------------------
// Text values
// ---------------------------------------------------------------------------

fn write_text_value(out: &mut String, value: &Value) {
    match value {
        Value::Str(s) => push_text_str(out, s),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Uint(n) => out.push_str(&n.to_string()),
        Value::Float(f) => out.push_str(&text_float(*f)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Time(t) => out.push_str(&text_time(*t)),
        Value::Any(v) => {
            let mut s = String::new();
            write_text_any(&mut s, v);
            push_text_str(out, &s);
        }
        // Groups are flattened by the caller.
        Value::Group(_) => {}
    }
}

fn text_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "+Inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        float_str(f, -4, 6, 2)
    }
}

/// Shortest round-trip digits, switching to `d.ddde±X` notation when the
/// decimal exponent falls outside `[min_exp, max_exp)`. The exponent is
/// zero-padded to `exp_width` digits.
fn float_str(f: f64, min_exp: i32, max_exp: i32, exp_width: usize) -> String {
    if f == 0.0 {
        return f.to_string();
    }
    let sci = format!("{f:e}");
    let exp = sci
        .split_once('e')
        .and_then(|(mantissa, exp)| Some((mantissa, exp.parse::<i32>().ok()?)));
    match exp {
        Some((mantissa, exp)) if exp < min_exp || exp >= max_exp => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:0exp_width$}", exp.unsigned_abs())
        }
        _ => f.to_string(),
    }
}

/// `map[k:v ...]` for objects (keys sorted), `[a b]` for arrays, `<nil>` for null.
fn write_text_any(out: &mut String, value: &serde_json::Value) {
    match value {
        serde_json::Value::Null => out.push_str("<nil>"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => out.push_str(&n.to_string()),
        serde_json::Value::String(s) => out.push_str(s),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_text_any(out, item);
            }
            out.push(']');
        }
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push_str("map[");
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                write_text_any(out, &map[key.as_str()]);
            }
            out.push(']');
        }
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c == '=' || c == '"' || c.is_whitespace() || c.is_control())
}

fn push_text_str(out: &mut String, s: &str) {
    if !needs_quoting(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// ---------------------------------------------------------------------------
// JSON values
// ---------------------------------------------------------------------------

fn push_json_str(out: &mut String, s: &str) -> Result<()> {
    out.push_str(&serde_json::to_string(s)?);
    Ok(())
}

fn write_json_value(out: &mut String, key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Str(s) => push_json_str(out, s)?,
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Uint(n) => out.push_str(&n.to_string()),
        Value::Float(f) if !f.is_finite() => {
            return Err(Error::UnsupportedValue {
                key: key.to_string(),
                detail: format!("{} has no JSON representation", text_float(*f)),
            })
        }
        Value::Float(f) => out.push_str(&float_str(*f, -6, 21, 1)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Time(t) => {
            out.push('"');
            out.push_str(&json_time(*t));
            out.push('"');
        }
        Value::Any(v) => out.push_str(&serde_json::to_string(v)?),
        // Groups are nested by the caller.
        Value::Group(_) => {}
    }
    Ok(())
}
