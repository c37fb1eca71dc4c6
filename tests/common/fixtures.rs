//! Fixed inputs and their exact expected renderings.
//!
//! The expected lines are the contract: text lines carry millisecond
//! timestamps with `Z`, JSON lines carry trimmed RFC 3339 timestamps, and
//! `Any` maps render as `map[k:v]` in text.

use chrono::{DateTime, TimeZone, Utc};
use serrs::{Attr, KeyCase, LogLevel};

pub const SAMPLE_LEVELS: [LogLevel; 4] = [
    LogLevel::Debug,
    LogLevel::Info,
    LogLevel::Warn,
    LogLevel::Error,
];

/// 2000-01-02T03:04:05Z.
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 2, 3, 4, 5).unwrap()
}

/// `a = n, m = {"b": 2}`.
pub fn sample_attrs(n: i64) -> Vec<Attr> {
    vec![
        Attr::new("a", n),
        Attr::new("m", serde_json::json!({ "b": 2 })),
    ]
}

/// Expected text lines (no trailing newline) for [`sample_store`](super::sample_store).
pub fn expected_text(key_case: KeyCase) -> Vec<String> {
    SAMPLE_LEVELS
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let line = format!(
                "time=2000-01-02T03:04:05.000Z level={level} msg=m a={} m=map[b:2]",
                i + 1
            );
            match key_case {
                KeyCase::Upper => line
                    .replace("time=", "TIME=")
                    .replace(" level=", " LEVEL=")
                    .replace(" msg=", " MSG=")
                    .replace(" a=", " A=")
                    .replace(" m=", " M="),
                _ => line,
            }
        })
        .collect()
}

/// Expected JSON objects (no trailing newline) for [`sample_store`](super::sample_store).
pub fn expected_json(key_case: KeyCase) -> Vec<String> {
    let k = |key: &str| key_case.apply(key).into_owned();
    SAMPLE_LEVELS
        .iter()
        .enumerate()
        .map(|(i, level)| {
            format!(
                r#"{{"{}":"2000-01-02T03:04:05Z","{}":"{level}","{}":"m","{}":{},"{}":{{"b":2}}}}"#,
                k("time"),
                k("level"),
                k("msg"),
                k("a"),
                i + 1,
                k("m"),
            )
        })
        .collect()
}
