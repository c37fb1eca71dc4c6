//! Domain-specific assertions for serrs harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* store invariant was violated.

use serrs::{LogLevel, Store};

/// Assert the store's records carry exactly these messages, in order.
///
/// ```rust
/// assert_messages!(store, ["r1", "r2"]);
/// ```
#[macro_export]
macro_rules! assert_messages {
    ($store:expr, [$($msg:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $store.iter().map(|r| r.message()).collect();
        let expected: Vec<&str> = vec![$($msg),*];
        pretty_assertions::assert_eq!(actual, expected, "record order mismatch");
    }};
}

/// Assert that the cached highest level equals the maximum over the records.
pub fn assert_level_consistent<W>(store: &Store<W>) {
    let derived: Option<LogLevel> = store.iter().map(|r| r.level()).max();
    assert_eq!(
        store.highest_level(),
        derived,
        "highest_level() disagrees with the records it summarises ({} records)",
        store.len()
    );
}

/// Assert that `bytes` is one valid JSON array with `len` elements.
pub fn assert_json_array(bytes: &[u8], len: usize) -> serde_json::Value {
    let parsed: serde_json::Value = serde_json::from_slice(bytes).unwrap_or_else(|e| {
        panic!(
            "output is not valid JSON: {e}\n  output: {}",
            String::from_utf8_lossy(bytes)
        )
    });
    let items = parsed
        .as_array()
        .unwrap_or_else(|| panic!("output is not a JSON array: {parsed}"));
    assert_eq!(items.len(), len, "unexpected element count in {parsed}");
    parsed
}
