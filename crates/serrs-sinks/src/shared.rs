//! Clonable in-memory sink.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-memory writer whose clones all append to the same buffer.
///
/// Hand one clone to a store and keep another to read what was forwarded.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a Vec<u8> half-written in a
    // way that matters here, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serrs_core::{Attr, RenderConfig, Store};
    use std::io::Write;

    #[test]
    fn clones_share_one_buffer() {
        let buf = SharedBuffer::new();
        let mut writer = buf.clone();
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"def").unwrap();
        assert_eq!(buf.contents(), b"abcdef");
        assert_eq!(buf.len(), 6);

        buf.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn captures_store_forwarding() {
        let t = chrono::Utc.with_ymd_and_hms(2000, 1, 2, 3, 4, 5).unwrap();
        let buf = SharedBuffer::new();
        let mut store = Store::with_sink(buf.clone(), RenderConfig::text());
        store.warn(t, "slow", vec![Attr::new("ms", 1200)]);

        store.flush().unwrap();
        assert_eq!(
            buf.to_string_lossy(),
            "time=2000-01-02T03:04:05.000Z level=WARN msg=slow ms=1200\n"
        );
        assert_eq!(buf.to_string_lossy(), store.render_all().unwrap());
    }
}
