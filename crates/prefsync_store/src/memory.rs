//! In-memory settings store for testing and ephemeral use.

use crate::error::{StoreError, StoreResult};
use crate::store::{RecordInfo, SettingsFile, StoreConfig, StoreProvider, MAX_KEY_LEN};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
struct Record {
    value: Vec<u8>,
    last_modified: u64,
    dirty: bool,
}

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<Vec<u8>, Record>,
}

impl State {
    fn used_space(&self) -> usize {
        self.records
            .iter()
            .map(|(k, r)| k.len() + r.value.len())
            .sum()
    }
}

/// An in-memory settings store.
///
/// Suitable for unit tests, integration tests, and ephemeral settings
/// that do not need to survive a restart. Record state is shared across
/// all handles opened from the same store.
///
/// For exercising failure paths, the store counts `open` calls and can
/// inject open failures (see [`set_open_failure`](Self::set_open_failure)).
///
/// # Example
///
/// ```rust
/// use prefsync_store::{MemoryStore, SettingsFile, StoreConfig, StoreProvider};
///
/// let store = MemoryStore::new(StoreConfig::default());
/// let mut file = store.open().unwrap();
/// file.set(b"textStyle\0", &[2]).unwrap();
/// assert!(file.exists(b"textStyle\0"));
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    config: StoreConfig,
    state: Arc<RwLock<State>>,
    opens: AtomicU64,
    fail_opens: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(State::default())),
            opens: AtomicU64::new(0),
            fail_opens: AtomicBool::new(false),
        }
    }

    /// Returns how many times the store has been opened.
    ///
    /// Useful for asserting that rejected operations never touch the
    /// store.
    pub fn open_count(&self) -> u64 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Makes subsequent `open` calls fail when `fail` is true.
    pub fn set_open_failure(&self, fail: bool) {
        self.fail_opens.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of all live records as key/value pairs.
    ///
    /// Useful for asserting that store contents are unchanged.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.state
            .read()
            .records
            .iter()
            .map(|(k, r)| (k.clone(), r.value.clone()))
            .collect()
    }
}

impl StoreProvider for MemoryStore {
    type File = MemoryFile;

    fn open(&self) -> StoreResult<MemoryFile> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_opens.load(Ordering::SeqCst) {
            return Err(StoreError::OpenFailed(format!(
                "{}: injected open failure",
                self.config.name
            )));
        }
        Ok(MemoryFile {
            state: Arc::clone(&self.state),
            max_space: self.config.max_space,
        })
    }
}

/// An open handle onto a [`MemoryStore`].
///
/// Dropping the handle closes the store; state lives in the provider.
#[derive(Debug)]
pub struct MemoryFile {
    state: Arc<RwLock<State>>,
    max_space: usize,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SettingsFile for MemoryFile {
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(StoreError::KeyTooLong {
                len: key.len(),
                max: MAX_KEY_LEN,
            });
        }

        let mut state = self.state.write();
        let replaced = state
            .records
            .get(key)
            .map(|r| key.len() + r.value.len())
            .unwrap_or(0);
        let used = state.used_space() - replaced;
        let needed = key.len() + value.len();
        if used + needed > self.max_space {
            return Err(StoreError::OutOfSpace {
                needed,
                available: self.max_space.saturating_sub(used),
            });
        }

        state.records.insert(
            key.to_vec(),
            Record {
                value: value.to_vec(),
                last_modified: unix_now(),
                dirty: true,
            },
        );
        Ok(())
    }

    fn get_len(&self, key: &[u8]) -> StoreResult<usize> {
        self.state
            .read()
            .records
            .get(key)
            .map(|r| r.value.len())
            .ok_or(StoreError::DoesNotExist)
    }

    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        self.state
            .read()
            .records
            .get(key)
            .map(|r| r.value.clone())
            .ok_or(StoreError::DoesNotExist)
    }

    fn exists(&self, key: &[u8]) -> bool {
        self.state.read().records.contains_key(key)
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        self.state
            .write()
            .records
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::DoesNotExist)
    }

    fn mark_synced(&mut self, key: &[u8]) -> StoreResult<()> {
        let mut state = self.state.write();
        let record = state.records.get_mut(key).ok_or(StoreError::DoesNotExist)?;
        record.dirty = false;
        Ok(())
    }

    fn for_each(&self, visitor: &mut dyn FnMut(RecordInfo<'_>) -> bool) {
        let state = self.state.read();
        for (key, record) in &state.records {
            let keep_going = visitor(RecordInfo {
                key,
                last_modified: record.last_modified,
                dirty: record.dirty,
            });
            if !keep_going {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(StoreConfig::default())
    }

    #[test]
    fn set_get_roundtrip() {
        let store = store();
        let mut file = store.open().unwrap();
        file.set(b"clock24h\0", &[1]).unwrap();

        assert_eq!(file.get(b"clock24h\0").unwrap(), vec![1]);
        assert_eq!(file.get_len(b"clock24h\0").unwrap(), 1);
        assert!(file.exists(b"clock24h\0"));
    }

    #[test]
    fn set_marks_dirty_and_mark_synced_clears() {
        let store = store();
        let mut file = store.open().unwrap();
        file.set(b"watchface\0", b"chalk").unwrap();

        let mut dirty = None;
        file.for_each(&mut |info| {
            dirty = Some(info.dirty);
            true
        });
        assert_eq!(dirty, Some(true));

        file.mark_synced(b"watchface\0").unwrap();
        let mut dirty = None;
        file.for_each(&mut |info| {
            dirty = Some(info.dirty);
            true
        });
        assert_eq!(dirty, Some(false));
    }

    #[test]
    fn overwrite_after_mark_synced_dirties_again() {
        let store = store();
        let mut file = store.open().unwrap();
        file.set(b"lightIntensity\0", &[50]).unwrap();
        file.mark_synced(b"lightIntensity\0").unwrap();
        file.set(b"lightIntensity\0", &[75]).unwrap();

        let mut dirty = None;
        file.for_each(&mut |info| {
            dirty = Some(info.dirty);
            true
        });
        assert_eq!(dirty, Some(true));
    }

    #[test]
    fn missing_records_error() {
        let store = store();
        let mut file = store.open().unwrap();

        assert_eq!(file.get(b"nope\0"), Err(StoreError::DoesNotExist));
        assert_eq!(file.get_len(b"nope\0"), Err(StoreError::DoesNotExist));
        assert_eq!(file.delete(b"nope\0"), Err(StoreError::DoesNotExist));
        assert_eq!(file.mark_synced(b"nope\0"), Err(StoreError::DoesNotExist));
        assert!(!file.exists(b"nope\0"));
    }

    #[test]
    fn key_length_is_bounded() {
        let store = store();
        let mut file = store.open().unwrap();
        let long_key = vec![b'k'; MAX_KEY_LEN + 1];

        assert_eq!(
            file.set(&long_key, &[0]),
            Err(StoreError::KeyTooLong {
                len: MAX_KEY_LEN + 1,
                max: MAX_KEY_LEN,
            })
        );
    }

    #[test]
    fn space_budget_is_enforced() {
        let store = MemoryStore::new(StoreConfig::new("tiny", 16));
        let mut file = store.open().unwrap();
        file.set(b"a", &[0; 8]).unwrap();

        let err = file.set(b"b", &[0; 32]).unwrap_err();
        assert!(matches!(err, StoreError::OutOfSpace { .. }));

        // Overwriting within budget reclaims the old value's space.
        file.set(b"a", &[0; 12]).unwrap();
    }

    #[test]
    fn open_counter_and_injected_failure() {
        let store = store();
        assert_eq!(store.open_count(), 0);
        store.open().unwrap();
        assert_eq!(store.open_count(), 1);

        store.set_open_failure(true);
        let err = store.open().unwrap_err();
        assert!(matches!(err, StoreError::OpenFailed(_)));
        // Failed opens still count as attempts.
        assert_eq!(store.open_count(), 2);

        store.set_open_failure(false);
        store.open().unwrap();
    }

    #[test]
    fn for_each_stops_when_visitor_returns_false() {
        let store = store();
        let mut file = store.open().unwrap();
        file.set(b"a\0", &[1]).unwrap();
        file.set(b"b\0", &[2]).unwrap();
        file.set(b"c\0", &[3]).unwrap();

        let mut seen = 0;
        file.for_each(&mut |_| {
            seen += 1;
            false
        });
        assert_eq!(seen, 1);
    }

    #[test]
    fn snapshot_reflects_contents() {
        let store = store();
        let mut file = store.open().unwrap();
        file.set(b"qlUp\0", &[7]).unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get(b"qlUp\0".as_slice()), Some(&vec![7]));
    }
}
