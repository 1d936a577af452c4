//! Durable counter storage.
//!
//! The replay guard never touches the filesystem directly; it talks to a
//! [`CounterStore`]. Interface-first: swapping the file store for an
//! in-memory one (tests, embedding) or a database-backed one changes
//! nothing in the guard.
//!
//! # Durability contract
//!
//! A [`CounterStore::store`] call must not return until the value would
//! survive a process crash. A write that is acknowledged but lost on
//! crash re-permits a replay after restart, which voids the whole
//! guarantee. [`FileCounterStore`] meets this with write-temp + fsync +
//! rename.
//!
//! # Atomicity contract
//!
//! Store implementations are *not* required to serialize concurrent
//! callers; the replay guard holds its own lock for the full
//! read-compare-write cycle. The provided [`CounterStore::compare_and_swap`]
//! is correct only under that exclusive access.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The single persisted record: `{"nonce": <integer>}`.
///
/// `u64` deserialization rejects negative and fractional values, so a
/// tampered file can never be read back as a valid counter.
#[derive(Debug, Serialize, Deserialize)]
struct CounterRecord {
    nonce: u64,
}

/// Durable storage for the replay counter.
pub trait CounterStore: Send {
    /// Reads the current counter value.
    fn load(&mut self) -> Result<u64, StoreError>;

    /// Durably writes a new counter value.
    fn store(&mut self, value: u64) -> Result<(), StoreError>;

    /// Writes `next` iff the current value equals `expected`.
    ///
    /// Returns `Ok(true)` when the swap happened, `Ok(false)` on a value
    /// mismatch. Callers must hold exclusive access for the duration of
    /// the call; [`ReplayGuard`](crate::replay::ReplayGuard) does.
    fn compare_and_swap(&mut self, expected: u64, next: u64) -> Result<bool, StoreError> {
        if self.load()? == expected {
            self.store(next)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// File-backed counter store: one JSON record in one file.
///
/// Opening a path with no existing record durably initializes it to `0`,
/// so a fresh deployment starts expecting nonce `0` and an independent
/// process opening the same path later sees whatever was last accepted.
#[derive(Debug)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    /// Opens the store at `path`, creating it with value `0` if absent.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file or its directories cannot
    /// be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self { path };
        if !store.path.exists() {
            if let Some(parent) = store.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            store.write_record(0)?;
        }
        Ok(store)
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&self, nonce: u64) -> Result<(), StoreError> {
        // Atomic replace: the target either holds the old record or the
        // new one, never a torn write. The fsync happens before the
        // rename so an acknowledged value survives a crash.
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec(&CounterRecord { nonce })?;

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CounterStore for FileCounterStore {
    fn load(&mut self) -> Result<u64, StoreError> {
        let body = fs::read(&self.path)?;
        let record: CounterRecord = serde_json::from_slice(&body)?;
        Ok(record.nonce)
    }

    fn store(&mut self, value: u64) -> Result<(), StoreError> {
        self.write_record(value)
    }
}

/// In-process counter store for tests and non-durable embedding.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    value: u64,
}

impl MemoryCounterStore {
    /// Creates a store initialized to `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store initialized to `value`.
    #[must_use]
    pub const fn with_value(value: u64) -> Self {
        Self { value }
    }
}

impl CounterStore for MemoryCounterStore {
    fn load(&mut self) -> Result<u64, StoreError> {
        Ok(self.value)
    }

    fn store(&mut self, value: u64) -> Result<(), StoreError> {
        self.value = value;
        Ok(())
    }
}
