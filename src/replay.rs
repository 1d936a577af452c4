//! Replay protection via a persisted monotonic nonce counter.
//!
//! The guard accepts a received nonce only when it exactly equals the
//! next expected value, then advances the counter by one. Strict
//! equality, no tolerance window: accepting any forward range would let
//! an attacker who captured one valid message replay it several times
//! within the window. Exactly-once, in-order consumption is the
//! strongest property a single counter can enforce.
//!
//! # Critical section
//!
//! `verify_and_advance` is a check-then-act sequence over shared durable
//! state. Two callers that both read the same expected value would both
//! be told "accept", so the guard holds a mutex across the read, the
//! comparison, and the durable write. The write completes before the
//! outcome is returned; a crash can lose a rejection but never an
//! acceptance.
//!
//! # Fail-closed
//!
//! If the counter cannot be read or written, the request is rejected.
//! Accepting traffic while the replay state is unknown would void the
//! anti-replay guarantee. Storage faults stay distinguishable from
//! mismatches in diagnostics.

use crate::error::StoreError;
use crate::store::{CounterStore, FileCounterStore};
use parking_lot::Mutex;
use std::path::PathBuf;

/// Guard enforcing exactly-once, in-order nonce consumption.
///
/// Generic over the backing [`CounterStore`]; production deployments use
/// [`FileCounterStore`], tests usually a
/// [`MemoryCounterStore`](crate::store::MemoryCounterStore).
#[derive(Debug)]
pub struct ReplayGuard<S: CounterStore> {
    store: Mutex<S>,
}

impl ReplayGuard<FileCounterStore> {
    /// Opens a file-backed guard, initializing the counter file to `0`
    /// if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the counter file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(FileCounterStore::open(path)?))
    }
}

impl<S: CounterStore> ReplayGuard<S> {
    /// Wraps a counter store in a guard.
    pub const fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Verifies `received` against the expected counter and advances on
    /// success.
    ///
    /// Returns `true` iff `received` equals the persisted counter; the
    /// counter is then durably advanced by one before this returns. Any
    /// other value, and any storage fault, returns `false` with the
    /// counter unchanged.
    pub fn verify_and_advance(&self, received: u64) -> bool {
        match self.try_advance(received) {
            Ok(true) => {
                tracing::debug!(nonce = received, "nonce verified and advanced");
                true
            }
            Ok(false) => {
                tracing::warn!(nonce = received, "nonce mismatch, rejecting");
                false
            }
            Err(err) => {
                tracing::error!(error = %err, "counter store failure, rejecting fail-closed");
                false
            }
        }
    }

    /// The fallible core of [`verify_and_advance`](Self::verify_and_advance),
    /// keeping storage faults distinguishable from mismatches.
    pub(crate) fn try_advance(&self, received: u64) -> Result<bool, StoreError> {
        // The counter saturates the u64 space before it can wrap; treat
        // the unreachable overflow as a plain mismatch rather than
        // panicking on the hot path.
        let Some(next) = received.checked_add(1) else {
            return Ok(false);
        };

        // Read, compare, and durable write are indivisible relative to
        // other callers for the lifetime of this lock.
        let mut store = self.store.lock();
        store.compare_and_swap(received, next)
    }

    /// Administrative counter reset. Not part of the verification path;
    /// must never be reachable from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the new value cannot be persisted.
    pub fn reset(&self, value: u64) -> Result<(), StoreError> {
        tracing::info!(value, "replay counter reset");
        self.store.lock().store(value)
    }

    /// Reads the next expected nonce (operational introspection).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the counter cannot be read.
    pub fn current(&self) -> Result<u64, StoreError> {
        self.store.lock().load()
    }
}
