//! Error taxonomy for verification and counter persistence.
//!
//! Three families, with different blast radii:
//!
//! - [`ConfigError`] is fatal and surfaces at startup, before any traffic
//!   is accepted. A process without a usable shared secret must refuse to
//!   serve rather than fall back to a default.
//! - [`StoreError`] is a per-request storage fault. The replay guard fails
//!   closed on it: the request is rejected, but the fault is kept distinct
//!   from a genuine mismatch so operators can tell an attack from a broken
//!   disk.
//! - [`RejectReason`] is the diagnostic classification of a rejected
//!   verification. It never crosses the call boundary; untrusted callers
//!   see only a boolean.
//!
//! No variant ever carries payload bytes, tag material, or the secret.

use thiserror::Error;

/// Fatal configuration error raised while constructing a [`SharedSecret`].
///
/// [`SharedSecret`]: crate::secret::SharedSecret
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment variable holding the shared secret is not set.
    #[error("shared secret variable `{0}` is not set")]
    MissingSecret(String),
    /// The shared secret value is present but empty.
    #[error("shared secret is empty")]
    EmptySecret,
}

/// Failure reading or writing the durable nonce counter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("counter store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted record does not parse as `{"nonce": <integer>}`.
    ///
    /// Negative and non-integer values land here: `u64` deserialization
    /// rejects them, so a corrupted or tampered record can never be read
    /// back as a valid counter.
    #[error("counter record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Why a verification attempt was rejected. Diagnostics only.
#[derive(Debug, Error)]
pub enum RejectReason {
    /// The claimed tag does not match the tag computed over the payload.
    #[error("authentication tag mismatch")]
    TagMismatch,
    /// The claimed nonce is not a well-formed non-negative integer.
    #[error("malformed nonce")]
    MalformedNonce,
    /// The claimed nonce is not the next expected value (replay or
    /// out-of-order delivery).
    #[error("nonce mismatch")]
    NonceMismatch,
    /// The counter store failed; the request was rejected fail-closed.
    #[error("counter store failure: {0}")]
    Store(#[from] StoreError),
}

impl RejectReason {
    /// Returns `true` if this rejection is a storage fault rather than a
    /// security rejection.
    #[must_use]
    pub const fn is_store_fault(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
