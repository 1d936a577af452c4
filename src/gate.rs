//! The verification call boundary.
//!
//! The transport layer hands this module a raw payload, the tag the
//! sender claimed, and the nonce the sender claimed, and gets back a
//! single boolean. No partial-success states leak out; the reject-reason
//! taxonomy exists only for logs.
//!
//! # Check ordering
//!
//! Authenticity first, then freshness. Either order would be correct,
//! but verifying the tag before touching the replay guard means an
//! unauthenticated party can never drive nonce-state mutation, not even
//! a failed compare against the durable store.

use crate::auth::AuthTag;
use crate::error::RejectReason;
use crate::replay::ReplayGuard;
use crate::secret::SharedSecret;
use crate::store::CounterStore;

/// Accept/reject boundary combining the authenticator and replay guard.
///
/// # Example
///
/// ```
/// use uplink_guard::{AuthTag, MemoryCounterStore, ReplayGuard, SharedSecret, VerificationGate};
///
/// let secret = SharedSecret::new(b"psk".to_vec())?;
/// let tag = AuthTag::compute(b"reading=42", &secret).to_hex();
/// let gate = VerificationGate::new(secret, ReplayGuard::new(MemoryCounterStore::new()));
///
/// assert!(gate.verify(b"reading=42", &tag, "0"));
/// assert!(!gate.verify(b"reading=42", &tag, "0")); // replay
/// # Ok::<(), uplink_guard::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct VerificationGate<S: CounterStore> {
    secret: SharedSecret,
    replay: ReplayGuard<S>,
}

impl<S: CounterStore> VerificationGate<S> {
    /// Builds a gate from a validated secret and a replay guard.
    pub const fn new(secret: SharedSecret, replay: ReplayGuard<S>) -> Self {
        Self { secret, replay }
    }

    /// Verifies a received payload.
    ///
    /// Returns `true` iff the claimed tag matches the payload under the
    /// shared secret AND the claimed nonce is the next expected value.
    /// Everything else — forged tag, malformed nonce text, replayed or
    /// out-of-order nonce, storage fault — returns `false`.
    pub fn verify(&self, payload: &[u8], claimed_tag: &str, claimed_nonce: &str) -> bool {
        match self.check(payload, claimed_tag, claimed_nonce) {
            Ok(nonce) => {
                tracing::debug!(nonce, "payload accepted");
                true
            }
            Err(reason) if reason.is_store_fault() => {
                tracing::error!(reason = %reason, "payload rejected fail-closed");
                false
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "payload rejected");
                false
            }
        }
    }

    /// Gives administrative access to the replay guard (counter reset
    /// during provisioning). Never exposed to the verification path.
    pub const fn replay_guard(&self) -> &ReplayGuard<S> {
        &self.replay
    }

    fn check(
        &self,
        payload: &[u8],
        claimed_tag: &str,
        claimed_nonce: &str,
    ) -> Result<u64, RejectReason> {
        let expected = AuthTag::compute(payload, &self.secret);
        if !expected.matches(claimed_tag) {
            return Err(RejectReason::TagMismatch);
        }

        // Only authenticated senders get this far; the nonce text still
        // counts as untrusted (non-numeric or negative input rejects
        // without touching the counter).
        let nonce: u64 = claimed_nonce
            .parse()
            .map_err(|_| RejectReason::MalformedNonce)?;

        if self.replay.try_advance(nonce)? {
            Ok(nonce)
        } else {
            Err(RejectReason::NonceMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCounterStore;

    fn gate_with(secret_bytes: &[u8]) -> VerificationGate<MemoryCounterStore> {
        let secret = SharedSecret::new(secret_bytes.to_vec()).unwrap();
        VerificationGate::new(secret, ReplayGuard::new(MemoryCounterStore::new()))
    }

    fn tag_for(payload: &[u8], secret_bytes: &[u8]) -> String {
        let secret = SharedSecret::new(secret_bytes.to_vec()).unwrap();
        AuthTag::compute(payload, &secret).to_hex()
    }

    #[test]
    fn accepts_genuine_fresh_payload() {
        let gate = gate_with(b"psk");
        assert!(gate.verify(b"payload", &tag_for(b"payload", b"psk"), "0"));
    }

    #[test]
    fn bad_tag_does_not_consume_the_nonce() {
        let gate = gate_with(b"psk");
        assert!(!gate.verify(b"payload", &tag_for(b"payload", b"other-psk"), "0"));

        // The failed attempt must not have advanced the counter.
        assert!(gate.verify(b"payload", &tag_for(b"payload", b"psk"), "0"));
    }

    #[test]
    fn malformed_nonce_text_rejects_without_advancing() {
        let gate = gate_with(b"psk");
        let tag = tag_for(b"payload", b"psk");

        assert!(!gate.verify(b"payload", &tag, "not-a-number"));
        assert!(!gate.verify(b"payload", &tag, "-1"));
        assert!(!gate.verify(b"payload", &tag, "1.5"));
        assert!(!gate.verify(b"payload", &tag, ""));

        assert!(gate.verify(b"payload", &tag, "0"));
    }

    #[test]
    fn tampered_payload_rejects() {
        let gate = gate_with(b"psk");
        let tag = tag_for(b"reading=42", b"psk");
        assert!(!gate.verify(b"reading=43", &tag, "0"));
    }

    #[test]
    fn reset_through_admin_surface() {
        let gate = gate_with(b"psk");
        gate.replay_guard().reset(9).unwrap();
        assert!(gate.verify(b"p", &tag_for(b"p", b"psk"), "9"));
    }
}
