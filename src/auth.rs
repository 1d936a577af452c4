//! Payload authentication tags.
//!
//! Tags are HMAC-SHA256 MACs over the exact payload bytes, rendered as
//! 64-character lowercase hex for the wire. They guarantee integrity and
//! authenticity of a payload against anyone not holding the shared secret.
//!
//! # Timing discipline
//!
//! [`AuthTag::matches`] is constant-time with respect to both content and
//! length: the comparison always walks the full tag width and folds a
//! length-mismatch flag into the accumulator instead of exiting early.
//! An attacker probing with candidate tags learns nothing from the
//! response time about where a candidate first diverges, nor whether its
//! length is right.
//!
//! # Totality
//!
//! `matches` never panics. Empty input, non-hex bytes, and over-long
//! input all compare unequal; malformed input is adversarial signal, not
//! a programming bug.

use crate::secret::SharedSecret;
use core::fmt;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;

/// Size of a raw authentication tag in bytes (SHA-256 output).
pub const TAG_SIZE: usize = 32;

/// Length of a tag in its hex wire form.
pub const TAG_HEX_LEN: usize = 2 * TAG_SIZE;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A keyed authentication tag over a payload.
///
/// Deterministic: the same `(payload, secret)` pair always produces the
/// same tag. Tags are never derived from replay-counter state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthTag {
    bytes: [u8; TAG_SIZE],
}

impl AuthTag {
    /// Computes the tag for `payload` under `secret`.
    ///
    /// Pure function of its inputs; no side effects.
    #[must_use]
    pub fn compute(payload: &[u8], secret: &SharedSecret) -> Self {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload);
        let digest = mac.finalize().into_bytes();

        let mut bytes = [0u8; TAG_SIZE];
        bytes.copy_from_slice(&digest);
        Self { bytes }
    }

    /// Checks a received tag string against this tag in constant time.
    ///
    /// Returns `true` iff `received` is exactly the 64-character
    /// lowercase-hex rendering of this tag. The comparison visits all
    /// [`TAG_HEX_LEN`] positions regardless of where (or whether) the
    /// inputs differ; a length mismatch is folded into the accumulator
    /// rather than short-circuiting.
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        let expected = self.hex_bytes();
        let received = received.as_bytes();

        // Accumulate all evidence of inequality; decide once at the end.
        let mut diff = received.len() ^ TAG_HEX_LEN;
        for (i, &e) in expected.iter().enumerate() {
            let r = received.get(i).copied().unwrap_or(0);
            diff |= usize::from(r ^ e);
        }
        diff == 0
    }

    /// Returns the tag in its hex wire form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.hex_bytes().iter().map(|&b| char::from(b)).collect()
    }

    /// Returns the raw tag bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.bytes
    }

    fn hex_bytes(&self) -> [u8; TAG_HEX_LEN] {
        let mut out = [0u8; TAG_HEX_LEN];
        for (i, &b) in self.bytes.iter().enumerate() {
            out[2 * i] = HEX_DIGITS[usize::from(b >> 4)];
            out[2 * i + 1] = HEX_DIGITS[usize::from(b & 0x0f)];
        }
        out
    }
}

impl fmt::Debug for AuthTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix for log correlation; never the full tag.
        write!(f, "AuthTag({:02x}{:02x}..)", self.bytes[0], self.bytes[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secret(bytes: &[u8]) -> SharedSecret {
        SharedSecret::new(bytes.to_vec()).unwrap()
    }

    #[test]
    fn compute_is_deterministic() {
        let key = secret(b"k1");
        let a = AuthTag::compute(b"payload", &key);
        let b = AuthTag::compute(b"payload", &key);
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn known_answer() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog"),
        // RFC 2104 / common test vector.
        let key = secret(b"key");
        let tag = AuthTag::compute(b"The quick brown fox jumps over the lazy dog", &key);
        assert_eq!(
            tag.to_hex(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn hex_form_is_lowercase_and_fixed_length() {
        let tag = AuthTag::compute(b"x", &secret(b"k"));
        let hex = tag.to_hex();
        assert_eq!(hex.len(), TAG_HEX_LEN);
        assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn matches_accepts_own_hex() {
        let tag = AuthTag::compute(b"payload", &secret(b"k"));
        assert!(tag.matches(&tag.to_hex()));
    }

    #[test]
    fn matches_rejects_any_single_position_flip() {
        let tag = AuthTag::compute(b"payload", &secret(b"k"));
        let hex = tag.to_hex();
        for i in 0..hex.len() {
            let mut forged = hex.clone().into_bytes();
            forged[i] = if forged[i] == b'0' { b'1' } else { b'0' };
            assert!(!tag.matches(std::str::from_utf8(&forged).unwrap()));
        }
    }

    #[test]
    fn matches_is_total_over_malformed_input() {
        let tag = AuthTag::compute(b"payload", &secret(b"k"));
        assert!(!tag.matches(""));
        assert!(!tag.matches("deadbeef"));
        assert!(!tag.matches(&"f".repeat(TAG_HEX_LEN + 1)));
        assert!(!tag.matches(&"zz".repeat(TAG_SIZE)));
        assert!(!tag.matches("payload with spaces and \u{1F512} emoji"));
    }

    #[test]
    fn uppercase_hex_is_not_accepted() {
        let tag = AuthTag::compute(b"payload", &secret(b"k"));
        let upper = tag.to_hex().to_uppercase();
        assert_ne!(upper, tag.to_hex(), "vector must contain a letter");
        assert!(!tag.matches(&upper));
    }

    proptest! {
        #[test]
        fn deterministic_over_arbitrary_payloads(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
            let key = secret(b"prop-key");
            prop_assert_eq!(
                AuthTag::compute(&payload, &key),
                AuthTag::compute(&payload, &key)
            );
        }

        #[test]
        fn distinct_secrets_disagree(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
            let t1 = AuthTag::compute(&payload, &secret(b"key-one"));
            let t2 = AuthTag::compute(&payload, &secret(b"key-two"));
            prop_assert!(!t1.matches(&t2.to_hex()));
        }

        #[test]
        fn matches_never_panics(input in ".*") {
            let tag = AuthTag::compute(b"payload", &secret(b"k"));
            let _ = tag.matches(&input);
        }
    }
}
