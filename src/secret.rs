//! Pre-shared secret handling.
//!
//! The secret is the only long-lived key material in the crate. Design
//! principles, in order:
//!
//! 1. **No ambient keys**: the secret must be explicitly provided; nothing
//!    in this crate conjures one from a compiled-in default.
//! 2. **Validated at construction**: an absent or empty secret is a
//!    [`ConfigError`] and must keep the service from starting.
//! 3. **Never logged**: the `Debug` impl redacts; the raw bytes are only
//!    reachable from the tag computation.

use crate::error::ConfigError;
use core::fmt;

/// The pre-shared secret keying all authentication tags.
///
/// Exactly one value exists per deployment; rotation is handled outside
/// this crate. The secret lives for the process lifetime and is borrowed
/// by every tag computation.
///
/// # Example
///
/// ```
/// use uplink_guard::SharedSecret;
///
/// let secret = SharedSecret::new(b"correct horse battery staple".to_vec())?;
/// assert!(SharedSecret::new(Vec::new()).is_err());
/// # Ok::<(), uplink_guard::ConfigError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret {
    bytes: Vec<u8>,
}

impl SharedSecret {
    /// Creates a secret from raw bytes, rejecting empty input.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecret`] if `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self { bytes })
    }

    /// Reads the secret from an environment variable.
    ///
    /// This is the only environment touchpoint in the crate. There is no
    /// fallback value: a missing or empty variable is a startup failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if `var` is unset or not
    /// valid Unicode, and [`ConfigError::EmptySecret`] if it is set but
    /// empty.
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        let value =
            std::env::var(var).map_err(|_| ConfigError::MissingSecret(var.to_string()))?;
        Self::new(value.into_bytes())
    }

    /// Returns the raw key bytes for tag computation.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Length only; key material never reaches any formatter.
        write!(f, "SharedSecret({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_rejected() {
        assert!(matches!(
            SharedSecret::new(Vec::new()),
            Err(ConfigError::EmptySecret)
        ));
    }

    #[test]
    fn missing_env_var_rejected() {
        let err = SharedSecret::from_env("UPLINK_GUARD_TEST_UNSET_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(_)));
    }

    #[test]
    fn debug_redacts_material() {
        let secret = SharedSecret::new(b"hunter2".to_vec()).unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("7 bytes"));
    }
}
