//! Message authentication and replay protection for pre-shared-secret
//! uplinks.
//!
//! An untrusted sender and a verifier share one secret. Every payload
//! travels with an HMAC-SHA256 tag and a sequence nonce; this crate
//! decides whether an incoming payload is genuine and fresh. Transport
//! encoding, the HTTP layer, secret rotation, and config loading all
//! live outside; they hand this crate raw bytes and consume a boolean.
//!
//! # Design Principles
//!
//! 1. **No ambient keys**: the secret is injected and validated; there is
//!    no compiled-in fallback.
//! 2. **Interface-first**: the replay counter sits behind a
//!    [`CounterStore`] trait so the guard is testable without a real
//!    filesystem.
//! 3. **Fail-safe defaults**: malformed input and storage faults reject;
//!    nothing in the crate converts uncertainty into acceptance.
//! 4. **Timing discipline**: tag comparison walks a fixed width and never
//!    short-circuits, on length or on content.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    VerificationGate                     │
//! │   (payload, claimed tag, claimed nonce) → accept bool   │
//! │                                                         │
//! │   ┌───────────────────┐      ┌───────────────────────┐  │
//! │   │      AuthTag      │      │      ReplayGuard      │  │
//! │   │ HMAC-SHA256 + hex │ then │ strict-equality nonce │  │
//! │   │ constant-time cmp │ ───▶ │ counter, mutex-held   │  │
//! │   └───────────────────┘      └──────────┬────────────┘  │
//! │                                         │               │
//! │                              ┌──────────▼────────────┐  │
//! │                              │     CounterStore      │  │
//! │                              │ file `{"nonce": n}` / │  │
//! │                              │ in-memory             │  │
//! │                              └───────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Authenticity is checked before freshness so an unauthenticated party
//! can never drive nonce-state mutation. Both components are independent
//! and usable on their own.
//!
//! # Example
//!
//! ```
//! use uplink_guard::{AuthTag, MemoryCounterStore, ReplayGuard, SharedSecret, VerificationGate};
//!
//! let secret = SharedSecret::new(b"deployment-psk".to_vec())?;
//!
//! // Sender side: tag the payload, attach the next nonce.
//! let payload = b"meter=7,reading=42";
//! let tag = AuthTag::compute(payload, &secret).to_hex();
//!
//! // Verifier side: one boolean out.
//! let gate = VerificationGate::new(
//!     secret,
//!     ReplayGuard::new(MemoryCounterStore::new()),
//! );
//! assert!(gate.verify(payload, &tag, "0"));
//! assert!(!gate.verify(payload, &tag, "0")); // replay rejected
//! # Ok::<(), uplink_guard::ConfigError>(())
//! ```

pub mod auth;
pub mod error;
pub mod gate;
pub mod replay;
pub mod secret;
pub mod store;

pub use auth::{AuthTag, TAG_HEX_LEN, TAG_SIZE};
pub use error::{ConfigError, RejectReason, StoreError};
pub use gate::VerificationGate;
pub use replay::ReplayGuard;
pub use secret::SharedSecret;
pub use store::{CounterStore, FileCounterStore, MemoryCounterStore};
