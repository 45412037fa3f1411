/*!
Rekey controller and key rotation policy.

Rekeying is a local KDF step: the side that rekeys draws a random salt,
mixes it into its current key material and hands the salt to the peer in
a [`RekeyToken`]. The peer applies the same derivation. No KEM round-trip
is involved, so a rekey bounds how much traffic one key protects but does
not recover from a compromise of the retained secrets.

The rotation tracker is advisory. It counts traffic since the last key
change and reports when [`KeyRotationParams`] says a rekey is due; the
protocol never rekeys on its own.
*/

use std::time::{Duration, Instant};

use rand::RngCore;

use crate::core::constants::{defaults, labels, sizes};
use crate::core::crypto::CryptoProvider;
use crate::core::error::{Result, format_err};
use crate::core::memory::SecretBytes;
use crate::core::message::RekeyToken;

/// Parameters for key rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRotationParams {
    /// How long one key may stay in use
    pub rotation_interval: Duration,

    /// Messages (sent plus received) before rotation is due
    pub max_messages: u64,

    /// Payload bytes (sent plus received) before rotation is due
    pub max_bytes: u64,
}

impl Default for KeyRotationParams {
    fn default() -> Self {
        Self {
            rotation_interval: Duration::from_secs(defaults::MAX_KEY_AGE_SECONDS),
            max_messages: defaults::MAX_MESSAGES_PER_KEY,
            max_bytes: defaults::MAX_BYTES_PER_KEY,
        }
    }
}

/// Traffic counters for the current key
#[derive(Debug, Clone)]
pub struct RotationTracker {
    last_rotation: Instant,
    messages_sent: u64,
    bytes_sent: u64,
    messages_received: u64,
    bytes_received: u64,
}

impl Default for RotationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationTracker {
    pub fn new() -> Self {
        Self {
            last_rotation: Instant::now(),
            messages_sent: 0,
            bytes_sent: 0,
            messages_received: 0,
            bytes_received: 0,
        }
    }

    /// Start counting for a new key
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn track_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub fn track_received(&mut self, bytes: usize) {
        self.messages_received += 1;
        self.bytes_received += bytes as u64;
    }

    pub fn messages(&self) -> u64 {
        self.messages_sent + self.messages_received
    }

    pub fn bytes(&self) -> u64 {
        self.bytes_sent + self.bytes_received
    }

    /// Time since the current key came into use
    pub fn key_age(&self) -> Duration {
        self.last_rotation.elapsed()
    }

    /// Whether any limit in `params` has been reached
    pub fn should_rotate(&self, params: &KeyRotationParams) -> bool {
        self.key_age() >= params.rotation_interval
            || self.messages() >= params.max_messages
            || self.bytes() >= params.max_bytes
    }
}

/// Draw a fresh rekey token
pub fn new_token() -> RekeyToken {
    let mut salt = vec![0u8; sizes::REKEY_SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);
    RekeyToken { salt }
}

/// Check that a received token carries a salt of the expected size
pub fn check_token(token: &RekeyToken) -> Result<()> {
    if token.salt.len() != sizes::REKEY_SALT_SIZE {
        return format_err(format!(
            "rekey salt must be {} bytes, got {}",
            sizes::REKEY_SALT_SIZE,
            token.salt.len()
        ));
    }
    Ok(())
}

/// Derive the key that replaces `current` after a rekey
///
/// The input keying material is `retained || current`, so replaying an old
/// token yields a key that was never used before rather than an old one.
pub fn derive_rekeyed(
    provider: &CryptoProvider,
    retained: &SecretBytes,
    current: &SecretBytes,
    salt: &[u8],
) -> Result<SecretBytes> {
    let ikm = SecretBytes::concat(&[retained.as_bytes(), current.as_bytes()]);
    provider.kdf_salted(ikm.as_bytes(), salt, labels::REKEY)
}
