/*!
Session configuration.
*/

use crate::core::constants::defaults;
use crate::core::crypto::CryptoConfig;
use crate::core::error::{Result, config_err};
use crate::core::session::rekey::KeyRotationParams;

/// Configuration shared by classic sessions and triple ratchets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Primitive selection; both peers must agree
    pub crypto: CryptoConfig,

    /// Sign the classic handshake ciphertext and require a signature on it
    pub authenticated_handshake: bool,

    /// How far past the next expected message number a ratchet may derive
    pub max_skip: u64,

    /// Advisory rekey policy
    pub rotation: KeyRotationParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            crypto: CryptoConfig::default(),
            authenticated_handshake: false,
            max_skip: defaults::MAX_SKIP,
            rotation: KeyRotationParams::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crypto(mut self, crypto: CryptoConfig) -> Self {
        self.crypto = crypto;
        self
    }

    pub fn with_authenticated_handshake(mut self, enabled: bool) -> Self {
        self.authenticated_handshake = enabled;
        self
    }

    pub fn with_max_skip(mut self, max_skip: u64) -> Self {
        self.max_skip = max_skip;
        self
    }

    pub fn with_rotation(mut self, rotation: KeyRotationParams) -> Self {
        self.rotation = rotation;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.crypto.validate()?;
        if self.rotation.max_messages == 0 || self.rotation.max_bytes == 0 {
            return config_err("rotation limits must be non-zero");
        }
        Ok(())
    }
}
