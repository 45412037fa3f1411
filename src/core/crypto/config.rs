/*!
Cryptographic algorithm configuration for the session layer.

This module provides configuration options for selecting the primitive
set a session runs on. Both peers must use the same configuration.
*/

use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, config_err};

/// Supported Key Exchange Mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum KeyExchangeAlgorithm {
    /// CRYSTALS-Kyber KEM (Kyber768)
    #[default]
    Kyber768,
    /// CRYSTALS-Kyber KEM (Kyber512) - for resource-constrained environments
    Kyber512,
    /// CRYSTALS-Kyber KEM (Kyber1024) - highest security level
    Kyber1024,
}

impl KeyExchangeAlgorithm {
    /// Get the name of the algorithm as a string
    pub fn name(&self) -> &'static str {
        match self {
            KeyExchangeAlgorithm::Kyber768 => "CRYSTALS-Kyber-768",
            KeyExchangeAlgorithm::Kyber512 => "CRYSTALS-Kyber-512",
            KeyExchangeAlgorithm::Kyber1024 => "CRYSTALS-Kyber-1024",
        }
    }
}

/// Supported Digital Signature Algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum SignatureAlgorithm {
    /// CRYSTALS-Dilithium (dilithium3)
    #[default]
    Dilithium3,
    /// CRYSTALS-Dilithium (dilithium2) - for resource-constrained environments
    Dilithium2,
    /// CRYSTALS-Dilithium (dilithium5) - highest security level
    Dilithium5,
}

impl SignatureAlgorithm {
    /// Get the name of the algorithm as a string
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Dilithium3 => "CRYSTALS-Dilithium-3",
            SignatureAlgorithm::Dilithium2 => "CRYSTALS-Dilithium-2",
            SignatureAlgorithm::Dilithium5 => "CRYSTALS-Dilithium-5",
        }
    }
}

/// Supported Symmetric Encryption Algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum SymmetricAlgorithm {
    /// ChaCha20-Poly1305
    #[default]
    ChaCha20Poly1305,
    /// AES-256-GCM - hardware acceleration on many platforms
    Aes256Gcm,
}

impl SymmetricAlgorithm {
    /// Get the name of the algorithm as a string
    pub fn name(&self) -> &'static str {
        match self {
            SymmetricAlgorithm::ChaCha20Poly1305 => "ChaCha20-Poly1305",
            SymmetricAlgorithm::Aes256Gcm => "AES-256-GCM",
        }
    }
}

/// Supported key derivation functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum KdfAlgorithm {
    /// HKDF over SHA-256
    #[default]
    HkdfSha256,
    /// HKDF over SHA3-256
    HkdfSha3_256,
}

impl KdfAlgorithm {
    /// Get the name of the algorithm as a string
    pub fn name(&self) -> &'static str {
        match self {
            KdfAlgorithm::HkdfSha256 => "HKDF-SHA-256",
            KdfAlgorithm::HkdfSha3_256 => "HKDF-SHA3-256",
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(KeyExchangeAlgorithm, SignatureAlgorithm, SymmetricAlgorithm, KdfAlgorithm);

/// Cryptographic configuration for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct CryptoConfig {
    /// Key exchange algorithm
    pub key_exchange: KeyExchangeAlgorithm,
    /// Signature algorithm
    pub signature: SignatureAlgorithm,
    /// Symmetric encryption algorithm
    pub symmetric: SymmetricAlgorithm,
    /// Key derivation function
    pub kdf: KdfAlgorithm,
}

impl CryptoConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new configuration with specific settings
    pub fn with_algorithms(
        key_exchange: KeyExchangeAlgorithm,
        signature: SignatureAlgorithm,
        symmetric: SymmetricAlgorithm,
        kdf: KdfAlgorithm,
    ) -> Self {
        Self {
            key_exchange,
            signature,
            symmetric,
            kdf,
        }
    }

    /// Create a configuration optimized for resource-constrained environments
    pub fn lightweight() -> Self {
        Self {
            key_exchange: KeyExchangeAlgorithm::Kyber512,
            signature: SignatureAlgorithm::Dilithium2,
            symmetric: SymmetricAlgorithm::ChaCha20Poly1305,
            kdf: KdfAlgorithm::HkdfSha256,
        }
    }

    /// Create a configuration optimized for highest security
    pub fn high_security() -> Self {
        Self {
            key_exchange: KeyExchangeAlgorithm::Kyber1024,
            signature: SignatureAlgorithm::Dilithium5,
            symmetric: SymmetricAlgorithm::Aes256Gcm,
            kdf: KdfAlgorithm::HkdfSha3_256,
        }
    }

    /// Create a configuration optimized for hardware acceleration
    pub fn hardware_optimized() -> Self {
        Self {
            key_exchange: KeyExchangeAlgorithm::Kyber768,
            signature: SignatureAlgorithm::Dilithium3,
            symmetric: SymmetricAlgorithm::Aes256Gcm,
            kdf: KdfAlgorithm::HkdfSha256,
        }
    }

    /// Validate the configuration
    ///
    /// Every parameter set is compiled in, so the only rejected combination
    /// is one that pairs a higher-level KEM with a weaker signature scheme.
    pub fn validate(&self) -> Result<()> {
        if self.key_exchange == KeyExchangeAlgorithm::Kyber1024
            && self.signature == SignatureAlgorithm::Dilithium2
        {
            return config_err(format!(
                "{} must not be paired with {}",
                self.key_exchange, self.signature
            ));
        }
        Ok(())
    }
}

impl fmt::Display for CryptoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.key_exchange, self.signature, self.symmetric, self.kdf
        )
    }
}
