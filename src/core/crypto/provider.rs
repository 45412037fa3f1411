/*!
Primitive provider for the session layer.

A [`CryptoProvider`] bundles one KEM, one signature scheme, one AEAD cipher
and one KDF behind trait objects and exposes them through the narrow
byte-oriented contract the sessions consume.
*/

use std::fmt;

use crate::core::crypto::algorithms::{create_authenticator, create_cipher, create_kdf, create_key_exchange};
use crate::core::crypto::config::CryptoConfig;
use crate::core::crypto::traits::{KeyDerivation, KeyExchange, Signature, SymmetricCipher};
use crate::core::error::Result;
use crate::core::memory::SecretBytes;

/// The set of primitives a session runs on
pub struct CryptoProvider {
    kex: Box<dyn KeyExchange>,
    signature: Box<dyn Signature>,
    cipher: Box<dyn SymmetricCipher>,
    kdf: Box<dyn KeyDerivation>,
}

impl CryptoProvider {
    /// Build the provider selected by `config`
    pub fn new(config: CryptoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            kex: create_key_exchange(config.key_exchange),
            signature: create_authenticator(config.signature),
            cipher: create_cipher(config.symmetric),
            kdf: create_kdf(config.kdf),
        })
    }

    /// Assemble a provider from individual primitives
    pub fn from_parts(
        kex: Box<dyn KeyExchange>,
        signature: Box<dyn Signature>,
        cipher: Box<dyn SymmetricCipher>,
        kdf: Box<dyn KeyDerivation>,
    ) -> Self {
        Self {
            kex,
            signature,
            cipher,
            kdf,
        }
    }

    /// The algorithm selection this provider implements
    pub fn config(&self) -> CryptoConfig {
        CryptoConfig {
            key_exchange: self.kex.algorithm(),
            signature: self.signature.algorithm(),
            symmetric: self.cipher.algorithm(),
            kdf: self.kdf.algorithm(),
        }
    }

    pub fn kem_keygen(&self) -> Result<(Vec<u8>, SecretBytes)> {
        self.kex.generate_keypair()
    }

    pub fn kem_encapsulate(&self, peer_public: &[u8]) -> Result<(Vec<u8>, SecretBytes)> {
        self.kex.encapsulate(peer_public)
    }

    pub fn kem_decapsulate(&self, secret_key: &SecretBytes, ciphertext: &[u8]) -> Result<SecretBytes> {
        self.kex.decapsulate(secret_key.as_bytes(), ciphertext)
    }

    pub fn sign_keygen(&self) -> Result<(Vec<u8>, SecretBytes)> {
        self.signature.generate_keypair()
    }

    pub fn sign(&self, secret_key: &SecretBytes, message: &[u8]) -> Result<Vec<u8>> {
        self.signature.sign(secret_key.as_bytes(), message)
    }

    pub fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        self.signature.verify(public_key, message, signature)
    }

    pub fn aead_seal(&self, key: &SecretBytes, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.cipher.seal(key.as_bytes(), nonce, plaintext, aad)
    }

    pub fn aead_open(&self, key: &SecretBytes, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.cipher.open(key.as_bytes(), nonce, ciphertext, aad)
    }

    /// Derive a symmetric key of the cipher's key size
    pub fn kdf(&self, ikm: &[u8], info: &[u8]) -> Result<SecretBytes> {
        self.kdf.derive(ikm, None, info, self.cipher.key_size())
    }

    /// Derive a symmetric key of the cipher's key size under an explicit salt
    pub fn kdf_salted(&self, ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<SecretBytes> {
        self.kdf.derive(ikm, Some(salt), info, self.cipher.key_size())
    }

    pub fn kem_public_key_size(&self) -> usize {
        self.kex.public_key_size()
    }

    pub fn kem_ciphertext_size(&self) -> usize {
        self.kex.ciphertext_size()
    }

    pub fn sign_public_key_size(&self) -> usize {
        self.signature.public_key_size()
    }

    pub fn nonce_size(&self) -> usize {
        self.cipher.nonce_size()
    }
}

impl fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("config", &self.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::config::{KdfAlgorithm, SymmetricAlgorithm};

    #[test]
    fn test_provider_reports_config() {
        let config = CryptoConfig::high_security();
        let provider = CryptoProvider::new(config).unwrap();
        assert_eq!(provider.config(), config);
        assert_eq!(provider.config().symmetric, SymmetricAlgorithm::Aes256Gcm);
        assert_eq!(provider.config().kdf, KdfAlgorithm::HkdfSha3_256);
    }

    #[test]
    fn test_provider_kem_roundtrip() {
        let provider = CryptoProvider::new(CryptoConfig::default()).unwrap();
        let (pk, sk) = provider.kem_keygen().unwrap();
        let (ct, ss) = provider.kem_encapsulate(&pk).unwrap();
        let recovered = provider.kem_decapsulate(&sk, &ct).unwrap();
        assert_eq!(ss.as_bytes(), recovered.as_bytes());

        let key = provider.kdf(ss.as_bytes(), b"test").unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CryptoConfig::high_security();
        config.signature = crate::core::crypto::config::SignatureAlgorithm::Dilithium2;
        assert!(CryptoProvider::new(config).is_err());
    }
}
