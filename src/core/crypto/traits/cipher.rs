/*!
Traits for symmetric encryption and decryption.
*/

use crate::core::constants::sizes;
use crate::core::crypto::config::SymmetricAlgorithm;
use crate::core::error::Result;

/// Trait for AEAD ciphers. Keys are passed per call so that ratchet
/// message keys never outlive the operation that uses them.
pub trait SymmetricCipher: Send + Sync {
    /// Get the algorithm being used
    fn algorithm(&self) -> SymmetricAlgorithm;

    /// Encrypt and authenticate `plaintext`, binding `aad`
    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>>;

    /// Verify and decrypt. Every failure is reported as
    /// [`Error::Authentication`](crate::core::error::Error::Authentication).
    fn open(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>>;

    fn key_size(&self) -> usize {
        sizes::SYMMETRIC_KEY_SIZE
    }

    fn nonce_size(&self) -> usize {
        sizes::NONCE_SIZE
    }
}
