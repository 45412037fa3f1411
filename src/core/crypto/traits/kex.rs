/*!
Traits for key exchange operations.
*/

use crate::core::crypto::config::KeyExchangeAlgorithm;
use crate::core::error::Result;
use crate::core::memory::SecretBytes;

/// Trait for key encapsulation mechanisms
pub trait KeyExchange: Send + Sync {
    /// Get the current algorithm
    fn algorithm(&self) -> KeyExchangeAlgorithm;

    /// Generate a key pair, returned as `(public, secret)`
    fn generate_keypair(&self) -> Result<(Vec<u8>, SecretBytes)>;

    /// Encapsulate a fresh shared secret to `public_key`, returned as
    /// `(ciphertext, shared_secret)`
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, SecretBytes)>;

    /// Recover the shared secret from `ciphertext` with `secret_key`
    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SecretBytes>;

    /// Get the public key size for this algorithm
    fn public_key_size(&self) -> usize;

    /// Get the ciphertext size for this algorithm
    fn ciphertext_size(&self) -> usize;
}
