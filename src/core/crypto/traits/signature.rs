/*!
Traits for signature operations.
*/

use crate::core::crypto::config::SignatureAlgorithm;
use crate::core::error::Result;
use crate::core::memory::SecretBytes;

/// Trait for detached signature schemes
pub trait Signature: Send + Sync {
    /// Get the current algorithm
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Generate a key pair, returned as `(public, secret)`
    fn generate_keypair(&self) -> Result<(Vec<u8>, SecretBytes)>;

    /// Produce a detached signature over `message`
    fn sign(&self, secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>>;

    /// Check a detached signature. Malformed keys or signatures verify as false.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;

    /// Get the public key size for this algorithm
    fn public_key_size(&self) -> usize;

    /// Get the maximum signature size for this algorithm
    fn signature_size(&self) -> usize;
}
