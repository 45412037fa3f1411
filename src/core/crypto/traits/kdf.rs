/*!
Traits for key derivation.
*/

use crate::core::crypto::config::KdfAlgorithm;
use crate::core::error::Result;
use crate::core::memory::SecretBytes;

/// Trait for key derivation functions
pub trait KeyDerivation: Send + Sync {
    /// Get the current algorithm
    fn algorithm(&self) -> KdfAlgorithm;

    /// Derive `length` bytes from `ikm` under `info`. A `None` salt selects
    /// the protocol-wide default salt.
    fn derive(&self, ikm: &[u8], salt: Option<&[u8]>, info: &[u8], length: usize) -> Result<SecretBytes>;
}
