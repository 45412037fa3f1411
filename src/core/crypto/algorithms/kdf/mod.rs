/*!
Key derivation function implementations.
*/

mod hkdf;

use crate::core::crypto::config::KdfAlgorithm;
use crate::core::crypto::traits::kdf::KeyDerivation;

pub use self::hkdf::HkdfDerivation;

/// Create a key derivation function for the specified algorithm
pub fn create_kdf(algorithm: KdfAlgorithm) -> Box<dyn KeyDerivation> {
    Box::new(HkdfDerivation::new(algorithm))
}
