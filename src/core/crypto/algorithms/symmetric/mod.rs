/*!
Symmetric encryption algorithm implementations.
*/

mod aes_gcm;
mod chacha20poly1305;

use crate::core::crypto::config::SymmetricAlgorithm;
use crate::core::crypto::traits::cipher::SymmetricCipher;

pub use aes_gcm::Aes256GcmCipher;
pub use chacha20poly1305::ChaCha20Poly1305Cipher;

/// Create a cipher for the specified algorithm
pub fn create_cipher(algorithm: SymmetricAlgorithm) -> Box<dyn SymmetricCipher> {
    match algorithm {
        SymmetricAlgorithm::ChaCha20Poly1305 => Box::new(ChaCha20Poly1305Cipher),
        SymmetricAlgorithm::Aes256Gcm => Box::new(Aes256GcmCipher),
    }
}
