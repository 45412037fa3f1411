/*!
ChaCha20-Poly1305 symmetric encryption implementation.
*/

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::core::constants::sizes;
use crate::core::crypto::config::SymmetricAlgorithm;
use crate::core::crypto::traits::cipher::SymmetricCipher;
use crate::core::error::{Error, Result, format_err};

/// ChaCha20-Poly1305 cipher implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaCha20Poly1305Cipher;

impl SymmetricCipher for ChaCha20Poly1305Cipher {
    fn algorithm(&self) -> SymmetricAlgorithm {
        SymmetricAlgorithm::ChaCha20Poly1305
    }

    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != sizes::NONCE_SIZE {
            return format_err(format!("nonce must be {} bytes", sizes::NONCE_SIZE));
        }
        let cipher = ChaCha20Poly1305::new_from_slice(key)
            .map_err(|_| Error::InvalidFormat("ChaCha20-Poly1305 key must be 32 bytes".into()))?;

        cipher
            .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
            .map_err(|_| Error::InvalidFormat("ChaCha20-Poly1305 encryption failed".into()))
    }

    fn open(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != sizes::NONCE_SIZE {
            return Err(Error::Authentication);
        }
        let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| Error::Authentication)?;

        cipher
            .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map_err(|_| Error::Authentication)
    }
}
