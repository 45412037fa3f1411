/*!
AES-256-GCM symmetric encryption implementation.
*/

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::core::constants::sizes;
use crate::core::crypto::config::SymmetricAlgorithm;
use crate::core::crypto::traits::cipher::SymmetricCipher;
use crate::core::error::{Error, Result, format_err};

/// AES-256-GCM cipher implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl SymmetricCipher for Aes256GcmCipher {
    fn algorithm(&self) -> SymmetricAlgorithm {
        SymmetricAlgorithm::Aes256Gcm
    }

    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != sizes::NONCE_SIZE {
            return format_err(format!("nonce must be {} bytes", sizes::NONCE_SIZE));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| Error::InvalidFormat("AES-256-GCM key must be 32 bytes".into()))?;

        cipher
            .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
            .map_err(|_| Error::InvalidFormat("AES-256-GCM encryption failed".into()))
    }

    fn open(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != sizes::NONCE_SIZE {
            return Err(Error::Authentication);
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::Authentication)?;

        cipher
            .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map_err(|_| Error::Authentication)
    }
}
