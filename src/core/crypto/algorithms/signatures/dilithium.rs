/*!
CRYSTALS-Dilithium signature implementation.

This module provides detached Dilithium signatures for the 2, 3 and 5
parameter sets.
*/

use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_traits::sign::{DetachedSignature, PublicKey, SecretKey};

use crate::core::crypto::config::SignatureAlgorithm;
use crate::core::crypto::traits::signature::Signature;
use crate::core::error::{Error, Result};
use crate::core::memory::SecretBytes;

/// Dilithium signature implementation
#[derive(Debug, Clone, Copy)]
pub struct DilithiumAuthenticator {
    algorithm: SignatureAlgorithm,
}

impl DilithiumAuthenticator {
    /// Create a new DilithiumAuthenticator with the specified parameter set
    pub fn new(algorithm: SignatureAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl Signature for DilithiumAuthenticator {
    fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    fn generate_keypair(&self) -> Result<(Vec<u8>, SecretBytes)> {
        let (pk, sk) = match self.algorithm {
            SignatureAlgorithm::Dilithium2 => {
                let (pk, sk) = dilithium2::keypair();
                (pk.as_bytes().to_vec(), SecretBytes::from_slice(sk.as_bytes()))
            }
            SignatureAlgorithm::Dilithium3 => {
                let (pk, sk) = dilithium3::keypair();
                (pk.as_bytes().to_vec(), SecretBytes::from_slice(sk.as_bytes()))
            }
            SignatureAlgorithm::Dilithium5 => {
                let (pk, sk) = dilithium5::keypair();
                (pk.as_bytes().to_vec(), SecretBytes::from_slice(sk.as_bytes()))
            }
        };

        if pk.len() != self.public_key_size() || sk.is_empty() {
            return Err(Error::KeyGeneration);
        }
        Ok((pk, sk))
    }

    fn sign(&self, secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        let bad_key = |_| Error::InvalidFormat(format!("malformed {} signing key", self.algorithm));

        let signature = match self.algorithm {
            SignatureAlgorithm::Dilithium2 => {
                let sk = dilithium2::SecretKey::from_bytes(secret_key).map_err(bad_key)?;
                dilithium2::detached_sign(message, &sk).as_bytes().to_vec()
            }
            SignatureAlgorithm::Dilithium3 => {
                let sk = dilithium3::SecretKey::from_bytes(secret_key).map_err(bad_key)?;
                dilithium3::detached_sign(message, &sk).as_bytes().to_vec()
            }
            SignatureAlgorithm::Dilithium5 => {
                let sk = dilithium5::SecretKey::from_bytes(secret_key).map_err(bad_key)?;
                dilithium5::detached_sign(message, &sk).as_bytes().to_vec()
            }
        };
        Ok(signature)
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        match self.algorithm {
            SignatureAlgorithm::Dilithium2 => {
                let (Ok(pk), Ok(sig)) = (
                    dilithium2::PublicKey::from_bytes(public_key),
                    dilithium2::DetachedSignature::from_bytes(signature),
                ) else {
                    return false;
                };
                dilithium2::verify_detached_signature(&sig, message, &pk).is_ok()
            }
            SignatureAlgorithm::Dilithium3 => {
                let (Ok(pk), Ok(sig)) = (
                    dilithium3::PublicKey::from_bytes(public_key),
                    dilithium3::DetachedSignature::from_bytes(signature),
                ) else {
                    return false;
                };
                dilithium3::verify_detached_signature(&sig, message, &pk).is_ok()
            }
            SignatureAlgorithm::Dilithium5 => {
                let (Ok(pk), Ok(sig)) = (
                    dilithium5::PublicKey::from_bytes(public_key),
                    dilithium5::DetachedSignature::from_bytes(signature),
                ) else {
                    return false;
                };
                dilithium5::verify_detached_signature(&sig, message, &pk).is_ok()
            }
        }
    }

    fn public_key_size(&self) -> usize {
        match self.algorithm {
            SignatureAlgorithm::Dilithium2 => dilithium2::public_key_bytes(),
            SignatureAlgorithm::Dilithium3 => dilithium3::public_key_bytes(),
            SignatureAlgorithm::Dilithium5 => dilithium5::public_key_bytes(),
        }
    }

    fn signature_size(&self) -> usize {
        match self.algorithm {
            SignatureAlgorithm::Dilithium2 => dilithium2::signature_bytes(),
            SignatureAlgorithm::Dilithium3 => dilithium3::signature_bytes(),
            SignatureAlgorithm::Dilithium5 => dilithium5::signature_bytes(),
        }
    }
}
