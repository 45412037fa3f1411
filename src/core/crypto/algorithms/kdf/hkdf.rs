/*!
HKDF (RFC 5869) over SHA-256 or SHA3-256.
*/

use ::hkdf::{Hkdf, SimpleHkdf};
use sha2::Sha256;
use sha3::Sha3_256;

use crate::core::constants::labels;
use crate::core::crypto::config::KdfAlgorithm;
use crate::core::crypto::traits::kdf::KeyDerivation;
use crate::core::error::{Error, Result};
use crate::core::memory::SecretBytes;

/// HKDF implementation
#[derive(Debug, Clone, Copy)]
pub struct HkdfDerivation {
    algorithm: KdfAlgorithm,
}

impl HkdfDerivation {
    pub fn new(algorithm: KdfAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl KeyDerivation for HkdfDerivation {
    fn algorithm(&self) -> KdfAlgorithm {
        self.algorithm
    }

    fn derive(&self, ikm: &[u8], salt: Option<&[u8]>, info: &[u8], length: usize) -> Result<SecretBytes> {
        if length == 0 {
            return Err(Error::KeyDerivation);
        }
        let salt = salt.unwrap_or(labels::HKDF_SALT);
        let mut okm = SecretBytes::new(vec![0u8; length]);

        let expanded = match self.algorithm {
            KdfAlgorithm::HkdfSha256 => Hkdf::<Sha256>::new(Some(salt), ikm).expand(info, okm.as_mut_bytes()),
            KdfAlgorithm::HkdfSha3_256 => {
                SimpleHkdf::<Sha3_256>::new(Some(salt), ikm).expand(info, okm.as_mut_bytes())
            }
        };
        expanded.map_err(|_| Error::KeyDerivation)?;

        Ok(okm)
    }
}
