/*!
CRYSTALS-Kyber key exchange implementation.

Supports the 512, 768 and 1024 parameter sets. Kyber decapsulation uses
implicit rejection: a well-formed but tampered ciphertext yields an
unrelated shared secret instead of an error, which surfaces later as an
AEAD authentication failure.
*/

use pqcrypto_kyber::{kyber512, kyber768, kyber1024};
use pqcrypto_traits::kem::{Ciphertext, PublicKey, SecretKey, SharedSecret};

use crate::core::crypto::config::KeyExchangeAlgorithm;
use crate::core::crypto::traits::kex::KeyExchange;
use crate::core::error::{Error, Result, peer_key_err};
use crate::core::memory::SecretBytes;

/// Kyber key exchange implementation
#[derive(Debug, Clone, Copy)]
pub struct KyberKeyExchange {
    algorithm: KeyExchangeAlgorithm,
}

impl KyberKeyExchange {
    /// Create a new KyberKeyExchange with the specified parameter set
    pub fn new(algorithm: KeyExchangeAlgorithm) -> Self {
        Self { algorithm }
    }

    fn check_public_key(&self, public_key: &[u8]) -> Result<()> {
        let expected = self.public_key_size();
        if public_key.len() != expected {
            return peer_key_err(format!(
                "{} public key must be {} bytes, got {}",
                self.algorithm,
                expected,
                public_key.len()
            ));
        }
        Ok(())
    }
}

impl KeyExchange for KyberKeyExchange {
    fn algorithm(&self) -> KeyExchangeAlgorithm {
        self.algorithm
    }

    fn generate_keypair(&self) -> Result<(Vec<u8>, SecretBytes)> {
        let (pk, sk) = match self.algorithm {
            KeyExchangeAlgorithm::Kyber512 => {
                let (pk, sk) = kyber512::keypair();
                (pk.as_bytes().to_vec(), SecretBytes::from_slice(sk.as_bytes()))
            }
            KeyExchangeAlgorithm::Kyber768 => {
                let (pk, sk) = kyber768::keypair();
                (pk.as_bytes().to_vec(), SecretBytes::from_slice(sk.as_bytes()))
            }
            KeyExchangeAlgorithm::Kyber1024 => {
                let (pk, sk) = kyber1024::keypair();
                (pk.as_bytes().to_vec(), SecretBytes::from_slice(sk.as_bytes()))
            }
        };

        if pk.len() != self.public_key_size() || sk.is_empty() {
            return Err(Error::KeyGeneration);
        }
        Ok((pk, sk))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<(Vec<u8>, SecretBytes)> {
        self.check_public_key(public_key)?;
        let bad_key = |_| Error::InvalidPeerKey(format!("malformed {} public key", self.algorithm));

        let (ct, ss) = match self.algorithm {
            KeyExchangeAlgorithm::Kyber512 => {
                let pk = kyber512::PublicKey::from_bytes(public_key).map_err(bad_key)?;
                let (ss, ct) = kyber512::encapsulate(&pk);
                (ct.as_bytes().to_vec(), SecretBytes::from_slice(ss.as_bytes()))
            }
            KeyExchangeAlgorithm::Kyber768 => {
                let pk = kyber768::PublicKey::from_bytes(public_key).map_err(bad_key)?;
                let (ss, ct) = kyber768::encapsulate(&pk);
                (ct.as_bytes().to_vec(), SecretBytes::from_slice(ss.as_bytes()))
            }
            KeyExchangeAlgorithm::Kyber1024 => {
                let pk = kyber1024::PublicKey::from_bytes(public_key).map_err(bad_key)?;
                let (ss, ct) = kyber1024::encapsulate(&pk);
                (ct.as_bytes().to_vec(), SecretBytes::from_slice(ss.as_bytes()))
            }
        };
        Ok((ct, ss))
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SecretBytes> {
        if ciphertext.len() != self.ciphertext_size() {
            return Err(Error::Decapsulation);
        }

        let ss = match self.algorithm {
            KeyExchangeAlgorithm::Kyber512 => {
                let ct = kyber512::Ciphertext::from_bytes(ciphertext).map_err(|_| Error::Decapsulation)?;
                let sk = kyber512::SecretKey::from_bytes(secret_key).map_err(|_| Error::Decapsulation)?;
                SecretBytes::from_slice(kyber512::decapsulate(&ct, &sk).as_bytes())
            }
            KeyExchangeAlgorithm::Kyber768 => {
                let ct = kyber768::Ciphertext::from_bytes(ciphertext).map_err(|_| Error::Decapsulation)?;
                let sk = kyber768::SecretKey::from_bytes(secret_key).map_err(|_| Error::Decapsulation)?;
                SecretBytes::from_slice(kyber768::decapsulate(&ct, &sk).as_bytes())
            }
            KeyExchangeAlgorithm::Kyber1024 => {
                let ct = kyber1024::Ciphertext::from_bytes(ciphertext).map_err(|_| Error::Decapsulation)?;
                let sk = kyber1024::SecretKey::from_bytes(secret_key).map_err(|_| Error::Decapsulation)?;
                SecretBytes::from_slice(kyber1024::decapsulate(&ct, &sk).as_bytes())
            }
        };
        Ok(ss)
    }

    fn public_key_size(&self) -> usize {
        match self.algorithm {
            KeyExchangeAlgorithm::Kyber512 => kyber512::public_key_bytes(),
            KeyExchangeAlgorithm::Kyber768 => kyber768::public_key_bytes(),
            KeyExchangeAlgorithm::Kyber1024 => kyber1024::public_key_bytes(),
        }
    }

    fn ciphertext_size(&self) -> usize {
        match self.algorithm {
            KeyExchangeAlgorithm::Kyber512 => kyber512::ciphertext_bytes(),
            KeyExchangeAlgorithm::Kyber768 => kyber768::ciphertext_bytes(),
            KeyExchangeAlgorithm::Kyber1024 => kyber1024::ciphertext_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kyber_key_exchange_all_parameter_sets() {
        for algorithm in [
            KeyExchangeAlgorithm::Kyber512,
            KeyExchangeAlgorithm::Kyber768,
            KeyExchangeAlgorithm::Kyber1024,
        ] {
            let kex = KyberKeyExchange::new(algorithm);
            let (pk, sk) = kex.generate_keypair().unwrap();
            assert_eq!(pk.len(), kex.public_key_size());

            let (ct, encap_secret) = kex.encapsulate(&pk).unwrap();
            assert_eq!(ct.len(), kex.ciphertext_size());

            let decap_secret = kex.decapsulate(sk.as_bytes(), &ct).unwrap();
            assert_eq!(encap_secret.as_bytes(), decap_secret.as_bytes());
        }
    }

    #[test]
    fn test_wrong_length_public_key() {
        let kex = KyberKeyExchange::new(KeyExchangeAlgorithm::Kyber768);
        let err = kex.encapsulate(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, Error::InvalidPeerKey(_)));
    }

    #[test]
    fn test_public_key_from_other_parameter_set() {
        let small = KyberKeyExchange::new(KeyExchangeAlgorithm::Kyber512);
        let (pk, _) = small.generate_keypair().unwrap();

        let kex = KyberKeyExchange::new(KeyExchangeAlgorithm::Kyber1024);
        assert!(matches!(kex.encapsulate(&pk), Err(Error::InvalidPeerKey(_))));
    }

    #[test]
    fn test_truncated_ciphertext() {
        let kex = KyberKeyExchange::new(KeyExchangeAlgorithm::Kyber768);
        let (pk, sk) = kex.generate_keypair().unwrap();
        let (ct, _) = kex.encapsulate(&pk).unwrap();

        let err = kex.decapsulate(sk.as_bytes(), &ct[..ct.len() - 1]).unwrap_err();
        assert_eq!(err, Error::Decapsulation);
    }

    #[test]
    fn test_tampered_ciphertext_gives_different_secret() {
        let kex = KyberKeyExchange::new(KeyExchangeAlgorithm::Kyber768);
        let (pk, sk) = kex.generate_keypair().unwrap();
        let (mut ct, ss) = kex.encapsulate(&pk).unwrap();
        ct[0] ^= 0x01;

        let recovered = kex.decapsulate(sk.as_bytes(), &ct).unwrap();
        assert_ne!(ss.as_bytes(), recovered.as_bytes());
    }
}
