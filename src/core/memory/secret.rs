/*!
Owned secret buffer that wipes itself.
*/

use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Heap buffer for key material, zeroized on drop.
///
/// Replacing a `SecretBytes` field (for example when a chain key advances)
/// drops the old value and therefore wipes it.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Take ownership of `bytes`
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Copy `bytes` into a new buffer
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Concatenate `parts` into one buffer allocated up front
    pub fn concat(parts: &[&[u8]]) -> Self {
        let mut bytes = Vec::with_capacity(parts.iter().map(|part| part.len()).sum());
        for part in parts {
            bytes.extend_from_slice(part);
        }
        Self(bytes)
    }

    /// Fill a new buffer of `len` bytes from the thread CSPRNG
    pub fn random(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Borrow the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Mutable access for in-place derivation
    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_contents() {
        let secret = SecretBytes::from_slice(&[0xAB; 4]);
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "SecretBytes([REDACTED; 4])");
        assert!(!rendered.contains("171"));
    }

    #[test]
    fn test_zeroize_clears_buffer() {
        let mut secret = SecretBytes::from_slice(&[42u8; 32]);
        secret.zeroize();
        assert!(secret.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_random_is_fresh() {
        let a = SecretBytes::random(32);
        let b = SecretBytes::random(32);
        assert_eq!(a.len(), 32);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_concat() {
        let head: &[u8] = &[1, 2];
        let tail: &[u8] = &[3];
        let joined = SecretBytes::concat(&[head, &[], tail]);
        assert_eq!(joined.as_bytes(), &[1, 2, 3]);
    }
}
