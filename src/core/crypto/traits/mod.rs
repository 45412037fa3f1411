/*!
Core traits for cryptographic operations.

These are the narrow interfaces the session layer talks to. Every method
takes and returns opaque byte sequences of algorithm-defined lengths, so
an alternative primitive set can be plugged in through
[`CryptoProvider::from_parts`](crate::core::crypto::CryptoProvider::from_parts).
*/

pub mod cipher;
pub mod kdf;
pub mod kex;
pub mod signature;

// Re-export core traits for easier access
pub use cipher::SymmetricCipher;
pub use kdf::KeyDerivation;
pub use kex::KeyExchange;
pub use signature::Signature;
