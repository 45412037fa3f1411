/*!
Cryptographic components for the session layer.

This module provides the primitive provider used by the sessions:
key encapsulation, digital signatures, authenticated encryption and
key derivation, each selectable through [`CryptoConfig`].
*/

// Algorithm configuration
pub mod config;

// Primitive interfaces
pub mod traits;

// Concrete algorithm implementations
pub mod algorithms;

// Bundled primitive set
pub mod provider;

pub use config::{CryptoConfig, KdfAlgorithm, KeyExchangeAlgorithm, SignatureAlgorithm, SymmetricAlgorithm};
pub use provider::CryptoProvider;
pub use traits::{KeyDerivation, KeyExchange, Signature, SymmetricCipher};
