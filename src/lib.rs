/*!
# PQC Session

A post-quantum secure-channel session layer built on NIST's post-quantum
cryptography algorithms.

## Overview

This library establishes a KEM-based shared secret between two peers and
protects traffic with it:

- CRYSTALS-Kyber for key encapsulation
- CRYSTALS-Dilithium for digital signatures
- ChaCha20-Poly1305 or AES-256-GCM for authenticated encryption
- HKDF over SHA-256 or SHA3-256 for key derivation
- A classic single-key channel ([`PqcSession`]) with explicit rekeying
- A triple ratchet ([`TripleRatchet`]) that signs every message and derives
  a fresh key per message for forward secrecy

## Security Features

- Secret material lives in [`SecretBytes`], which is wiped on drop
- Every operation is atomic: a failed call leaves the session unchanged
- Authentication failures never reveal which input was corrupted

Sessions are single-owner and synchronous. Transport framing is the
caller's concern; [`WireFormat`] gives the records a binary encoding.
*/

// Core protocol components
pub mod core;

// Re-export commonly used types for convenience
pub use core::constants::{VERSION, sizes};
pub use core::error::{Error, Result};
pub use core::memory::SecretBytes;
pub use core::message::{
    EncryptedEnvelope, HandshakeMessage, MAX_FIELD_LEN, MessageKind, RatchetHandshake, RatchetMessage,
    RekeyToken, WireFormat,
};
pub use core::session::{
    KeyRotationParams, PqcSession, RatchetPhase, Role, SessionConfig, SessionPhase, TripleRatchet,
};
pub use core::stats::{OperationKind, OperationStats, PerformanceStats};

// Re-export crypto configuration and the primitive provider
pub use core::crypto::{
    CryptoConfig, CryptoProvider, KdfAlgorithm, KeyExchangeAlgorithm, SignatureAlgorithm,
    SymmetricAlgorithm,
};
