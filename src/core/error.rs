/*!
Error handling for the PQC session layer.

Errors are terminal for the call that raised them, never for the session:
every operation either fully succeeds or leaves all state untouched.
Variants that sit on an authentication path carry no detail about which
input was at fault.
*/

use std::fmt;
use thiserror::Error;

/// Result type for the PQC session layer
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the PQC session layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operation is not valid in the current phase
    #[error("Session not in correct state: expected {expected}, but was {actual}")]
    InvalidState {
        expected: String,
        actual: String,
    },

    /// External key material has the wrong length or format
    #[error("Invalid peer key: {0}")]
    InvalidPeerKey(String),

    /// The primitive provider could not produce a keypair
    #[error("Key generation failed")]
    KeyGeneration,

    /// The KEM ciphertext could not be decapsulated
    #[error("Key decapsulation failed")]
    Decapsulation,

    /// AEAD tag verification failed
    #[error("Authentication failed")]
    Authentication,

    /// Signature was forged, corrupted or made with an unexpected key
    #[error("Signature verification failed")]
    SignatureVerification,

    /// Message number at or below the last consumed one
    #[error("Replayed message number {msg_num} (next expected {next_expected})")]
    Replay {
        msg_num: u64,
        next_expected: u64,
    },

    /// Message number too far ahead of the receive chain
    #[error("Message number {msg_num} skips past the limit of {max_skip} from {next_expected}")]
    MessageGap {
        msg_num: u64,
        next_expected: u64,
        max_skip: u64,
    },

    /// Key derivation failed
    #[error("Key derivation failed")]
    KeyDerivation,

    /// The nonce counter for the current key is exhausted; rekey first
    #[error("Nonce space exhausted for current key")]
    NonceExhausted,

    /// Invalid message format
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    /// Unsupported wire format version
    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Build an `InvalidState` error from anything displayable
    pub fn invalid_state(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Error::InvalidState {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether this error came from an integrity check (AEAD tag or signature)
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Error::Authentication | Error::SignatureVerification)
    }
}

/// Convert a phase mismatch into an Error::InvalidState
pub fn state_err<T>(expected: impl fmt::Display, actual: impl fmt::Display) -> Result<T> {
    Err(Error::invalid_state(expected, actual))
}

/// Convert a string to an Error::InvalidFormat
pub fn format_err<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::InvalidFormat(msg.into()))
}

/// Convert a string to an Error::InvalidPeerKey
pub fn peer_key_err<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::InvalidPeerKey(msg.into()))
}

/// Convert a string to an Error::InvalidConfig
pub fn config_err<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::InvalidConfig(msg.into()))
}
