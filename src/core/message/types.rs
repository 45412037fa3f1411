/*!
Message types for the session layer.
*/

use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Record kinds, as tagged on the wire
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Classic handshake message
    Handshake = 0x01,
    /// Classic AEAD envelope
    Envelope = 0x02,
    /// Triple ratchet handshake
    RatchetHandshake = 0x03,
    /// Triple ratchet message
    RatchetMessage = 0x04,
    /// Rekey token
    Rekey = 0x05,
}

impl MessageKind {
    /// Convert a u8 value to a MessageKind
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(MessageKind::Handshake),
            0x02 => Some(MessageKind::Envelope),
            0x03 => Some(MessageKind::RatchetHandshake),
            0x04 => Some(MessageKind::RatchetMessage),
            0x05 => Some(MessageKind::Rekey),
            _ => None,
        }
    }

    /// Get the u8 value of this MessageKind
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Handshake => "Handshake",
            MessageKind::Envelope => "Envelope",
            MessageKind::RatchetHandshake => "RatchetHandshake",
            MessageKind::RatchetMessage => "RatchetMessage",
            MessageKind::Rekey => "Rekey",
        };
        f.write_str(name)
    }
}

/// Initiator-to-responder handshake of the classic channel.
///
/// `signature` and `signer_public_key` are present only when the
/// initiator runs an authenticated handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct HandshakeMessage {
    /// KEM encapsulation ciphertext
    pub ciphertext: Vec<u8>,
    /// Signature over the ciphertext
    pub signature: Option<Vec<u8>>,
    /// Signing public key of the initiator
    pub signer_public_key: Option<Vec<u8>>,
}

impl HandshakeMessage {
    /// Unsigned handshake carrying only the encapsulation ciphertext
    pub fn new(ciphertext: Vec<u8>) -> Self {
        Self {
            ciphertext,
            signature: None,
            signer_public_key: None,
        }
    }

    /// Attach an initiator signature and the key that verifies it
    pub fn with_signature(mut self, signature: Vec<u8>, signer_public_key: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self.signer_public_key = Some(signer_public_key);
        self
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

impl From<Vec<u8>> for HandshakeMessage {
    fn from(ciphertext: Vec<u8>) -> Self {
        Self::new(ciphertext)
    }
}

/// Self-contained encrypted payload.
///
/// The classic channel fills only `ciphertext` and `nonce`; the triple
/// ratchet fills every field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct EncryptedEnvelope {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub signature: Option<Vec<u8>>,
    pub msg_num: Option<u64>,
    pub signer_public_key: Option<Vec<u8>>,
}

impl EncryptedEnvelope {
    pub fn new(ciphertext: Vec<u8>, nonce: Vec<u8>) -> Self {
        Self {
            ciphertext,
            nonce,
            signature: None,
            msg_num: None,
            signer_public_key: None,
        }
    }
}

/// Triple ratchet initiation, sent by the initiator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct RatchetHandshake {
    /// KEM ciphertext encapsulated to the responder's KEM key
    pub kem_ciphertext: Vec<u8>,
    /// Initiator signature over the KEM ciphertext
    pub kem_signature: Vec<u8>,
    /// Initiator signing public key
    pub sign_public_key: Vec<u8>,
}

/// One triple ratchet message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct RatchetMessage {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    /// Sender signature over (msg_num, nonce, ciphertext)
    pub signature: Vec<u8>,
    /// Position of this message in the sender's chain
    pub msg_num: u64,
    /// Sender signing public key
    pub sign_public_key: Vec<u8>,
}

impl From<RatchetMessage> for EncryptedEnvelope {
    fn from(message: RatchetMessage) -> Self {
        Self {
            ciphertext: message.ciphertext,
            nonce: message.nonce,
            signature: Some(message.signature),
            msg_num: Some(message.msg_num),
            signer_public_key: Some(message.sign_public_key),
        }
    }
}

impl TryFrom<EncryptedEnvelope> for RatchetMessage {
    type Error = Error;

    fn try_from(envelope: EncryptedEnvelope) -> Result<Self> {
        match (envelope.signature, envelope.msg_num, envelope.signer_public_key) {
            (Some(signature), Some(msg_num), Some(sign_public_key)) => Ok(Self {
                ciphertext: envelope.ciphertext,
                nonce: envelope.nonce,
                signature,
                msg_num,
                sign_public_key,
            }),
            _ => Err(Error::InvalidFormat(
                "envelope lacks signature, message number or signer key".into(),
            )),
        }
    }
}

/// Salt announcing a KDF-only rekey to the peer
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct RekeyToken {
    pub salt: Vec<u8>,
}

impl fmt::Debug for RekeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RekeyToken")
            .field("salt_len", &self.salt.len())
            .finish()
    }
}
