/*!
Session phases and endpoint roles.
*/

use std::fmt;

/// Phase of a classic session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No key material yet
    Uninitiated,
    /// Local KEM keypair published, waiting for the initiator's ciphertext
    AwaitingPeer,
    /// Session key derived, ready for data transfer
    Established,
    /// Secrets wiped
    Closed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Uninitiated => write!(f, "Uninitiated"),
            SessionPhase::AwaitingPeer => write!(f, "AwaitingPeer"),
            SessionPhase::Established => write!(f, "Established"),
            SessionPhase::Closed => write!(f, "Closed"),
        }
    }
}

/// Phase of a triple ratchet session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatchetPhase {
    /// Keys generated, no handshake yet
    Uninitiated,
    /// Initiator has sent its handshake; sending is allowed, the first
    /// authenticated message from the responder completes the handshake
    AwaitingResponderAck,
    /// Both chains confirmed
    Established,
    /// Secrets wiped
    Closed,
}

impl RatchetPhase {
    /// Whether chain keys exist in this phase
    pub fn has_chains(&self) -> bool {
        matches!(self, RatchetPhase::AwaitingResponderAck | RatchetPhase::Established)
    }
}

impl fmt::Display for RatchetPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatchetPhase::Uninitiated => write!(f, "Uninitiated"),
            RatchetPhase::AwaitingResponderAck => write!(f, "AwaitingResponderAck"),
            RatchetPhase::Established => write!(f, "Established"),
            RatchetPhase::Closed => write!(f, "Closed"),
        }
    }
}

/// Endpoint role in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Encapsulates to the peer's published key
    Initiator,
    /// Publishes a KEM key and decapsulates
    Responder,
}

impl Role {
    /// Role held by the other endpoint
    pub fn peer(&self) -> Role {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }

    /// Tag byte placed in classic channel nonces
    pub(crate) fn nonce_tag(&self) -> u8 {
        match self {
            Role::Initiator => 0x01,
            Role::Responder => 0x02,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => write!(f, "Initiator"),
            Role::Responder => write!(f, "Responder"),
        }
    }
}
