/*!
Constants for the PQC session layer.

This module contains the wire format version, key and nonce sizes, KDF
domain labels and configuration defaults.
*/

/// Wire format version
pub const VERSION: u8 = 0x01;

/// Size constants for the protocol
pub mod sizes {
    /// Size of every symmetric key (session, chain and message keys)
    pub const SYMMETRIC_KEY_SIZE: usize = 32;

    /// Size of the AEAD nonce for both supported ciphers
    pub const NONCE_SIZE: usize = 12;

    /// Size of the AEAD authentication tag for both supported ciphers
    pub const TAG_SIZE: usize = 16;

    /// Size of the random salt carried by a rekey token
    pub const REKEY_SALT_SIZE: usize = 32;

    /// Size of the diagnostic session identifier
    pub const SESSION_ID_SIZE: usize = 16;

    /// Classic channel nonce layout
    pub mod nonce {
        /// Offset of the sender role tag
        pub const ROLE_OFFSET: usize = 0;

        /// Start of the per-key big-endian message counter
        pub const COUNTER_OFFSET: usize = 1;

        /// Width of the counter in bytes
        pub const COUNTER_BYTES: usize = 7;

        /// Start of the random suffix
        pub const RANDOM_OFFSET: usize = COUNTER_OFFSET + COUNTER_BYTES;

        /// Largest counter value that still fits in the nonce
        pub const COUNTER_MAX: u64 = (1u64 << (COUNTER_BYTES * 8)) - 1;
    }
}

/// HKDF salts and info labels
pub mod labels {
    /// Salt used for every derivation that has no dedicated salt
    pub const HKDF_SALT: &[u8] = b"PQC-Session-v1-Key-Derivation";

    /// Session key of the classic channel
    pub const SESSION_KEY: &[u8] = b"pqc-session/session-key";

    /// Session key after a rekey
    pub const REKEY: &[u8] = b"pqc-session/rekey";

    /// Triple ratchet root key
    pub const RATCHET_ROOT: &[u8] = b"pqc-session/ratchet-root";

    /// Chain carrying initiator-to-responder traffic
    pub const CHAIN_INITIATOR: &[u8] = b"pqc-session/chain/initiator";

    /// Chain carrying responder-to-initiator traffic
    pub const CHAIN_RESPONDER: &[u8] = b"pqc-session/chain/responder";

    /// Per-message key from a chain key
    pub const MESSAGE_KEY: &[u8] = b"pqc-session/message-key";

    /// Next chain key from a chain key
    pub const CHAIN_STEP: &[u8] = b"pqc-session/chain-step";

    /// Domain prefix of the handshake signature transcript
    pub const HANDSHAKE_SIGNATURE: &[u8] = b"pqc-session/handshake-sig";

    /// Domain prefix of the per-message signature transcript
    pub const MESSAGE_SIGNATURE: &[u8] = b"pqc-session/message-sig";
}

/// Configuration defaults
pub mod defaults {
    /// How far ahead of the receive chain a message number may be
    pub const MAX_SKIP: u64 = 1000;

    /// Default maximum key age in seconds
    pub const MAX_KEY_AGE_SECONDS: u64 = 86400; // 24 hours

    /// Default maximum messages per key
    pub const MAX_MESSAGES_PER_KEY: u64 = 1_000_000;

    /// Default maximum bytes per key
    pub const MAX_BYTES_PER_KEY: u64 = 1_000_000_000; // 1 GB
}
