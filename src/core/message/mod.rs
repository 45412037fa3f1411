/*!
Message records exchanged between peers.

These are plain structured records with named byte fields. The
[`format`] module adds an optional binary encoding; moving the bytes
over a transport is the caller's concern.
*/

pub mod format;
pub mod types;

// Re-export commonly used items
pub use format::{MAX_FIELD_LEN, WireFormat};
pub use types::{EncryptedEnvelope, HandshakeMessage, MessageKind, RatchetHandshake, RatchetMessage, RekeyToken};
