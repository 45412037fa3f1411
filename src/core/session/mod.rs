/*!
Session management for the PQC session layer.

This module provides the classic single-key session ([`PqcSession`]), the
per-message ratcheted channel ([`TripleRatchet`]) and the rekey controller
shared by both.
*/

// Session configuration
pub mod config;

// Phases and roles
pub mod state;

// Classic session: handshake and AEAD channel
pub mod session;

// Triple ratchet engine
pub mod ratchet;

// Rekey controller and rotation policy
pub mod rekey;

// Signed transcripts
mod transcript;

pub use self::config::SessionConfig;
pub use self::ratchet::TripleRatchet;
pub use self::rekey::{KeyRotationParams, RotationTracker};
pub use self::session::PqcSession;
pub use self::state::{RatchetPhase, Role, SessionPhase};
