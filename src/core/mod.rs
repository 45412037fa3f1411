//! Core components for the PQC session layer.
//!
//! This module contains the fundamental building blocks: the primitive
//! provider, secret memory handling, message records, sessions, and error
//! handling.

// Export cryptographic functionality
pub mod crypto;

// Export message records and their encoding
pub mod message;

// Export session management
pub mod session;

// Export memory handling for sensitive data
pub mod memory;

// Per-operation counters
pub mod stats;

// Protocol constants
pub mod constants;

// Error handling
pub mod error;

// Re-exports for convenience
pub use self::constants::VERSION;
pub use self::error::{Error, Result};
pub use self::session::{PqcSession, Role, SessionPhase, TripleRatchet};
