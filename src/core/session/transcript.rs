//! Signed transcripts.

use crate::core::constants::labels;

/// Bytes signed over a handshake KEM ciphertext
pub(crate) fn handshake(kem_ciphertext: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(labels::HANDSHAKE_SIGNATURE.len() + kem_ciphertext.len());
    out.extend_from_slice(labels::HANDSHAKE_SIGNATURE);
    out.extend_from_slice(kem_ciphertext);
    out
}

/// Bytes signed over one ratchet message
///
/// Layout: label, msg_num (u64 BE), nonce length (u32 BE), nonce, ciphertext.
pub(crate) fn message(msg_num: u64, nonce: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(labels::MESSAGE_SIGNATURE.len() + 12 + nonce.len() + ciphertext.len());
    out.extend_from_slice(labels::MESSAGE_SIGNATURE);
    out.extend_from_slice(&msg_num.to_be_bytes());
    out.extend_from_slice(&(nonce.len() as u32).to_be_bytes());
    out.extend_from_slice(nonce);
    out.extend_from_slice(ciphertext);
    out
}
