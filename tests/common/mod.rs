#![allow(dead_code)]

use pqc_session::{PqcSession, Result, SessionConfig, TripleRatchet};

/// Route library logs to the test harness; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run the classic handshake, returning (initiator, responder)
pub fn classic_pair(config: SessionConfig) -> Result<(PqcSession, PqcSession)> {
    let mut responder = PqcSession::with_config(config)?;
    let mut initiator = PqcSession::with_config(config)?;

    let public_key = responder.init_session()?;
    let handshake = initiator.init_session_with_peer(&public_key)?;
    responder.complete_handshake(&handshake)?;
    Ok((initiator, responder))
}

/// Run the triple ratchet handshake, returning (initiator, responder)
pub fn ratchet_pair(config: SessionConfig) -> Result<(TripleRatchet, TripleRatchet)> {
    let mut initiator = TripleRatchet::with_config(config)?;
    let mut responder = TripleRatchet::with_config(config)?;

    let handshake =
        initiator.init_triple_ratchet(responder.kem_public_key(), responder.sign_public_key())?;
    responder.complete_triple_ratchet_handshake(
        &handshake.kem_ciphertext,
        &handshake.kem_signature,
        &handshake.sign_public_key,
    )?;
    Ok((initiator, responder))
}
