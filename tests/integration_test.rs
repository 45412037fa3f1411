mod common;

use common::{classic_pair, init_tracing};
use pqc_session::{
    CryptoConfig, EncryptedEnvelope, Error, HandshakeMessage, OperationKind, PqcSession, Result,
    Role, SessionConfig, SessionPhase, WireFormat,
};

#[test]
fn test_full_session_flow() -> Result<()> {
    init_tracing();
    let (mut initiator, mut responder) = classic_pair(SessionConfig::default())?;
    assert_eq!(initiator.role(), Some(Role::Initiator));
    assert_eq!(responder.role(), Some(Role::Responder));

    for test_size in [0, 1, 100, 1000, 10000, 65536] {
        let test_data = vec![0x42u8; test_size];

        let envelope = initiator.encrypt(&test_data, b"")?;
        let decrypted = responder.decrypt(&envelope.ciphertext, &envelope.nonce, b"")?;
        assert_eq!(test_data, decrypted, "Data integrity failed for size {}", test_size);

        let envelope = responder.encrypt(&test_data, b"")?;
        let decrypted = initiator.decrypt_envelope(&envelope, b"")?;
        assert_eq!(test_data, decrypted, "Data integrity failed for size {}", test_size);
    }

    assert_eq!(initiator.stats().count(OperationKind::Encrypt), 6);
    assert_eq!(responder.stats().count(OperationKind::Decrypt), 6);
    Ok(())
}

#[test]
fn test_context_info_scenario() -> Result<()> {
    let (mut initiator, mut responder) = classic_pair(SessionConfig::default())?;

    let envelope = initiator.encrypt(b"Test message", b"context-info")?;
    let plaintext = responder.decrypt(&envelope.ciphertext, &envelope.nonce, b"context-info")?;
    assert_eq!(plaintext, b"Test message");

    let wrong = responder.decrypt(&envelope.ciphertext, &envelope.nonce, b"other-context");
    assert_eq!(wrong.unwrap_err(), Error::Authentication);
    Ok(())
}

#[test]
fn test_single_byte_tampering() -> Result<()> {
    let (mut initiator, mut responder) = classic_pair(SessionConfig::default())?;
    let envelope = initiator.encrypt(b"integrity matters", b"aad")?;

    for i in 0..envelope.ciphertext.len() {
        let mut ciphertext = envelope.ciphertext.clone();
        ciphertext[i] ^= 0x01;
        let result = responder.decrypt(&ciphertext, &envelope.nonce, b"aad");
        assert_eq!(result.unwrap_err(), Error::Authentication, "ciphertext byte {}", i);
    }

    for i in 0..envelope.nonce.len() {
        let mut nonce = envelope.nonce.clone();
        nonce[i] ^= 0x80;
        let result = responder.decrypt(&envelope.ciphertext, &nonce, b"aad");
        assert_eq!(result.unwrap_err(), Error::Authentication, "nonce byte {}", i);
    }

    // the session is still usable after rejected input
    assert_eq!(
        responder.decrypt(&envelope.ciphertext, &envelope.nonce, b"aad")?,
        b"integrity matters"
    );
    Ok(())
}

#[test]
fn test_encrypt_before_handshake() -> Result<()> {
    let mut session = PqcSession::new()?;
    let err = session.encrypt(b"too early", b"").unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert_eq!(session.phase(), SessionPhase::Uninitiated);
    assert_eq!(session.role(), None);
    assert_eq!(session.session_id(), None);

    session.init_session()?;
    let err = session.encrypt(b"still too early", b"").unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert_eq!(session.phase(), SessionPhase::AwaitingPeer);

    // no AEAD call was attempted
    assert_eq!(session.stats().count(OperationKind::Encrypt), 0);
    Ok(())
}

#[test]
fn test_invalid_peer_key() -> Result<()> {
    let mut initiator = PqcSession::new()?;
    let err = initiator.init_session_with_peer(&[0u8; 17]).unwrap_err();
    assert!(matches!(err, Error::InvalidPeerKey(_)));
    assert_eq!(initiator.phase(), SessionPhase::Uninitiated);

    // a Kyber512 key is the wrong length for a Kyber768 session
    let mut small = PqcSession::with_crypto_config(CryptoConfig::lightweight())?;
    let small_key = small.init_session()?;
    assert!(matches!(
        initiator.init_session_with_peer(&small_key),
        Err(Error::InvalidPeerKey(_))
    ));
    Ok(())
}

#[test]
fn test_handshake_is_not_repeatable() -> Result<()> {
    let mut responder = PqcSession::new()?;
    let mut initiator = PqcSession::new()?;
    let public_key = responder.init_session()?;
    let handshake = initiator.init_session_with_peer(&public_key)?;

    responder.complete_handshake(&handshake)?;
    let again = responder.complete_handshake(&handshake);
    assert!(matches!(again, Err(Error::InvalidState { .. })));

    assert!(matches!(initiator.init_session(), Err(Error::InvalidState { .. })));
    assert!(matches!(
        initiator.init_session_with_peer(&public_key),
        Err(Error::InvalidState { .. })
    ));
    Ok(())
}

#[test]
fn test_rekey_changes_key() -> Result<()> {
    let (mut initiator, mut responder) = classic_pair(SessionConfig::default())?;
    let before = initiator.encrypt(b"same plaintext", b"")?;

    let token = initiator.rekey()?;
    let after = initiator.encrypt(b"same plaintext", b"")?;

    // the responder still holds the old key until it applies the token
    assert_eq!(
        responder.decrypt_envelope(&after, b"").unwrap_err(),
        Error::Authentication
    );
    responder.apply_rekey(&token)?;
    assert_eq!(responder.decrypt_envelope(&after, b"")?, b"same plaintext");
    assert_eq!(
        responder.decrypt_envelope(&before, b"").unwrap_err(),
        Error::Authentication
    );

    assert_eq!(initiator.key_epoch(), 1);
    assert_eq!(responder.key_epoch(), 1);
    Ok(())
}

#[test]
fn test_rekey_before_handshake() -> Result<()> {
    let mut session = PqcSession::new()?;
    assert!(matches!(session.rekey(), Err(Error::InvalidState { .. })));
    session.init_session()?;
    assert!(matches!(session.rekey(), Err(Error::InvalidState { .. })));
    Ok(())
}

#[test]
fn test_replayed_rekey_token_does_not_restore_old_key() -> Result<()> {
    let (mut initiator, mut responder) = classic_pair(SessionConfig::default())?;
    let token = initiator.rekey()?;
    responder.apply_rekey(&token)?;

    let message = initiator.encrypt(b"epoch one", b"")?;
    responder.apply_rekey(&token)?;
    assert_eq!(
        responder.decrypt_envelope(&message, b"").unwrap_err(),
        Error::Authentication
    );
    Ok(())
}

#[test]
fn test_all_presets_interoperate() -> Result<()> {
    for crypto in [
        CryptoConfig::default(),
        CryptoConfig::lightweight(),
        CryptoConfig::high_security(),
        CryptoConfig::hardware_optimized(),
    ] {
        let config = SessionConfig::default()
            .with_crypto(crypto)
            .with_authenticated_handshake(true);
        let (mut initiator, mut responder) = classic_pair(config)?;

        let envelope = initiator.encrypt(b"preset", b"")?;
        assert_eq!(responder.decrypt_envelope(&envelope, b"")?, b"preset", "{}", crypto);
        assert_eq!(responder.peer_sign_public_key(), Some(initiator.sign_public_key()));
    }
    Ok(())
}

#[test]
fn test_records_survive_encoding() -> Result<()> {
    let config = SessionConfig::default().with_authenticated_handshake(true);
    let mut responder = PqcSession::with_config(config)?;
    let mut initiator = PqcSession::with_config(config)?;

    let public_key = responder.init_session()?;
    let handshake = initiator.init_session_with_peer(&public_key)?;
    let handshake = HandshakeMessage::from_bytes(&handshake.to_bytes()?)?;
    responder.complete_handshake(&handshake)?;

    let envelope = initiator.encrypt(b"over the wire", b"")?;
    let envelope = EncryptedEnvelope::from_bytes(&envelope.to_bytes()?)?;
    assert_eq!(responder.decrypt_envelope(&envelope, b"")?, b"over the wire");
    Ok(())
}

#[test]
fn test_session_ids_are_local() -> Result<()> {
    let (initiator, responder) = classic_pair(SessionConfig::default())?;
    let a = initiator.session_id().map(<[u8]>::to_vec);
    let b = responder.session_id().map(<[u8]>::to_vec);
    assert!(a.is_some() && b.is_some());
    assert_ne!(a, b);
    Ok(())
}

#[test]
fn test_close() -> Result<()> {
    let (mut initiator, mut responder) = classic_pair(SessionConfig::default())?;
    let envelope = initiator.encrypt(b"last words", b"")?;

    responder.close();
    assert_eq!(responder.phase(), SessionPhase::Closed);
    assert!(matches!(
        responder.decrypt_envelope(&envelope, b""),
        Err(Error::InvalidState { .. })
    ));
    // closing twice is harmless
    responder.close();
    Ok(())
}
