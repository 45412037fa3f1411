mod common;

use common::{classic_pair, ratchet_pair};
use pqc_session::{
    EncryptedEnvelope, Error, HandshakeMessage, PqcSession, RatchetMessage, RekeyToken,
    SessionConfig, TripleRatchet, WireFormat,
};

use proptest::prelude::*;

// Handshakes are expensive; keep the case count modest
fn config() -> ProptestConfig {
    ProptestConfig::with_cases(24)
}

// Strategy for generating payloads, empty included
fn payloads() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

// Strategy for generating associated data
fn aad() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

// Strategy for generating ratchet records
fn ratchet_messages() -> impl Strategy<Value = RatchetMessage> {
    (
        prop::collection::vec(any::<u8>(), 0..256),
        prop::collection::vec(any::<u8>(), 12),
        prop::collection::vec(any::<u8>(), 0..128),
        any::<u64>(),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(ciphertext, nonce, signature, msg_num, sign_public_key)| RatchetMessage {
            ciphertext,
            nonce,
            signature,
            msg_num,
            sign_public_key,
        })
}

fn sessions() -> (PqcSession, PqcSession) {
    classic_pair(SessionConfig::default()).unwrap()
}

fn ratchets() -> (TripleRatchet, TripleRatchet) {
    ratchet_pair(SessionConfig::default()).unwrap()
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_classic_roundtrip(plaintext in payloads(), aad in aad()) {
        let (mut initiator, mut responder) = sessions();
        let envelope = initiator.encrypt(&plaintext, &aad).unwrap();
        let decrypted = responder.decrypt(&envelope.ciphertext, &envelope.nonce, &aad).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_classic_tamper_is_authentication_error(
        plaintext in payloads(),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
        in_nonce in any::<bool>(),
    ) {
        let (mut initiator, mut responder) = sessions();
        let mut envelope = initiator.encrypt(&plaintext, b"").unwrap();
        let target = if in_nonce { &mut envelope.nonce } else { &mut envelope.ciphertext };
        let at = index.index(target.len());
        target[at] ^= flip;

        let result = responder.decrypt(&envelope.ciphertext, &envelope.nonce, b"");
        prop_assert_eq!(result.unwrap_err(), Error::Authentication);
    }

    #[test]
    fn test_ratchet_sequence(sizes in prop::collection::vec(0usize..512, 1..12)) {
        let (mut alice, mut bob) = ratchets();
        for (expected, size) in sizes.iter().enumerate() {
            let plaintext = vec![expected as u8; *size];
            let message = alice.triple_encrypt(&plaintext).unwrap();
            prop_assert_eq!(message.msg_num, expected as u64);
            prop_assert_eq!(bob.decrypt_message(&message).unwrap(), plaintext);
        }
        prop_assert_eq!(bob.receive_message_number(), sizes.len() as u64);
    }

    #[test]
    fn test_ratchet_signature_tamper(
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let (mut alice, mut bob) = ratchets();
        let mut message = alice.triple_encrypt(b"authentic").unwrap();
        let at = index.index(message.signature.len());
        message.signature[at] ^= flip;

        prop_assert_eq!(bob.decrypt_message(&message).unwrap_err(), Error::SignatureVerification);
        prop_assert_eq!(bob.receive_message_number(), 0);
    }

    #[test]
    fn test_ratchet_message_encoding(message in ratchet_messages()) {
        let decoded = RatchetMessage::from_bytes(&message.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(decoded, message);
    }

    #[test]
    fn test_truncated_records_rejected(message in ratchet_messages(), cut in any::<prop::sample::Index>()) {
        let bytes = message.to_bytes().unwrap();
        let at = cut.index(bytes.len());
        prop_assert!(RatchetMessage::from_bytes(&bytes[..at]).is_err());
    }

    #[test]
    fn test_decoders_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = HandshakeMessage::from_bytes(&bytes);
        let _ = EncryptedEnvelope::from_bytes(&bytes);
        let _ = RatchetMessage::from_bytes(&bytes);
        let _ = RekeyToken::from_bytes(&bytes);
    }
}
