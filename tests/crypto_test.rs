use pqc_session::{
    CryptoConfig, CryptoProvider, Error, KdfAlgorithm, KeyExchangeAlgorithm, Result, SecretBytes,
    SignatureAlgorithm, SymmetricAlgorithm, sizes,
};
use pqcrypto_dilithium::dilithium3;
use pqcrypto_kyber::kyber768;
use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SharedSecret as _};
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _};

// ----- Key Encapsulation Tests -----

#[test]
fn test_kem_interoperates_with_pqcrypto() -> Result<()> {
    let provider = CryptoProvider::new(CryptoConfig::default())?;
    let (public_key, secret_key) = kyber768::keypair();

    let (ciphertext, shared_secret) = provider.kem_encapsulate(public_key.as_bytes())?;
    assert_eq!(ciphertext.len(), provider.kem_ciphertext_size());

    let ciphertext = kyber768::Ciphertext::from_bytes(&ciphertext).unwrap();
    let expected = kyber768::decapsulate(&ciphertext, &secret_key);
    assert_eq!(shared_secret.as_bytes(), expected.as_bytes());
    Ok(())
}

#[test]
fn test_kem_roundtrip_all_parameter_sets() -> Result<()> {
    for kem in [
        KeyExchangeAlgorithm::Kyber512,
        KeyExchangeAlgorithm::Kyber768,
        KeyExchangeAlgorithm::Kyber1024,
    ] {
        let config = CryptoConfig::with_algorithms(
            kem,
            SignatureAlgorithm::Dilithium5,
            SymmetricAlgorithm::ChaCha20Poly1305,
            KdfAlgorithm::HkdfSha256,
        );
        let provider = CryptoProvider::new(config)?;
        let (public_key, secret_key) = provider.kem_keygen()?;
        assert_eq!(public_key.len(), provider.kem_public_key_size(), "{}", kem);

        let (ciphertext, sent) = provider.kem_encapsulate(&public_key)?;
        let received = provider.kem_decapsulate(&secret_key, &ciphertext)?;
        assert_eq!(sent.as_bytes(), received.as_bytes(), "{}", kem);
    }
    Ok(())
}

#[test]
fn test_kem_rejects_malformed_input() -> Result<()> {
    let provider = CryptoProvider::new(CryptoConfig::default())?;
    assert!(matches!(provider.kem_encapsulate(&[0u8; 10]), Err(Error::InvalidPeerKey(_))));

    let (_, secret_key) = provider.kem_keygen()?;
    assert_eq!(
        provider.kem_decapsulate(&secret_key, &[0u8; 10]).unwrap_err(),
        Error::Decapsulation
    );
    Ok(())
}

// ----- Signature Tests -----

#[test]
fn test_signature_interoperates_with_pqcrypto() -> Result<()> {
    let provider = CryptoProvider::new(CryptoConfig::default())?;
    let (public_key, secret_key) = provider.sign_keygen()?;
    let signature = provider.sign(&secret_key, b"interop")?;

    let public_key = dilithium3::PublicKey::from_bytes(&public_key).unwrap();
    let signature = dilithium3::DetachedSignature::from_bytes(&signature).unwrap();
    assert!(dilithium3::verify_detached_signature(&signature, b"interop", &public_key).is_ok());
    Ok(())
}

#[test]
fn test_signature_rejections() -> Result<()> {
    let provider = CryptoProvider::new(CryptoConfig::default())?;
    let (public_key, secret_key) = provider.sign_keygen()?;
    let (other_public, _) = provider.sign_keygen()?;
    let signature = provider.sign(&secret_key, b"message")?;

    assert!(provider.verify(&public_key, b"message", &signature));
    assert!(!provider.verify(&public_key, b"messagf", &signature));
    assert!(!provider.verify(&other_public, b"message", &signature));
    assert!(!provider.verify(&public_key, b"message", &signature[1..]));
    assert!(!provider.verify(&[0u8; 3], b"message", &signature));
    Ok(())
}

// ----- AEAD Tests -----

#[test]
fn test_aead_ciphers() -> Result<()> {
    for symmetric in [SymmetricAlgorithm::ChaCha20Poly1305, SymmetricAlgorithm::Aes256Gcm] {
        let config = CryptoConfig::with_algorithms(
            KeyExchangeAlgorithm::Kyber768,
            SignatureAlgorithm::Dilithium3,
            symmetric,
            KdfAlgorithm::HkdfSha256,
        );
        let provider = CryptoProvider::new(config)?;
        let key = SecretBytes::random(32);
        let nonce = [9u8; 12];

        let sealed = provider.aead_seal(&key, &nonce, b"plaintext", b"aad")?;
        assert_eq!(sealed.len(), b"plaintext".len() + sizes::TAG_SIZE);
        assert_eq!(provider.aead_open(&key, &nonce, &sealed, b"aad")?, b"plaintext");

        let wrong_key = SecretBytes::random(32);
        assert_eq!(
            provider.aead_open(&wrong_key, &nonce, &sealed, b"aad").unwrap_err(),
            Error::Authentication
        );
        assert_eq!(
            provider.aead_open(&key, &nonce, &sealed[..8], b"aad").unwrap_err(),
            Error::Authentication
        );
    }
    Ok(())
}

// ----- Key Derivation Tests -----

#[test]
fn test_kdf_flavors_differ() -> Result<()> {
    let sha2 = CryptoProvider::new(CryptoConfig::default())?;
    let sha3 = CryptoProvider::new(CryptoConfig::high_security())?;

    let a = sha2.kdf(b"input keying material", b"info")?;
    let b = sha3.kdf(b"input keying material", b"info")?;
    assert_eq!(a.len(), 32);
    assert_eq!(b.len(), 32);
    assert_ne!(a.as_bytes(), b.as_bytes());

    assert_eq!(a.as_bytes(), sha2.kdf(b"input keying material", b"info")?.as_bytes());
    assert_ne!(a.as_bytes(), sha2.kdf(b"input keying material", b"other")?.as_bytes());
    assert_ne!(
        a.as_bytes(),
        sha2.kdf_salted(b"input keying material", b"salt", b"info")?.as_bytes()
    );
    Ok(())
}

#[test]
fn test_invalid_config_rejected() {
    let config = CryptoConfig::with_algorithms(
        KeyExchangeAlgorithm::Kyber1024,
        SignatureAlgorithm::Dilithium2,
        SymmetricAlgorithm::Aes256Gcm,
        KdfAlgorithm::HkdfSha3_256,
    );
    assert!(matches!(CryptoProvider::new(config), Err(Error::InvalidConfig(_))));
}
