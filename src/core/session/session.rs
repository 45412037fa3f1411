/*!
Classic session: KEM handshake, AEAD channel and rekeying.

A [`PqcSession`] starts `Uninitiated`. The responder publishes a KEM public
key with [`PqcSession::init_session`]; the initiator encapsulates to it with
[`PqcSession::init_session_with_peer`] and is established immediately; the
responder completes with [`PqcSession::complete_handshake`].

```no_run
use pqc_session::PqcSession;

# fn main() -> pqc_session::Result<()> {
let mut responder = PqcSession::new()?;
let mut initiator = PqcSession::new()?;

let public_key = responder.init_session()?;
let handshake = initiator.init_session_with_peer(&public_key)?;
responder.complete_handshake(&handshake)?;

let envelope = initiator.encrypt(b"Test message", b"context-info")?;
let plaintext = responder.decrypt(&envelope.ciphertext, &envelope.nonce, b"context-info")?;
assert_eq!(plaintext, b"Test message");
# Ok(())
# }
```

Every operation is atomic: on error the session is left exactly as it was.
*/

use rand::RngCore;
use tracing::{debug, warn};

use crate::core::constants::sizes::{self, nonce as nonce_layout};
use crate::core::constants::labels;
use crate::core::crypto::{CryptoConfig, CryptoProvider};
use crate::core::error::{Error, Result, peer_key_err, state_err};
use crate::core::memory::SecretBytes;
use crate::core::message::{EncryptedEnvelope, HandshakeMessage, RekeyToken};
use crate::core::session::config::SessionConfig;
use crate::core::session::rekey::{self, RotationTracker};
use crate::core::session::state::{Role, SessionPhase};
use crate::core::session::transcript;
use crate::core::stats::{OperationKind, PerformanceStats};

/// Key material that exists only once the session is established
struct ChannelKeys {
    shared_secret: SecretBytes,
    session_key: SecretBytes,
}

/// One side of a classic secure channel
pub struct PqcSession {
    config: SessionConfig,
    provider: CryptoProvider,
    phase: SessionPhase,
    role: Option<Role>,

    local_kem_public: Option<Vec<u8>>,
    local_kem_secret: Option<SecretBytes>,
    peer_kem_public: Option<Vec<u8>>,
    keys: Option<ChannelKeys>,

    sign_public: Vec<u8>,
    sign_secret: SecretBytes,
    peer_sign_public: Option<Vec<u8>>,

    session_id: Option<[u8; sizes::SESSION_ID_SIZE]>,
    nonce_counter: u64,
    key_epoch: u64,
    rotation: RotationTracker,
    stats: PerformanceStats,
}

impl PqcSession {
    /// Create a session with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session using a specific cryptographic configuration
    pub fn with_crypto_config(crypto: CryptoConfig) -> Result<Self> {
        Self::with_config(SessionConfig::default().with_crypto(crypto))
    }

    /// Create a session with a full session configuration
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let provider = CryptoProvider::new(config.crypto)?;
        Self::with_provider(config, provider)
    }

    /// Create a session on an explicitly assembled primitive provider
    pub fn with_provider(mut config: SessionConfig, provider: CryptoProvider) -> Result<Self> {
        config.crypto = provider.config();
        let mut stats = PerformanceStats::new();
        let (sign_public, sign_secret) =
            stats.measure(OperationKind::KeyGeneration, 0, || provider.sign_keygen())?;

        Ok(Self {
            config,
            provider,
            phase: SessionPhase::Uninitiated,
            role: None,
            local_kem_public: None,
            local_kem_secret: None,
            peer_kem_public: None,
            keys: None,
            sign_public,
            sign_secret,
            peer_sign_public: None,
            session_id: None,
            nonce_counter: 0,
            key_epoch: 0,
            rotation: RotationTracker::new(),
            stats,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Role, once the handshake has assigned one
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_established(&self) -> bool {
        self.phase == SessionPhase::Established
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Diagnostic identifier, assigned when the session becomes established
    pub fn session_id(&self) -> Option<&[u8]> {
        self.session_id.as_ref().map(|id| id.as_slice())
    }

    /// KEM public key published by [`Self::init_session`]
    pub fn local_public_key(&self) -> Option<&[u8]> {
        self.local_kem_public.as_deref()
    }

    /// KEM public key the initiator encapsulated to
    pub fn peer_public_key(&self) -> Option<&[u8]> {
        self.peer_kem_public.as_deref()
    }

    /// This session's signing public key
    pub fn sign_public_key(&self) -> &[u8] {
        &self.sign_public
    }

    pub fn peer_sign_public_key(&self) -> Option<&[u8]> {
        self.peer_sign_public.as_deref()
    }

    /// Number of rekeys applied since the handshake
    pub fn key_epoch(&self) -> u64 {
        self.key_epoch
    }

    pub fn stats(&self) -> &PerformanceStats {
        &self.stats
    }

    /// Pin the signing key the peer is expected to use
    pub fn set_peer_sign_public_key(&mut self, public_key: &[u8]) -> Result<()> {
        self.require_open()?;
        self.check_sign_key(public_key)?;
        self.peer_sign_public = Some(public_key.to_vec());
        Ok(())
    }

    /// Generate a KEM keypair and wait for the initiator's ciphertext
    ///
    /// The session takes the responder role. Returns the public key to send
    /// to the peer.
    pub fn init_session(&mut self) -> Result<Vec<u8>> {
        self.require_phase(SessionPhase::Uninitiated)?;

        let provider = &self.provider;
        let (public_key, secret_key) =
            self.stats.measure(OperationKind::KeyGeneration, 0, || provider.kem_keygen())?;

        self.local_kem_public = Some(public_key.clone());
        self.local_kem_secret = Some(secret_key);
        self.role = Some(Role::Responder);
        self.transition(SessionPhase::AwaitingPeer);
        Ok(public_key)
    }

    /// Encapsulate to the peer's KEM public key and establish the session
    ///
    /// The session takes the initiator role. The returned message carries a
    /// signature when the configuration asks for an authenticated handshake.
    pub fn init_session_with_peer(&mut self, peer_public_key: &[u8]) -> Result<HandshakeMessage> {
        self.require_phase(SessionPhase::Uninitiated)?;
        if peer_public_key.len() != self.provider.kem_public_key_size() {
            return peer_key_err(format!(
                "expected {} byte KEM public key, got {}",
                self.provider.kem_public_key_size(),
                peer_public_key.len()
            ));
        }

        let provider = &self.provider;
        let (ciphertext, shared_secret) = self.stats.measure(OperationKind::Encapsulation, 0, || {
            provider.kem_encapsulate(peer_public_key)
        })?;
        let session_key = provider.kdf(shared_secret.as_bytes(), labels::SESSION_KEY)?;

        let mut message = HandshakeMessage::new(ciphertext);
        if self.config.authenticated_handshake {
            let signed = transcript::handshake(&message.ciphertext);
            let sign_secret = &self.sign_secret;
            let signature = self.stats.measure(OperationKind::Sign, signed.len(), || {
                provider.sign(sign_secret, &signed)
            })?;
            message = message.with_signature(signature, self.sign_public.clone());
        }

        self.peer_kem_public = Some(peer_public_key.to_vec());
        self.role = Some(Role::Initiator);
        self.establish(shared_secret, session_key);
        Ok(message)
    }

    /// Decapsulate the initiator's handshake and establish the session
    ///
    /// Any failure leaves the session in `AwaitingPeer`.
    pub fn complete_handshake(&mut self, message: &HandshakeMessage) -> Result<()> {
        self.require_phase(SessionPhase::AwaitingPeer)?;
        if self.role != Some(Role::Responder) {
            return state_err(Role::Responder, self.role_name());
        }

        self.verify_handshake(message)?;

        let Some(secret_key) = self.local_kem_secret.as_ref() else {
            return state_err("local KEM keypair", "none");
        };
        let provider = &self.provider;
        let shared_secret = self
            .stats
            .measure(OperationKind::Decapsulation, 0, || {
                provider.kem_decapsulate(secret_key, &message.ciphertext)
            })
            .inspect_err(|_| warn!("handshake ciphertext rejected"))?;
        let session_key = provider.kdf(shared_secret.as_bytes(), labels::SESSION_KEY)?;

        if let Some(signer) = &message.signer_public_key {
            self.peer_sign_public.get_or_insert_with(|| signer.clone());
        }
        self.local_kem_secret = None;
        self.establish(shared_secret, session_key);
        Ok(())
    }

    fn verify_handshake(&mut self, message: &HandshakeMessage) -> Result<()> {
        let (signature, signer) = match (&message.signature, &message.signer_public_key) {
            (Some(signature), Some(signer)) => (signature, signer),
            // A pinned signer key requires a signed handshake
            (None, None) if !self.config.authenticated_handshake && self.peer_sign_public.is_none() => {
                return Ok(());
            }
            _ => {
                warn!("unsigned or half-signed handshake rejected");
                return Err(Error::SignatureVerification);
            }
        };

        if let Some(pinned) = &self.peer_sign_public {
            if pinned != signer {
                warn!("handshake signed by an unexpected key");
                return Err(Error::SignatureVerification);
            }
        }

        let signed = transcript::handshake(&message.ciphertext);
        let provider = &self.provider;
        let valid = self.stats.measure(OperationKind::Verify, signed.len(), || {
            match provider.verify(signer, &signed, signature) {
                true => Ok(()),
                false => Err(Error::SignatureVerification),
            }
        });
        valid.inspect_err(|_| warn!("handshake signature rejected"))
    }

    /// Seal `plaintext` under the session key
    ///
    /// Nonces are `role tag || per-key counter || random`, so the two
    /// directions never collide and no nonce repeats under one key.
    pub fn encrypt(&mut self, plaintext: &[u8], aad: &[u8]) -> Result<EncryptedEnvelope> {
        self.require_phase(SessionPhase::Established)?;
        let Some(role) = self.role else {
            return state_err("assigned role", "none");
        };
        if self.nonce_counter > nonce_layout::COUNTER_MAX {
            return Err(Error::NonceExhausted);
        }
        let Some(keys) = self.keys.as_ref() else {
            return state_err("session key", "none");
        };

        let nonce = build_nonce(role, self.nonce_counter, self.provider.nonce_size());
        let provider = &self.provider;
        let ciphertext = self.stats.measure(OperationKind::Encrypt, plaintext.len(), || {
            provider.aead_seal(&keys.session_key, &nonce, plaintext, aad)
        })?;

        self.nonce_counter += 1;
        self.rotation.track_sent(plaintext.len());
        Ok(EncryptedEnvelope::new(ciphertext, nonce))
    }

    /// Open a ciphertext produced by the peer's [`Self::encrypt`]
    ///
    /// Nonces that do not carry the peer's role tag are rejected, so a
    /// session never accepts its own reflected ciphertext.
    pub fn decrypt(&mut self, ciphertext: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.require_phase(SessionPhase::Established)?;
        let Some(role) = self.role else {
            return state_err("assigned role", "none");
        };
        let Some(keys) = self.keys.as_ref() else {
            return state_err("session key", "none");
        };

        let provider = &self.provider;
        let plaintext = self
            .stats
            .measure(OperationKind::Decrypt, ciphertext.len(), || {
                if nonce.get(nonce_layout::ROLE_OFFSET) != Some(&role.peer().nonce_tag()) {
                    return Err(Error::Authentication);
                }
                provider.aead_open(&keys.session_key, nonce, ciphertext, aad)
            })
            .inspect_err(|_| warn!("ciphertext failed authentication"))?;

        self.rotation.track_received(plaintext.len());
        Ok(plaintext)
    }

    /// Open an envelope produced by the peer's [`Self::encrypt`]
    pub fn decrypt_envelope(&mut self, envelope: &EncryptedEnvelope, aad: &[u8]) -> Result<Vec<u8>> {
        self.decrypt(&envelope.ciphertext, &envelope.nonce, aad)
    }

    /// Replace the session key and return the token the peer must apply
    pub fn rekey(&mut self) -> Result<RekeyToken> {
        let token = rekey::new_token();
        self.rekey_with(&token)?;
        Ok(token)
    }

    /// Apply a rekey token received from the peer
    pub fn apply_rekey(&mut self, token: &RekeyToken) -> Result<()> {
        rekey::check_token(token)?;
        self.rekey_with(token)
    }

    fn rekey_with(&mut self, token: &RekeyToken) -> Result<()> {
        self.require_phase(SessionPhase::Established)?;
        let Some(keys) = self.keys.as_mut() else {
            return state_err("session key", "none");
        };

        let provider = &self.provider;
        let next = self.stats.measure(OperationKind::Rekey, 0, || {
            rekey::derive_rekeyed(provider, &keys.shared_secret, &keys.session_key, &token.salt)
        })?;

        keys.session_key = next;
        self.key_epoch += 1;
        self.nonce_counter = 0;
        self.rotation.reset();
        debug!(epoch = self.key_epoch, "session key rotated");
        Ok(())
    }

    /// Whether the rotation policy says a rekey is due
    pub fn should_rekey(&self) -> bool {
        self.is_established() && self.rotation.should_rotate(&self.config.rotation)
    }

    /// Sign `message` with this session's signing key
    pub fn sign(&mut self, message: &[u8]) -> Result<Vec<u8>> {
        self.require_open()?;
        let provider = &self.provider;
        let sign_secret = &self.sign_secret;
        self.stats
            .measure(OperationKind::Sign, message.len(), || provider.sign(sign_secret, message))
    }

    /// Verify a signature, against `public_key` or the peer's signing key
    pub fn verify(&mut self, message: &[u8], signature: &[u8], public_key: Option<&[u8]>) -> Result<bool> {
        self.require_open()?;
        let Some(public_key) = public_key.or(self.peer_sign_public.as_deref()) else {
            return state_err("peer signing key", "none");
        };

        let provider = &self.provider;
        self.stats.measure(OperationKind::Verify, message.len(), || {
            Ok::<_, Error>(provider.verify(public_key, message, signature))
        })
    }

    /// Wipe every secret and close the session
    pub fn close(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }
        self.keys = None;
        self.local_kem_secret = None;
        self.sign_secret = SecretBytes::default();
        self.transition(SessionPhase::Closed);
    }

    fn establish(&mut self, shared_secret: SecretBytes, session_key: SecretBytes) {
        let mut session_id = [0u8; sizes::SESSION_ID_SIZE];
        rand::rng().fill_bytes(&mut session_id);

        self.keys = Some(ChannelKeys {
            shared_secret,
            session_key,
        });
        self.session_id = Some(session_id);
        self.nonce_counter = 0;
        self.key_epoch = 0;
        self.rotation.reset();
        self.transition(SessionPhase::Established);
    }

    fn transition(&mut self, next: SessionPhase) {
        debug!(from = %self.phase, to = %next, role = self.role_name(), "session phase change");
        self.phase = next;
    }

    fn require_phase(&self, expected: SessionPhase) -> Result<()> {
        if self.phase != expected {
            return state_err(expected, self.phase);
        }
        Ok(())
    }

    fn require_open(&self) -> Result<()> {
        if self.phase == SessionPhase::Closed {
            return state_err("open session", self.phase);
        }
        Ok(())
    }

    fn check_sign_key(&self, public_key: &[u8]) -> Result<()> {
        if public_key.len() != self.provider.sign_public_key_size() {
            return peer_key_err(format!(
                "expected {} byte signing key, got {}",
                self.provider.sign_public_key_size(),
                public_key.len()
            ));
        }
        Ok(())
    }

    fn role_name(&self) -> &'static str {
        match self.role {
            Some(Role::Initiator) => "Initiator",
            Some(Role::Responder) => "Responder",
            None => "unassigned",
        }
    }
}

impl Drop for PqcSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PqcSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PqcSession")
            .field("phase", &self.phase)
            .field("role", &self.role)
            .field("key_epoch", &self.key_epoch)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn build_nonce(role: Role, counter: u64, size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size];
    out[nonce_layout::ROLE_OFFSET] = role.nonce_tag();
    let counter = counter.to_be_bytes();
    out[nonce_layout::COUNTER_OFFSET..nonce_layout::RANDOM_OFFSET]
        .copy_from_slice(&counter[counter.len() - nonce_layout::COUNTER_BYTES..]);
    rand::rng().fill_bytes(&mut out[nonce_layout::RANDOM_OFFSET..]);
    out
}
