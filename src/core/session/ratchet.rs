/*!
Triple ratchet engine.

A [`TripleRatchet`] combines a signed KEM handshake, per-message symmetric
ratcheting and a signature over every message.

Handshake: the initiator encapsulates to the responder's KEM key, signs the
ciphertext and derives the root. The responder verifies the signature
before decapsulating. The root feeds two chains, one per direction, and is
then dropped.

Per message, with `ck` the current chain key:

```text
message_key = KDF(ck, "message-key")
ck'         = KDF(ck, "chain-step")
```

The superseded chain key is wiped as soon as `ck'` replaces it, so keys
for earlier messages cannot be recomputed from the current state.

Receiving derives forward from the next expected message number to the
received one (at most `max_skip` steps). Skipped keys are not kept: a
message older than the newest accepted one is rejected as a replay.
*/

use std::time::Instant;

use rand::RngCore;
use tracing::{debug, trace, warn};

use crate::core::constants::labels;
use crate::core::crypto::{CryptoConfig, CryptoProvider};
use crate::core::error::{Error, Result, peer_key_err, state_err};
use crate::core::memory::SecretBytes;
use crate::core::message::{RatchetHandshake, RatchetMessage, RekeyToken};
use crate::core::session::config::SessionConfig;
use crate::core::session::rekey::{self, RotationTracker};
use crate::core::session::state::{RatchetPhase, Role};
use crate::core::session::transcript;
use crate::core::stats::{OperationKind, PerformanceStats};

struct Chains {
    send: SecretBytes,
    recv: SecretBytes,
}

impl Chains {
    fn from_shared_secret(provider: &CryptoProvider, shared_secret: &SecretBytes, role: Role) -> Result<Self> {
        let root = provider.kdf(shared_secret.as_bytes(), labels::RATCHET_ROOT)?;
        let initiator = provider.kdf(root.as_bytes(), labels::CHAIN_INITIATOR)?;
        let responder = provider.kdf(root.as_bytes(), labels::CHAIN_RESPONDER)?;

        Ok(match role {
            Role::Initiator => Self {
                send: initiator,
                recv: responder,
            },
            Role::Responder => Self {
                send: responder,
                recv: initiator,
            },
        })
    }
}

/// One ratchet step: the message key for `chain_key` and the next chain key
fn step(provider: &CryptoProvider, chain_key: &SecretBytes) -> Result<(SecretBytes, SecretBytes)> {
    let message_key = provider.kdf(chain_key.as_bytes(), labels::MESSAGE_KEY)?;
    let next = provider.kdf(chain_key.as_bytes(), labels::CHAIN_STEP)?;
    Ok((message_key, next))
}

/// A long-lived, per-message ratcheted channel
pub struct TripleRatchet {
    config: SessionConfig,
    provider: CryptoProvider,
    phase: RatchetPhase,
    role: Option<Role>,

    kem_public: Vec<u8>,
    kem_secret: Option<SecretBytes>,
    sign_public: Vec<u8>,
    sign_secret: SecretBytes,
    peer_sign_public: Option<Vec<u8>>,

    chains: Option<Chains>,
    send_msg_num: u64,
    recv_msg_num: u64,
    key_epoch: u64,
    rotation: RotationTracker,
    stats: PerformanceStats,
}

impl TripleRatchet {
    /// Create a ratchet with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_crypto_config(crypto: CryptoConfig) -> Result<Self> {
        Self::with_config(SessionConfig::default().with_crypto(crypto))
    }

    /// Create a ratchet, generating its KEM and signing keypairs
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let provider = CryptoProvider::new(config.crypto)?;
        Self::with_provider(config, provider)
    }

    pub fn with_provider(mut config: SessionConfig, provider: CryptoProvider) -> Result<Self> {
        config.crypto = provider.config();
        let mut stats = PerformanceStats::new();
        let (kem_public, kem_secret) =
            stats.measure(OperationKind::KeyGeneration, 0, || provider.kem_keygen())?;
        let (sign_public, sign_secret) =
            stats.measure(OperationKind::KeyGeneration, 0, || provider.sign_keygen())?;

        Ok(Self {
            config,
            provider,
            phase: RatchetPhase::Uninitiated,
            role: None,
            kem_public,
            kem_secret: Some(kem_secret),
            sign_public,
            sign_secret,
            peer_sign_public: None,
            chains: None,
            send_msg_num: 0,
            recv_msg_num: 0,
            key_epoch: 0,
            rotation: RotationTracker::new(),
            stats,
        })
    }

    pub fn phase(&self) -> RatchetPhase {
        self.phase
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// KEM public key the initiator encapsulates to
    pub fn kem_public_key(&self) -> &[u8] {
        &self.kem_public
    }

    pub fn sign_public_key(&self) -> &[u8] {
        &self.sign_public
    }

    /// Signing key bound at the handshake
    pub fn peer_sign_public_key(&self) -> Option<&[u8]> {
        self.peer_sign_public.as_deref()
    }

    /// Number the next sent message will carry
    pub fn send_message_number(&self) -> u64 {
        self.send_msg_num
    }

    /// Lowest message number the receive chain still accepts
    pub fn receive_message_number(&self) -> u64 {
        self.recv_msg_num
    }

    pub fn key_epoch(&self) -> u64 {
        self.key_epoch
    }

    pub fn stats(&self) -> &PerformanceStats {
        &self.stats
    }

    /// Encapsulate to the peer and sign the ciphertext
    ///
    /// The ratchet becomes the initiator and may send immediately; its
    /// phase is `AwaitingResponderAck` until the first message from the
    /// responder authenticates.
    pub fn init_triple_ratchet(
        &mut self,
        peer_kem_public: &[u8],
        peer_sign_public: &[u8],
    ) -> Result<RatchetHandshake> {
        let start = Instant::now();
        let result = self.initiate(peer_kem_public, peer_sign_public);
        self.stats
            .record(OperationKind::RatchetHandshake, start.elapsed(), 0, result.is_ok());
        result
    }

    fn initiate(&mut self, peer_kem_public: &[u8], peer_sign_public: &[u8]) -> Result<RatchetHandshake> {
        self.require_phase(RatchetPhase::Uninitiated)?;
        if peer_kem_public.len() != self.provider.kem_public_key_size() {
            return peer_key_err(format!(
                "expected {} byte KEM public key, got {}",
                self.provider.kem_public_key_size(),
                peer_kem_public.len()
            ));
        }
        self.check_sign_key(peer_sign_public)?;

        let (kem_ciphertext, shared_secret) = self.provider.kem_encapsulate(peer_kem_public)?;
        let kem_signature = self
            .provider
            .sign(&self.sign_secret, &transcript::handshake(&kem_ciphertext))?;
        let chains = Chains::from_shared_secret(&self.provider, &shared_secret, Role::Initiator)?;

        self.role = Some(Role::Initiator);
        self.peer_sign_public = Some(peer_sign_public.to_vec());
        self.install(chains);
        self.transition(RatchetPhase::AwaitingResponderAck);

        Ok(RatchetHandshake {
            kem_ciphertext,
            kem_signature,
            sign_public_key: self.sign_public.clone(),
        })
    }

    /// Verify and decapsulate the initiator's handshake
    ///
    /// The signature is checked before the ciphertext is decapsulated. Any
    /// failure leaves the ratchet `Uninitiated`.
    pub fn complete_triple_ratchet_handshake(
        &mut self,
        kem_ciphertext: &[u8],
        kem_signature: &[u8],
        peer_sign_public: &[u8],
    ) -> Result<()> {
        let start = Instant::now();
        let result = self.respond(kem_ciphertext, kem_signature, peer_sign_public);
        self.stats
            .record(OperationKind::RatchetHandshake, start.elapsed(), 0, result.is_ok());
        result
    }

    /// [`Self::complete_triple_ratchet_handshake`] on a decoded record
    pub fn accept_handshake(&mut self, handshake: &RatchetHandshake) -> Result<()> {
        self.complete_triple_ratchet_handshake(
            &handshake.kem_ciphertext,
            &handshake.kem_signature,
            &handshake.sign_public_key,
        )
    }

    fn respond(&mut self, kem_ciphertext: &[u8], kem_signature: &[u8], peer_sign_public: &[u8]) -> Result<()> {
        self.require_phase(RatchetPhase::Uninitiated)?;
        self.check_sign_key(peer_sign_public)?;

        let signed = transcript::handshake(kem_ciphertext);
        if !self.provider.verify(peer_sign_public, &signed, kem_signature) {
            warn!("ratchet handshake signature rejected");
            return Err(Error::SignatureVerification);
        }

        let Some(kem_secret) = self.kem_secret.as_ref() else {
            return state_err("local KEM keypair", "none");
        };
        let shared_secret = self
            .provider
            .kem_decapsulate(kem_secret, kem_ciphertext)
            .inspect_err(|_| warn!("ratchet handshake ciphertext rejected"))?;
        let chains = Chains::from_shared_secret(&self.provider, &shared_secret, Role::Responder)?;

        self.role = Some(Role::Responder);
        self.peer_sign_public = Some(peer_sign_public.to_vec());
        self.install(chains);
        self.transition(RatchetPhase::Established);
        Ok(())
    }

    /// Ratchet the send chain, seal and sign `plaintext`
    pub fn triple_encrypt(&mut self, plaintext: &[u8]) -> Result<RatchetMessage> {
        self.triple_encrypt_with_aad(plaintext, &[])
    }

    pub fn triple_encrypt_with_aad(&mut self, plaintext: &[u8], aad: &[u8]) -> Result<RatchetMessage> {
        let start = Instant::now();
        let result = self.seal_next(plaintext, aad);
        self.stats.record(
            OperationKind::RatchetEncrypt,
            start.elapsed(),
            plaintext.len(),
            result.is_ok(),
        );
        result
    }

    fn seal_next(&mut self, plaintext: &[u8], aad: &[u8]) -> Result<RatchetMessage> {
        self.require_chains()?;
        let Some(chains) = self.chains.as_ref() else {
            return state_err(RatchetPhase::Established, self.phase);
        };
        let msg_num = self.send_msg_num;
        let Some(following) = msg_num.checked_add(1) else {
            return Err(Error::NonceExhausted);
        };

        let (message_key, next_chain) = step(&self.provider, &chains.send)?;
        let mut nonce = vec![0u8; self.provider.nonce_size()];
        rand::rng().fill_bytes(&mut nonce);
        let ciphertext = self.provider.aead_seal(&message_key, &nonce, plaintext, aad)?;
        let signature = self
            .provider
            .sign(&self.sign_secret, &transcript::message(msg_num, &nonce, &ciphertext))?;

        if let Some(chains) = self.chains.as_mut() {
            chains.send = next_chain;
        }
        self.send_msg_num = following;
        self.rotation.track_sent(plaintext.len());
        trace!(msg_num, "send chain advanced");

        Ok(RatchetMessage {
            ciphertext,
            nonce,
            signature,
            msg_num,
            sign_public_key: self.sign_public.clone(),
        })
    }

    /// Verify, ratchet the receive chain forward and open a message
    ///
    /// Checks run in this order: signer key, signature, message number,
    /// AEAD tag. Nothing is committed unless all of them pass.
    pub fn triple_decrypt(
        &mut self,
        ciphertext: &[u8],
        nonce: &[u8],
        signature: &[u8],
        msg_num: u64,
        peer_sign_public: &[u8],
    ) -> Result<Vec<u8>> {
        self.triple_decrypt_with_aad(ciphertext, nonce, signature, msg_num, peer_sign_public, &[])
    }

    pub fn triple_decrypt_with_aad(
        &mut self,
        ciphertext: &[u8],
        nonce: &[u8],
        signature: &[u8],
        msg_num: u64,
        peer_sign_public: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let start = Instant::now();
        let result = self.open_at(ciphertext, nonce, signature, msg_num, peer_sign_public, aad);
        self.stats.record(
            OperationKind::RatchetDecrypt,
            start.elapsed(),
            ciphertext.len(),
            result.is_ok(),
        );
        result
    }

    /// [`Self::triple_decrypt`] on a decoded record
    pub fn decrypt_message(&mut self, message: &RatchetMessage) -> Result<Vec<u8>> {
        self.triple_decrypt(
            &message.ciphertext,
            &message.nonce,
            &message.signature,
            message.msg_num,
            &message.sign_public_key,
        )
    }

    fn open_at(
        &mut self,
        ciphertext: &[u8],
        nonce: &[u8],
        signature: &[u8],
        msg_num: u64,
        peer_sign_public: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        self.require_chains()?;
        if self.peer_sign_public.as_deref() != Some(peer_sign_public) {
            warn!(msg_num, "message signed by an unexpected key");
            return Err(Error::SignatureVerification);
        }

        let signed = transcript::message(msg_num, nonce, ciphertext);
        if !self.provider.verify(peer_sign_public, &signed, signature) {
            warn!(msg_num, "message signature rejected");
            return Err(Error::SignatureVerification);
        }

        let next_expected = self.recv_msg_num;
        if msg_num < next_expected {
            warn!(msg_num, next_expected, "replayed message rejected");
            return Err(Error::Replay {
                msg_num,
                next_expected,
            });
        }
        let max_skip = self.config.max_skip;
        if msg_num - next_expected > max_skip {
            warn!(msg_num, next_expected, max_skip, "message number too far ahead");
            return Err(Error::MessageGap {
                msg_num,
                next_expected,
                max_skip,
            });
        }

        let Some(chains) = self.chains.as_ref() else {
            return state_err(RatchetPhase::Established, self.phase);
        };
        let mut chain_key = chains.recv.clone();
        for _ in next_expected..msg_num {
            chain_key = self.provider.kdf(chain_key.as_bytes(), labels::CHAIN_STEP)?;
        }
        let (message_key, next_chain) = step(&self.provider, &chain_key)?;
        let plaintext = self
            .provider
            .aead_open(&message_key, nonce, ciphertext, aad)
            .inspect_err(|_| warn!(msg_num, "message failed authentication"))?;

        if let Some(chains) = self.chains.as_mut() {
            chains.recv = next_chain;
        }
        self.recv_msg_num = msg_num.saturating_add(1);
        self.rotation.track_received(plaintext.len());
        trace!(msg_num, skipped = msg_num - next_expected, "receive chain advanced");

        if self.phase == RatchetPhase::AwaitingResponderAck {
            self.transition(RatchetPhase::Established);
        }
        Ok(plaintext)
    }

    /// Mix a fresh salt into both chains and return it for the peer
    ///
    /// Message numbers are untouched. The peer must apply the token after
    /// every message sent before it and before any message sent after it.
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
        self.require_phase(RatchetPhase::Established)?;
        let Some(chains) = self.chains.as_mut() else {
            return state_err(RatchetPhase::Established, self.phase);
        };

        let provider = &self.provider;
        let (send, recv) = self.stats.measure(OperationKind::Rekey, 0, || {
            let send = provider.kdf_salted(chains.send.as_bytes(), &token.salt, labels::REKEY)?;
            let recv = provider.kdf_salted(chains.recv.as_bytes(), &token.salt, labels::REKEY)?;
            Ok::<_, Error>((send, recv))
        })?;

        chains.send = send;
        chains.recv = recv;
        self.key_epoch += 1;
        self.rotation.reset();
        debug!(
            epoch = self.key_epoch,
            send_msg_num = self.send_msg_num,
            recv_msg_num = self.recv_msg_num,
            "ratchet chains rekeyed"
        );
        Ok(())
    }

    /// Whether the rotation policy says a rekey is due
    pub fn should_rekey(&self) -> bool {
        self.phase == RatchetPhase::Established && self.rotation.should_rotate(&self.config.rotation)
    }

    /// Wipe every secret and close the ratchet
    pub fn close(&mut self) {
        if self.phase == RatchetPhase::Closed {
            return;
        }
        self.chains = None;
        self.kem_secret = None;
        self.sign_secret = SecretBytes::default();
        self.transition(RatchetPhase::Closed);
    }

    fn install(&mut self, chains: Chains) {
        self.chains = Some(chains);
        // only needed for the handshake
        self.kem_secret = None;
        self.send_msg_num = 0;
        self.recv_msg_num = 0;
        self.rotation.reset();
    }

    fn transition(&mut self, next: RatchetPhase) {
        debug!(from = %self.phase, to = %next, role = ?self.role, "ratchet phase change");
        self.phase = next;
    }

    fn require_phase(&self, expected: RatchetPhase) -> Result<()> {
        if self.phase != expected {
            return state_err(expected, self.phase);
        }
        Ok(())
    }

    fn require_chains(&self) -> Result<()> {
        if !self.phase.has_chains() {
            return state_err(RatchetPhase::Established, self.phase);
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
}

impl Drop for TripleRatchet {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TripleRatchet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleRatchet")
            .field("phase", &self.phase)
            .field("role", &self.role)
            .field("send_msg_num", &self.send_msg_num)
            .field("recv_msg_num", &self.recv_msg_num)
            .field("key_epoch", &self.key_epoch)
            .finish_non_exhaustive()
    }
}
