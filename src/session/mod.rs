// Hybrid Session Establishment
// RSA wraps one AES-256-GCM key per session; messages use only the session key

pub mod channel;
pub mod envelope;

pub use channel::{Channel, MemoryChannel};
pub use envelope::{EncryptedEnvelope, ProtocolMessage, WrappedKey};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::rsa::{decrypt_framed, encrypt_framed, RsaPrivateKey, RsaPublicKey};
use crate::symmetric::{self, SessionKey};

/// Sender side: fresh session key wrapped for `peer_public_key`
pub fn initialize_session_as_sender(
    peer_public_key: &RsaPublicKey,
) -> Result<(WrappedKey, SessionKey)> {
    let key = SessionKey::generate();
    let c = encrypt_framed(key.export(), peer_public_key)?;
    let wrapped = WrappedKey::from_ciphertext(&c);

    debug!(
        peer = %peer_public_key.fingerprint(),
        wrapped_len = wrapped.as_str().len(),
        "wrapped session key for peer"
    );
    Ok((wrapped, key))
}

/// Raw key bytes recovered from a wrapped key, wiped when dropped
fn unwrap_key_material(
    wrapped: &WrappedKey,
    own_private_key: &RsaPrivateKey,
) -> Result<Zeroizing<Vec<u8>>> {
    let c = wrapped.ciphertext()?;
    Ok(Zeroizing::new(decrypt_framed(&c, own_private_key)?))
}

/// Receiver side: unwrap a session key with our own private key
pub fn initialize_session_as_receiver(
    wrapped: &WrappedKey,
    own_private_key: &RsaPrivateKey,
) -> Result<SessionKey> {
    let raw = unwrap_key_material(wrapped, own_private_key)?;
    let key = SessionKey::import(raw.as_slice())?;

    debug!("unwrapped session key");
    Ok(key)
}

/// An established session: seals and opens messages under one key
#[derive(Debug)]
pub struct Session {
    key: SessionKey,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Encrypt `plaintext` under a fresh nonce
    pub fn seal(&self, plaintext: &[u8]) -> Result<EncryptedEnvelope> {
        let sealed = symmetric::encrypt(plaintext, &self.key)?;
        Ok(EncryptedEnvelope::from_sealed(&sealed))
    }

    /// Decrypt an envelope; tampering yields `AuthenticationFailure`
    pub fn open(&self, envelope: &EncryptedEnvelope) -> Result<Vec<u8>> {
        let sealed = envelope.to_sealed()?;
        symmetric::decrypt(&sealed.ciphertext, &self.key, &sealed.nonce)
    }

    pub fn open_text(&self, envelope: &EncryptedEnvelope) -> Result<String> {
        let plaintext = self.open(envelope)?;
        String::from_utf8(plaintext)
            .map_err(|e| CryptoError::Decoding(format!("invalid UTF-8: {}", e)))
    }
}

/// Run the sender half of the handshake over `channel`
pub fn establish_as_sender<C: Channel>(
    channel: &mut C,
    peer_public_key: &RsaPublicKey,
) -> Result<Session> {
    let (wrapped_key, key) = initialize_session_as_sender(peer_public_key)?;
    channel.send(&ProtocolMessage::SessionKey { wrapped_key })?;

    info!(peer = %peer_public_key.fingerprint(), "session established as sender");
    Ok(Session::new(key))
}

/// Run the receiver half of the handshake over `channel`
pub fn establish_as_receiver<C: Channel>(
    channel: &mut C,
    own_private_key: &RsaPrivateKey,
) -> Result<Session> {
    let wrapped_key = match channel.recv()? {
        ProtocolMessage::SessionKey { wrapped_key } => wrapped_key,
        other => {
            warn!(kind = other.kind(), "expected a session key");
            return Err(CryptoError::Channel(format!(
                "expected session_key, got {}",
                other.kind()
            )));
        }
    };

    let key = initialize_session_as_receiver(&wrapped_key, own_private_key)?;
    info!("session established as receiver");
    Ok(Session::new(key))
}

/// Seal `text` and send it to the peer
pub fn send_message<C: Channel>(channel: &mut C, session: &Session, text: &str) -> Result<()> {
    let envelope = session.seal(text.as_bytes())?;
    channel.send(&ProtocolMessage::Message { envelope })
}

/// Wait for the next message and open it
pub fn receive_message<C: Channel>(channel: &mut C, session: &Session) -> Result<String> {
    match channel.recv()? {
        ProtocolMessage::Message { envelope } => session.open_text(&envelope),
        other => Err(CryptoError::Channel(format!(
            "expected message, got {}",
            other.kind()
        ))),
    }
}
