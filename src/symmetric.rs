// Symmetric Cipher
// AES-256-GCM session keys with a fresh 12-byte nonce per message

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};

/// Session key size in bytes
pub const KEY_SIZE: usize = 32;

/// Nonce size for AES-GCM
pub const NONCE_SIZE: usize = 12;

/// Raw symmetric key for one session; wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    bytes: [u8; KEY_SIZE],
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

impl SessionKey {
    /// Fresh random key from the OS generator
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Raw key bytes
    pub fn export(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    pub fn import(raw: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_SIZE] = raw.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: raw.len(),
        })?;
        Ok(Self { bytes })
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.bytes))
    }
}

/// Ciphertext (with tag) and the nonce it was sealed under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedBox {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_SIZE],
}

/// Encrypt under a fresh random nonce
pub fn encrypt(plaintext: &[u8], key: &SessionKey) -> Result<SealedBox> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    // Only fails when the plaintext exceeds the GCM length limit
    let ciphertext = key
        .cipher()
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(SealedBox { ciphertext, nonce })
}

pub fn decrypt(ciphertext: &[u8], key: &SessionKey, nonce: &[u8; NONCE_SIZE]) -> Result<Vec<u8>> {
    key.cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}
