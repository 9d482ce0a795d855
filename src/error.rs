// Error types shared by the RSA core and the session protocol

use std::time::Duration;

use thiserror::Error;

/// Errors produced by key generation, RSA, codecs and the session layer
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Plaintext integer is not below the modulus
    #[error("message too large: {message_bits}-bit message for a {modulus_bits}-bit modulus")]
    MessageTooLarge { message_bits: u64, modulus_bits: u64 },

    #[error("ciphertext is not below the modulus")]
    CiphertextOutOfRange,

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Symmetric decryption detected a modified ciphertext or nonce
    #[error("authentication failure: ciphertext or nonce was tampered with")]
    AuthenticationFailure,

    #[error("no prime found after {attempts} candidates")]
    PrimalityExhausted { attempts: u64 },

    #[error("key generation timed out after {elapsed:?}")]
    KeyGenerationTimeout { elapsed: Duration },

    #[error("key generation worker stopped before producing a key")]
    KeyGenerationAborted,

    #[error("no async runtime available: {0}")]
    RuntimeUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("wire format error: {0}")]
    Wire(#[from] serde_json::Error),
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        CryptoError::Decoding(e.to_string())
    }
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, CryptoError>;
