// RSA Encryption Implementation
// Textbook RSA: c = m^e mod n, no padding and no block splitting

use tracing::trace;

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPublicKey;
use super::padding::{frame_payload, max_framed_payload};
use crate::codec::bytes_to_bigint;
use crate::error::{CryptoError, Result};

/// Encrypt a message integer; requires m < n
pub fn encrypt_integer(m: &RsaBigInt, public_key: &RsaPublicKey) -> Result<RsaBigInt> {
    if m >= &public_key.n {
        return Err(CryptoError::MessageTooLarge {
            message_bits: m.bits(),
            modulus_bits: public_key.n.bits(),
        });
    }

    Ok(mod_pow(m, &public_key.e, &public_key.n))
}

/// Encrypt bytes read as a big-endian integer
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<RsaBigInt> {
    let m = bytes_to_bigint(plaintext);
    encrypt_integer(&m, public_key)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Result<RsaBigInt> {
    encrypt_bytes(plaintext.as_bytes(), public_key)
}

/// Frame `payload` with a length header, then encrypt it
pub fn encrypt_framed(payload: &[u8], public_key: &RsaPublicKey) -> Result<RsaBigInt> {
    let capacity = max_framed_payload(public_key.bit_length());
    if payload.len() > capacity {
        return Err(CryptoError::MessageTooLarge {
            message_bits: (payload.len() as u64) * 8,
            modulus_bits: public_key.bit_length(),
        });
    }

    trace!(len = payload.len(), capacity, "encrypting framed payload");
    let framed = frame_payload(payload)?;
    encrypt_bytes(&framed, public_key)
}
