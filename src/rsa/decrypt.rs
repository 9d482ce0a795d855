// RSA Decryption Implementation
// m = c^d mod n, returned as minimal big-endian bytes

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPrivateKey;
use super::padding::unframe_payload;
use crate::codec::bigint_to_bytes;
use crate::error::{CryptoError, Result};

/// Decrypt a ciphertext integer; requires c < n
pub fn decrypt_integer(c: &RsaBigInt, private_key: &RsaPrivateKey) -> Result<RsaBigInt> {
    if c >= &private_key.n {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    Ok(mod_pow(c, &private_key.d, &private_key.n))
}

/// Decrypt to the minimal big-endian bytes of the message integer
///
/// No bytes are stripped. A plaintext that started with 0x00 comes back
/// without it, since the integer mapping cannot represent leading zeros; use
/// the framed variants when that matters.
pub fn decrypt_bytes(c: &RsaBigInt, private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let m = decrypt_integer(c, private_key)?;
    Ok(bigint_to_bytes(&m))
}

/// Decrypt ciphertext to a string
pub fn decrypt_to_string(c: &RsaBigInt, private_key: &RsaPrivateKey) -> Result<String> {
    let plaintext = decrypt_bytes(c, private_key)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::Decoding(format!("invalid UTF-8: {}", e)))
}

/// Decrypt and remove the length-prefixed frame
pub fn decrypt_framed(c: &RsaBigInt, private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let block = decrypt_bytes(c, private_key)?;
    unframe_payload(&block)
}
