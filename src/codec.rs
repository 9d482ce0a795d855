// Codec
// Big-endian bytes, non-negative big integers and standard padded base64

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{CryptoError, Result};
use crate::rsa::bigint::RsaBigInt;

/// Interpret bytes as a big-endian non-negative integer
pub fn bytes_to_bigint(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Minimal big-endian bytes of `value`; zero encodes as a single `0x00`
pub fn bigint_to_bytes(value: &RsaBigInt) -> Vec<u8> {
    value.to_bytes_be()
}

pub fn bytes_to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn base64_to_bytes(text: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(text.trim())?)
}

pub fn bigint_to_base64(value: &RsaBigInt) -> String {
    bytes_to_base64(&bigint_to_bytes(value))
}

/// Decode base64 text into an integer; empty input is a decoding error
pub fn base64_to_bigint(text: &str) -> Result<RsaBigInt> {
    let bytes = base64_to_bytes(text)?;
    if bytes.is_empty() {
        return Err(CryptoError::Decoding("empty integer encoding".to_string()));
    }
    Ok(bytes_to_bigint(&bytes))
}

/// Decode base64 text that must hold exactly `N` bytes
pub fn base64_to_array<const N: usize>(text: &str) -> Result<[u8; N]> {
    let bytes = base64_to_bytes(text)?;
    bytes.as_slice().try_into().map_err(|_| {
        CryptoError::Decoding(format!("expected {} bytes, got {}", N, bytes.len()))
    })
}
