// Length-prefixed framing for RSA payloads
//
// Format: 0x01 || len (u16, big-endian) || payload
//
// Textbook RSA maps bytes to an integer, which drops leading zero bytes. The
// non-zero marker keeps the payload's own leading bytes intact and the length
// header lets the receiver reject anything that did not decrypt cleanly.

use crate::error::{CryptoError, Result};

/// First byte of every framed block
pub const FRAME_MARKER: u8 = 0x01;

/// Marker byte plus the two length bytes
pub const FRAME_HEADER_LEN: usize = 3;

/// Largest payload whose frame stays below a modulus of `modulus_bits` bits
///
/// A frame of `len + 3` bytes starting with 0x01 has `8 * (len + 2) + 1`
/// bits; keeping it at least one bit shorter than the modulus guarantees the
/// integer is smaller than `n`.
pub fn max_framed_payload(modulus_bits: u64) -> usize {
    let by_modulus = (modulus_bits.saturating_sub(2) / 8).saturating_sub(2);
    (by_modulus as usize).min(u16::MAX as usize)
}

/// Wrap `payload` in a frame
pub fn frame_payload(payload: &[u8]) -> Result<Vec<u8>> {
    let len = u16::try_from(payload.len()).map_err(|_| CryptoError::MessageTooLarge {
        message_bits: (payload.len() as u64) * 8,
        modulus_bits: u64::from(u16::MAX) * 8,
    })?;

    let mut framed = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    framed.push(FRAME_MARKER);
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// Validate a frame and return its payload
pub fn unframe_payload(block: &[u8]) -> Result<Vec<u8>> {
    if block.len() < FRAME_HEADER_LEN {
        return Err(CryptoError::Decoding(format!(
            "frame too short: {} bytes",
            block.len()
        )));
    }
    if block[0] != FRAME_MARKER {
        return Err(CryptoError::Decoding(format!(
            "bad frame marker 0x{:02x}",
            block[0]
        )));
    }

    let declared = usize::from(u16::from_be_bytes([block[1], block[2]]));
    let payload = &block[FRAME_HEADER_LEN..];
    if payload.len() != declared {
        return Err(CryptoError::Decoding(format!(
            "frame length mismatch: header says {}, found {}",
            declared,
            payload.len()
        )));
    }

    Ok(payload.to_vec())
}

/// Legacy decode heuristic: drop the first byte when it is 0x00..=0x1F
///
/// Kept only for interoperating with peers that send unframed text. It
/// corrupts any payload that legitimately starts with a control byte.
pub fn strip_leading_control_byte(bytes: &[u8]) -> Vec<u8> {
    match bytes.split_first() {
        Some((&first, rest)) if first <= 31 => rest.to_vec(),
        _ => bytes.to_vec(),
    }
}
