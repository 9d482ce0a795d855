// Text-safe records exchanged between the two parties

use serde::{Deserialize, Serialize};

use crate::codec::{
    base64_to_array, base64_to_bigint, base64_to_bytes, bigint_to_base64, bytes_to_base64,
};
use crate::error::Result;
use crate::rsa::RsaBigInt;
use crate::symmetric::{SealedBox, NONCE_SIZE};

/// RSA ciphertext carrying the session key, base64 encoded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrappedKey(pub String);

impl WrappedKey {
    pub fn from_ciphertext(c: &RsaBigInt) -> Self {
        Self(bigint_to_base64(c))
    }

    pub fn ciphertext(&self) -> Result<RsaBigInt> {
        base64_to_bigint(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One symmetric message: base64 ciphertext and nonce
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    pub ciphertext: String,
    pub nonce: String,
}

impl EncryptedEnvelope {
    pub fn from_sealed(sealed: &SealedBox) -> Self {
        Self {
            ciphertext: bytes_to_base64(&sealed.ciphertext),
            nonce: bytes_to_base64(&sealed.nonce),
        }
    }

    pub fn to_sealed(&self) -> Result<SealedBox> {
        Ok(SealedBox {
            ciphertext: base64_to_bytes(&self.ciphertext)?,
            nonce: base64_to_array::<NONCE_SIZE>(&self.nonce)?,
        })
    }
}

/// Everything that crosses the transport, tagged by kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolMessage {
    SessionKey { wrapped_key: WrappedKey },
    Message { envelope: EncryptedEnvelope },
}

impl ProtocolMessage {
    /// JSON text form
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_wire(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolMessage::SessionKey { .. } => "session_key",
            ProtocolMessage::Message { .. } => "message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_wrapped_key_text() {
        let wrapped = WrappedKey::from_ciphertext(&from_u64(65537));
        assert_eq!(wrapped.as_str(), "AQAB");
        assert_eq!(wrapped.ciphertext().unwrap(), from_u64(65537));
    }

    #[test]
    fn test_envelope_rejects_short_nonce() {
        let envelope = EncryptedEnvelope {
            ciphertext: "QUJD".to_string(),
            nonce: "QUJD".to_string(),
        };
        assert!(matches!(envelope.to_sealed(), Err(CryptoError::Decoding(_))));
    }

    #[test]
    fn test_wire_format() {
        let message = ProtocolMessage::SessionKey {
            wrapped_key: WrappedKey("AQAB".to_string()),
        };
        let wire = message.to_wire().unwrap();
        assert_eq!(wire, r#"{"type":"session_key","wrapped_key":"AQAB"}"#);
        assert_eq!(ProtocolMessage::from_wire(&wire).unwrap(), message);

        let message = ProtocolMessage::Message {
            envelope: EncryptedEnvelope {
                ciphertext: "QUJD".to_string(),
                nonce: "AAAAAAAAAAAAAAAA".to_string(),
            },
        };
        let wire = message.to_wire().unwrap();
        assert_eq!(
            wire,
            r#"{"type":"message","envelope":{"ciphertext":"QUJD","nonce":"AAAAAAAAAAAAAAAA"}}"#
        );
        assert_eq!(ProtocolMessage::from_wire(&wire).unwrap().kind(), "message");
    }

    #[test]
    fn test_bad_wire_text() {
        assert!(matches!(
            ProtocolMessage::from_wire("{\"type\":\"bogus\"}"),
            Err(CryptoError::Wire(_))
        ));
    }
}
