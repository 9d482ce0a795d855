// Identity Records
// Plain data handed to callers for persistence; the public exponent is implicit (65537)

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::codec::{base64_to_bigint, bigint_to_base64};
use crate::config::PUBLIC_EXPONENT;
use crate::error::{CryptoError, Result};
use crate::rsa::bigint::{from_u64, RsaBigInt};
use crate::rsa::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};

/// Private half of an identity: base64 `n` and `d`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub modulus: String,
    pub private_exponent: String,
}

/// Published half of an identity: base64 `n`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub modulus: String,
}

impl std::fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("modulus", &self.modulus)
            .finish_non_exhaustive()
    }
}

fn decode_modulus(text: &str) -> Result<RsaBigInt> {
    let n = base64_to_bigint(text)?;
    if n <= RsaBigInt::one() {
        return Err(CryptoError::Decoding("modulus must be greater than 1".to_string()));
    }
    Ok(n)
}

impl IdentityRecord {
    pub fn private_key(&self) -> Result<RsaPrivateKey> {
        let n = decode_modulus(&self.modulus)?;
        let d = base64_to_bigint(&self.private_exponent)?;
        if d.is_zero() || d >= n {
            return Err(CryptoError::Decoding(
                "private exponent out of range".to_string(),
            ));
        }
        Ok(RsaPrivateKey { n, d })
    }

    pub fn public_identity(&self) -> PublicIdentity {
        PublicIdentity {
            modulus: self.modulus.clone(),
        }
    }
}

impl PublicIdentity {
    /// Public key with the fixed exponent
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        Ok(RsaPublicKey {
            n: decode_modulus(&self.modulus)?,
            e: from_u64(PUBLIC_EXPONENT),
        })
    }
}

impl RsaKeyPair {
    /// Records carry no exponent, so only keys using the fixed one can be exported
    fn ensure_fixed_exponent(&self) -> Result<()> {
        if self.public_key.e != from_u64(PUBLIC_EXPONENT) {
            return Err(CryptoError::InvalidConfig(format!(
                "identity records require public exponent {}, key uses {}",
                PUBLIC_EXPONENT, self.public_key.e
            )));
        }
        Ok(())
    }

    /// Persistable form of this key pair
    pub fn to_identity_record(&self) -> Result<IdentityRecord> {
        self.ensure_fixed_exponent()?;
        Ok(IdentityRecord {
            modulus: bigint_to_base64(&self.private_key.n),
            private_exponent: bigint_to_base64(&self.private_key.d),
        })
    }

    pub fn to_public_identity(&self) -> Result<PublicIdentity> {
        self.ensure_fixed_exponent()?;
        Ok(PublicIdentity {
            modulus: bigint_to_base64(&self.public_key.n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyGenConfig;
    use crate::rsa::generate_keypair;
    use crate::rsa::keygen::derive_keypair;

    #[test]
    fn test_record_restores_keys() {
        let keypair = generate_keypair(&KeyGenConfig::default().with_modulus_bits(512)).unwrap();
        let record = keypair.to_identity_record().unwrap();

        assert_eq!(record.private_key().unwrap(), keypair.private_key);
        assert_eq!(record.public_identity(), keypair.to_public_identity().unwrap());
        assert_eq!(
            keypair.to_public_identity().unwrap().public_key().unwrap(),
            keypair.public_key
        );
    }

    #[test]
    fn test_refuses_export_with_other_exponent() {
        // e = 17 would be replaced by 65537 on reload, breaking the key pair
        let keypair = derive_keypair(from_u64(61), from_u64(53), &from_u64(17)).unwrap();

        assert!(matches!(
            keypair.to_identity_record(),
            Err(CryptoError::InvalidConfig(_))
        ));
        assert!(matches!(
            keypair.to_public_identity(),
            Err(CryptoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_record_serde() {
        let record = IdentityRecord {
            modulus: "DKE=".to_string(),
            private_exponent: "AZ0=".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"modulus":"DKE=","private_exponent":"AZ0="}"#);
        let back: IdentityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        // n = 3233, d = 413
        let key = back.private_key().unwrap();
        assert_eq!(key.n, from_u64(3233));
        assert_eq!(key.d, from_u64(413));
    }

    #[test]
    fn test_rejects_bad_records() {
        let bad_base64 = PublicIdentity {
            modulus: "%%%".to_string(),
        };
        assert!(matches!(bad_base64.public_key(), Err(CryptoError::Decoding(_))));

        let trivial_modulus = PublicIdentity {
            modulus: "AQ==".to_string(),
        };
        assert!(trivial_modulus.public_key().is_err());

        let zero_exponent = IdentityRecord {
            modulus: "DKE=".to_string(),
            private_exponent: "AA==".to_string(),
        };
        assert!(zero_exponent.private_key().is_err());
    }

    #[test]
    fn test_debug_hides_private_exponent() {
        let record = IdentityRecord {
            modulus: "DKE=".to_string(),
            private_exponent: "AZ0=".to_string(),
        };
        assert!(!format!("{:?}", record).contains("AZ0="));
    }
}
