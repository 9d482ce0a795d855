// Key generation configuration

use std::time::Duration;

use crate::error::{CryptoError, Result};

/// Fixed public exponent used by every identity
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Miller-Rabin rounds used for key generation (false positive bound 4^-40)
pub const DEFAULT_PRIMALITY_ROUNDS: u32 = 40;

/// Smallest modulus accepted by `validate`
pub const MIN_MODULUS_BITS: u32 = 512;

/// Configuration for RSA key pair generation
#[derive(Clone, Debug)]
pub struct KeyGenConfig {
    /// Size of the modulus in bits; each prime gets half
    pub modulus_bits: u32,
    pub primality_rounds: u32,
    /// Ceiling on prime candidates sampled in total
    pub max_attempts: Option<u64>,
    /// Wall-clock ceiling for the whole generation
    pub timeout: Option<Duration>,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            modulus_bits: 2048,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            max_attempts: Some(100_000),
            timeout: None,
        }
    }
}

impl KeyGenConfig {
    pub fn with_modulus_bits(mut self, bits: u32) -> Self {
        self.modulus_bits = bits;
        self
    }

    pub fn with_primality_rounds(mut self, rounds: u32) -> Self {
        self.primality_rounds = rounds;
        self
    }

    pub fn with_max_attempts(mut self, attempts: Option<u64>) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bits per prime factor
    pub fn prime_bits(&self) -> u32 {
        self.modulus_bits / 2
    }

    /// Reject settings that cannot produce a usable key pair
    pub fn validate(&self) -> Result<()> {
        if self.modulus_bits < MIN_MODULUS_BITS {
            return Err(CryptoError::InvalidConfig(format!(
                "modulus must be at least {} bits, got {}",
                MIN_MODULUS_BITS, self.modulus_bits
            )));
        }
        if self.modulus_bits % 2 != 0 {
            return Err(CryptoError::InvalidConfig(
                "modulus bit length must be even (p and q have equal bit length)".to_string(),
            ));
        }
        if self.primality_rounds == 0 {
            return Err(CryptoError::InvalidConfig(
                "at least one Miller-Rabin round is required".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(CryptoError::InvalidConfig(
                "max_attempts must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
