// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use num_traits::One;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::bigint::{from_u64, lcm, mod_inverse, secure_random_bits, RsaBigInt};
use super::primality::{is_probable_prime, passes_trial_division};
use crate::config::{KeyGenConfig, PUBLIC_EXPONENT};
use crate::error::{CryptoError, Result};

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent, reduced mod λ(n)
}

/// RSA Key Pair (both public and private keys)
#[derive(Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub bit_length: u32,
    p: RsaBigInt,
    q: RsaBigInt,
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Short hex prefix of the modulus, for logs
    pub fn fingerprint(&self) -> String {
        let bytes = self.n.to_bytes_be();
        hex::encode(&bytes[..bytes.len().min(8)])
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<RsaBigInt> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &RsaBigInt) -> Result<Vec<u8>> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n)
            .field("d", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("public_key", &self.public_key)
            .field("bit_length", &self.bit_length)
            .finish_non_exhaustive()
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u32 {
        self.bit_length
    }

    /// The prime factors (p, q) of the modulus
    pub fn factors(&self) -> (&RsaBigInt, &RsaBigInt) {
        (&self.p, &self.q)
    }

    /// λ(n) = lcm(p-1, q-1)
    pub fn lambda(&self) -> RsaBigInt {
        lcm(&(&self.p - 1u8), &(&self.q - 1u8))
    }
}

/// Build a key pair from two distinct primes
/// Returns None when `e` has no inverse mod λ(n)
pub fn derive_keypair(p: RsaBigInt, q: RsaBigInt, e: &RsaBigInt) -> Option<RsaKeyPair> {
    if p == q {
        return None;
    }

    let n = &p * &q;
    let lambda = lcm(&(&p - 1u8), &(&q - 1u8));
    let d = mod_inverse(e, &lambda)?;
    let bit_length = n.bits() as u32;

    Some(RsaKeyPair {
        public_key: RsaPublicKey {
            n: n.clone(),
            e: e.clone(),
        },
        private_key: RsaPrivateKey { n, d },
        bit_length,
        p,
        q,
    })
}

/// Random odd candidate with exactly `bits` bits; the two top bits are set so
/// the product of two candidates has exactly `2 * bits` bits
fn prime_candidate(bits: u32) -> RsaBigInt {
    let one = RsaBigInt::one();
    let mut candidate = secure_random_bits(bits) % (&one << bits);
    candidate |= &one << (bits - 1);
    candidate |= &one << (bits - 2);
    candidate |= one;
    candidate
}

/// Budgeted prime search shared by both factors of one key
struct PrimeSearch<'a> {
    config: &'a KeyGenConfig,
    started: Instant,
    attempts: u64,
}

impl<'a> PrimeSearch<'a> {
    fn new(config: &'a KeyGenConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            attempts: 0,
        }
    }

    fn check_budget(&self) -> Result<()> {
        if let Some(max) = self.config.max_attempts {
            if self.attempts >= max {
                warn!(attempts = self.attempts, "prime search exhausted its attempt budget");
                return Err(CryptoError::PrimalityExhausted {
                    attempts: self.attempts,
                });
            }
        }
        if let Some(timeout) = self.config.timeout {
            let elapsed = self.started.elapsed();
            if elapsed >= timeout {
                warn!(?elapsed, "key generation timed out");
                return Err(CryptoError::KeyGenerationTimeout { elapsed });
            }
        }
        Ok(())
    }

    fn next_prime(&mut self) -> Result<RsaBigInt> {
        let bits = self.config.prime_bits();
        loop {
            self.check_budget()?;
            self.attempts += 1;

            let candidate = prime_candidate(bits);
            if passes_trial_division(&candidate)
                && is_probable_prime(&candidate, self.config.primality_rounds)
            {
                debug!(bits, attempts = self.attempts, "found probable prime");
                return Ok(candidate);
            }
        }
    }
}

/// Generate an RSA key pair
///
/// Candidates are resampled until two distinct probable primes are found and
/// `e` is invertible mod λ(n). The retry loop is bounded by the config's
/// attempt and time ceilings.
pub fn generate_keypair(config: &KeyGenConfig) -> Result<RsaKeyPair> {
    config.validate()?;

    info!(
        modulus_bits = config.modulus_bits,
        rounds = config.primality_rounds,
        "generating RSA key pair"
    );

    let e = from_u64(PUBLIC_EXPONENT);
    let mut search = PrimeSearch::new(config);

    loop {
        let p = search.next_prime()?;
        let mut q = search.next_prime()?;
        while q == p {
            debug!("second prime equals the first, resampling");
            q = search.next_prime()?;
        }

        match derive_keypair(p, q, &e) {
            Some(keypair) => {
                info!(
                    fingerprint = %keypair.public_key.fingerprint(),
                    attempts = search.attempts,
                    elapsed = ?search.started.elapsed(),
                    "RSA key pair generated"
                );
                return Ok(keypair);
            }
            None => debug!("public exponent not coprime with lambda, resampling both primes"),
        }
    }
}

/// Pending key generation running on the blocking thread pool
pub struct KeyGenHandle {
    inner: JoinHandle<Result<RsaKeyPair>>,
}

impl Future for KeyGenHandle {
    type Output = Result<RsaKeyPair>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => {
                warn!(error = %e, "key generation worker failed");
                Poll::Ready(Err(CryptoError::KeyGenerationAborted))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Start key generation off the caller's thread
/// Must be called from within a Tokio runtime
pub fn spawn_keypair_generation(config: KeyGenConfig) -> Result<KeyGenHandle> {
    config.validate()?;
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| CryptoError::RuntimeUnavailable(e.to_string()))?;
    let inner = runtime.spawn_blocking(move || generate_keypair(&config));
    Ok(KeyGenHandle { inner })
}

/// Generate a key pair on the blocking pool and wait for it
pub async fn generate_keypair_async(config: KeyGenConfig) -> Result<RsaKeyPair> {
    spawn_keypair_generation(config)?.await
}
