// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific arithmetic and sampling

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::RngCore;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
/// Right-to-left square-and-multiply; `result * base^exp` stays congruent to
/// the final answer on every iteration
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
///
/// Iterative, so stack depth does not grow with the size of the inputs.
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    let mut old_r = BigInt::from(a.clone());
    let mut r = BigInt::from(b.clone());
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();
    let mut old_t = BigInt::zero();
    let mut t = BigInt::one();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    // Remainders of non-negative inputs stay non-negative
    let (_, gcd) = old_r.into_parts();
    (gcd, old_s, old_t)
}

/// Compute modular inverse: a^(-1) mod m, normalized into [0, m)
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let (gcd, x, _) = extended_gcd(a, m);
    if !gcd.is_one() {
        return None;
    }

    // The Bezout coefficient may be negative
    let normalized = x.mod_floor(&BigInt::from(m.clone()));
    normalized.to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    extended_gcd(a, b).0
}

/// Least common multiple
pub fn lcm(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    if a.is_zero() || b.is_zero() {
        return RsaBigInt::zero();
    }
    (a * b) / gcd(a, b)
}

/// Random integer in [min, max] from the OS generator
///
/// Draws enough bytes to cover the range and reduces modulo the range size,
/// so ranges that are not a power of two are slightly biased toward the low
/// end. Good enough for picking Miller-Rabin witnesses; not for anything that
/// needs a uniform distribution. `max < min` collapses to `min`.
pub fn random_in_range(min: &RsaBigInt, max: &RsaBigInt) -> RsaBigInt {
    if max <= min {
        return min.clone();
    }

    let range = max - min + 1u8;
    let byte_len = ((range.bits() + 7) / 8) as usize;

    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    let value = RsaBigInt::from_bytes_be(&bytes);

    min + (value % range)
}

/// `ceil(bit_length / 8)` random bytes from the OS generator, read big-endian
pub fn secure_random_bits(bit_length: u32) -> RsaBigInt {
    let byte_len = bit_length.div_ceil(8) as usize;
    if byte_len == 0 {
        return RsaBigInt::zero();
    }

    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    RsaBigInt::from_bytes_be(&bytes)
}
