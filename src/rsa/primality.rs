// Miller-Rabin primality testing
//
// A `true` result is a confidence claim: a composite survives k independent
// rounds with probability at most 4^-k.

use num_integer::Integer;
use num_traits::{One, Zero};

use super::bigint::{mod_pow, random_in_range, RsaBigInt};

/// Primes used to discard most candidates before running Miller-Rabin
const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Miller-Rabin primality test
/// Returns true if n is probably prime after `rounds` random witnesses
pub fn is_probable_prime(n: &RsaBigInt, rounds: u32) -> bool {
    let two = RsaBigInt::from(2u8);
    let three = RsaBigInt::from(3u8);

    if n <= &RsaBigInt::one() {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let n_minus_two = n - 2u8;

    for _ in 0..rounds {
        let a = random_in_range(&two, &n_minus_two);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut reached_minus_one = false;
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                reached_minus_one = true;
                break;
            }
            // Non-trivial square root of 1
            if x.is_one() {
                return false;
            }
        }

        if !reached_minus_one {
            return false;
        }
    }

    true
}

/// Cheap pre-filter: false when a small prime properly divides `n`
pub fn passes_trial_division(n: &RsaBigInt) -> bool {
    for &p in SMALL_PRIMES.iter() {
        let p = RsaBigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_is_probable_prime() {
        for p in [2u64, 3, 5, 7, 97, 7919, 65537] {
            for _ in 0..20 {
                assert!(is_probable_prime(&from_u64(p), 40), "{p} should be prime");
            }
        }
    }

    #[test]
    fn test_composites() {
        // 221 = 13 * 17, 561 is the smallest Carmichael number
        for c in [4u64, 9, 15, 221, 561, 1105, 7917] {
            for _ in 0..20 {
                assert!(!is_probable_prime(&from_u64(c), 40), "{c} should be composite");
            }
        }
    }

    #[test]
    fn test_trivial_inputs() {
        assert!(!is_probable_prime(&from_u64(0), 40));
        assert!(!is_probable_prime(&from_u64(1), 40));
        assert!(!is_probable_prime(&from_u64(1 << 20), 40));
    }

    #[test]
    fn test_large_known_prime() {
        // 2^127 - 1 (Mersenne prime)
        let m127 = (RsaBigInt::one() << 127u32) - 1u8;
        assert!(is_probable_prime(&m127, 40));
        // 2^128 + 1 = 59649589127497217 * 5704689200685129054721
        let f7 = (RsaBigInt::one() << 128u32) + 1u8;
        assert!(!is_probable_prime(&f7, 40));
    }

    #[test]
    fn test_trial_division() {
        assert!(passes_trial_division(&from_u64(251)));
        assert!(passes_trial_division(&from_u64(257)));
        assert!(!passes_trial_division(&from_u64(253)));
        assert!(!passes_trial_division(&from_u64(561)));
    }
}
