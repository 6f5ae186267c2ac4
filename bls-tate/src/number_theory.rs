//! Integer helpers: gcd, modular inverse, primality and factorization.
//!
//! All inputs here are small (the field characteristic and the curve's group
//! order), so plain trial division is enough.

use crate::error::{BlsError, Result};

/// Greatest common divisor (always non-negative).
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a as i64
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` with `a*x + b*y = g = gcd(a, b)`.
pub fn extended_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    let (mut old_r, mut r) = (a as i128, b as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);

    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }

    if old_r < 0 {
        (old_r, old_s, old_t) = (-old_r, -old_s, -old_t);
    }
    (old_r as i64, old_s as i64, old_t as i64)
}

/// Inverse of `a` modulo `m`, in `[0, m)`.
pub fn mod_inverse(a: i64, m: i64) -> Result<i64> {
    let (g, x, _) = extended_gcd(a.rem_euclid(m), m);
    if g != 1 {
        return Err(BlsError::arithmetic(format!(
            "{} is not invertible modulo {}",
            a, m
        )));
    }
    Ok(x.rem_euclid(m))
}

/// Deterministic trial-division primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Prime factors with multiplicity, ascending. `prime_factors(12) == [2, 2, 3]`.
pub fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }
    while n % 2 == 0 {
        factors.push(2);
        n /= 2;
    }
    let mut d = 3u64;
    while d <= n / d {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
        d += 2;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Distinct prime factors, ascending.
pub fn distinct_prime_factors(n: u64) -> Vec<u64> {
    let mut factors = prime_factors(n);
    factors.dedup();
    factors
}

/// Largest prime factor; the order `r` of the signing subgroup.
pub fn largest_prime_factor(n: u64) -> Result<u64> {
    prime_factors(n)
        .last()
        .copied()
        .ok_or_else(|| BlsError::validation(format!("{} has no prime factors", n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_division_near_u64_max() {
        // d * d would overflow here
        assert!(!is_prime(u64::MAX));
        assert_eq!(
            prime_factors(u64::MAX),
            vec![3, 5, 17, 257, 641, 65537, 6700417]
        );
        // 2^32 - 5
        assert!(is_prime(4294967291));
        assert_eq!(largest_prime_factor(2 * 4294967291).unwrap(), 4294967291);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 8), 4);
        assert_eq!(gcd(8, 12), 4);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(0, 9), 9);
        assert_eq!(gcd(-12, 18), 6);
    }

    #[test]
    fn test_extended_gcd_bezout() {
        for (a, b) in [(35, 15), (240, 46), (17, 103), (0, 5), (7, 0)] {
            let (g, x, y) = extended_gcd(a, b);
            assert_eq!(g, gcd(a, b));
            assert_eq!(a * x + b * y, g);
        }
        assert_eq!(extended_gcd(35, 15).0, 5);
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!(mod_inverse(3, 7).unwrap(), 5);
        let inv = mod_inverse(-4, 103).unwrap();
        assert_eq!((inv * 99) % 103, 1);
        assert!(matches!(mod_inverse(6, 9), Err(BlsError::Arithmetic(_))));
        assert!(mod_inverse(0, 103).is_err());
    }

    #[test]
    fn test_is_prime() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(103));
        assert!(!is_prime(104));
        assert!(!is_prime(91)); // 7 * 13
        assert!(is_prime(1_000_003));
    }

    #[test]
    fn test_prime_factors() {
        assert_eq!(prime_factors(12), vec![2, 2, 3]);
        assert_eq!(prime_factors(13), vec![13]);
        assert_eq!(prime_factors(104), vec![2, 2, 2, 13]);
        assert!(prime_factors(1).is_empty());
        assert_eq!(distinct_prime_factors(104), vec![2, 13]);
    }

    #[test]
    fn test_largest_prime_factor() {
        assert_eq!(largest_prime_factor(104).unwrap(), 13);
        assert_eq!(largest_prime_factor(97).unwrap(), 97);
        assert!(largest_prime_factor(1).is_err());
    }
}
