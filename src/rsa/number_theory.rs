// RSA Number Theory
// Machine-word arithmetic for the legacy engine: gcd, inverses,
// overflow-safe modular multiplication/exponentiation and small primes

use std::ops::Range;

use rand::Rng;

use crate::error::{RsaError, RsaResult};

/// Greatest common divisor. `gcd(0, 0)` is 0.
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd
///
/// Iterative; yields the same Bézout coefficients as the textbook
/// recursion `ext(b, a % b)` with truncating division.
pub fn extended_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    // i128 keeps q * s from overflowing on the way; the final
    // coefficients are bounded by |a| and |b|.
    let (mut old_r, mut r) = (a as i128, b as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);

    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }

    (old_r as i64, old_s as i64, old_t as i64)
}

/// Compute modular inverse: a^(-1) mod m
pub fn mod_inverse(a: u64, m: u64) -> RsaResult<u64> {
    if m == 0 {
        return Err(RsaError::invalid("modulus must be positive"));
    }
    let (sa, sm) = match (i64::try_from(a), i64::try_from(m)) {
        (Ok(sa), Ok(sm)) => (sa, sm),
        _ => {
            return Err(RsaError::BitBudgetExceeded {
                what: "modular inverse operand",
                bits: bit_length(a.max(m)),
                budget: 63,
            })
        }
    };

    let (g, x, _) = extended_gcd(sa, sm);
    if g != 1 {
        return Err(RsaError::NoInverse { a, m });
    }

    Ok(x.rem_euclid(sm) as u64)
}

/// (a * b) mod m without overflow, for any m > 0.
///
/// Widens to u128 so the product of two values just below a 64-bit
/// modulus still fits.
pub fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    let m = m as u128;
    ((a as u128 % m) * (b as u128 % m) % m) as u64
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply on top of `mod_mul`
///
/// Negative bases are brought into [0, modulus) first. Panics if
/// `modulus` is zero, like integer `%`.
pub fn mod_pow(base: i64, exponent: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }

    let mut result = 1u64;
    let mut base = (base as i128).rem_euclid(modulus as i128) as u64;
    let mut exp = exponent;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, modulus);
        }
        base = mod_mul(base, base, modulus);
        exp >>= 1;
    }

    result
}

/// Deterministic trial division up to sqrt(n), skipping multiples of 2 and 3.
///
/// Exact for every u64 but only fast for the small primes the legacy
/// generator draws; not a substitute for Miller-Rabin on large numbers.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5u64;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }

    true
}

/// Draw odd candidates uniformly from `range` until one is prime.
///
/// `max_draws` bounds the search so a range without primes fails with
/// `KeyGenerationExhausted` instead of spinning.
pub fn generate_prime<R: Rng + ?Sized>(
    range: Range<u64>,
    max_draws: u32,
    rng: &mut R,
) -> RsaResult<u64> {
    if range.start < 2 || range.end <= range.start {
        return Err(RsaError::invalid(format!(
            "prime range {}..{} is empty or below 2",
            range.start, range.end
        )));
    }

    for _ in 0..max_draws {
        let mut candidate = rng.gen_range(range.clone());
        if candidate % 2 == 0 {
            candidate += 1;
        }
        if candidate >= range.end {
            continue;
        }
        if is_prime(candidate) {
            return Ok(candidate);
        }
    }

    Err(RsaError::KeyGenerationExhausted { attempts: max_draws })
}

/// Number of significant bits in `n` (0 for 0).
pub fn bit_length(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::{BigInt, BigUint};
    use num_integer::Integer;
    use num_traits::ToPrimitive;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(48, 18), 6);
        assert_eq!(gcd(65537, 3120), 1);
    }

    #[test]
    fn test_extended_gcd_matches_recursive_form() {
        // Textbook recursion gives (2, -9, 47) for (240, 46)
        assert_eq!(extended_gcd(240, 46), (2, -9, 47));

        for &(a, b) in &[(17i64, 3120i64), (3120, 17), (65537, 999_999_000_000), (1, 1), (0, 5)] {
            let (g, x, y) = extended_gcd(a, b);
            assert_eq!(
                a as i128 * x as i128 + b as i128 * y as i128,
                g as i128,
                "bezout identity for ({}, {})",
                a,
                b
            );
            let oracle = BigInt::from(a).extended_gcd(&BigInt::from(b));
            assert_eq!(BigInt::from(g), oracle.gcd);
        }
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7
        assert_eq!(mod_inverse(3, 7).unwrap(), 5);
        assert_eq!(mod_inverse(17, 3120).unwrap(), 2753);
        assert_eq!(mod_inverse(5, 1).unwrap(), 0);
    }

    #[test]
    fn test_mod_inverse_missing() {
        let err = mod_inverse(6, 9).unwrap_err();
        assert!(matches!(err, RsaError::NoInverse { a: 6, m: 9 }));
        assert!(matches!(mod_inverse(3, 0), Err(RsaError::InvalidArgument(_))));
    }

    #[test]
    fn test_mod_mul_near_limit() {
        let m = (1u64 << 63) - 25; // largest 63-bit prime
        let a = m - 1;
        let b = m - 2;
        let expected = (BigUint::from(a) * BigUint::from(b)) % BigUint::from(m);
        assert_eq!(mod_mul(a, b, m), expected.to_u64().unwrap());
        assert_eq!(mod_mul(u64::MAX, u64::MAX, u64::MAX - 1), 1);
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        assert_eq!(mod_pow(3, 5, 7), 5);
        assert_eq!(mod_pow(65, 17, 3233), 2790);
        assert_eq!(mod_pow(2790, 2753, 3233), 65);
        assert_eq!(mod_pow(12345, 0, 97), 1);
        assert_eq!(mod_pow(12345, 99, 1), 0);
    }

    #[test]
    fn test_mod_pow_negative_base() {
        // -2 ≡ 5 (mod 7)
        assert_eq!(mod_pow(-2, 3, 7), mod_pow(5, 3, 7));
        assert_eq!(mod_pow(i64::MIN, 1, 10), (i64::MIN as i128).rem_euclid(10) as u64);
    }

    #[test]
    fn test_mod_pow_against_oracle() {
        let m = 999_999_937u64 * 999_999_929u64;
        let base = 0x1234_5678_9abc_def0i64 % m as i64;
        let exp = 0x0fed_cba9_8765_4321u64;
        let expected = BigUint::from(base as u64).modpow(&BigUint::from(exp), &BigUint::from(m));
        assert_eq!(mod_pow(base, exp, m), expected.to_u64().unwrap());
    }

    #[test]
    fn test_is_prime() {
        let primes = [2u64, 3, 5, 7, 11, 13, 53, 61, 65537, 999_999_937];
        for p in primes {
            assert!(is_prime(p), "{} should be prime", p);
        }
        let composites = [0u64, 1, 4, 9, 25, 35, 49, 3233, 999_999_937 * 3];
        for c in composites {
            assert!(!is_prime(c), "{} should be composite", c);
        }
    }

    #[test]
    fn test_generate_prime_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let p = generate_prime(100_000_000..1_000_000_000, 10_000, &mut rng).unwrap();
            assert!((100_000_000..1_000_000_000).contains(&p));
            assert!(is_prime(p));
        }
    }

    #[test]
    fn test_generate_prime_without_primes() {
        let mut rng = StdRng::seed_from_u64(1);
        // 24..28 holds no prime
        let err = generate_prime(24..28, 50, &mut rng).unwrap_err();
        assert!(matches!(err, RsaError::KeyGenerationExhausted { attempts: 50 }));
        assert!(matches!(generate_prime(0..1, 50, &mut rng), Err(RsaError::InvalidArgument(_))));
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(3233), 12);
        assert_eq!(bit_length(i64::MAX as u64), 63);
    }
}
