// RSA Key Generation (legacy engine)
// Produces {e, d, n} triples whose modulus fits a signed 64-bit word

use std::fmt;
use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::number_theory::{bit_length, gcd, generate_prime, mod_inverse};
use crate::config::LegacyConfig;
use crate::error::{RsaError, RsaResult};

/// Bits available to the modulus and private exponent
pub const MODULUS_BIT_BUDGET: u32 = 63;

/// Bits available to the public exponent
pub const PUBLIC_EXPONENT_BIT_BUDGET: u32 = 32;

/// Textbook RSA key pair on machine words. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyKeyPair {
    public_exponent: u64,
    private_exponent: u64,
    modulus: u64,
}

/// On-disk form of a legacy key: three decimal strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyKeyFile {
    pub public_exponent: String,
    pub private_exponent: String,
    pub modulus: String,
}

impl LegacyKeyPair {
    /// Derive the key pair for two distinct primes and a chosen public exponent
    pub fn from_primes(p: u64, q: u64, public_exponent: u64) -> RsaResult<Self> {
        if p == q {
            return Err(RsaError::invalid("p and q must be distinct"));
        }
        let (modulus, phi) = modulus_and_totient(p, q)?;
        let private_exponent = mod_inverse(public_exponent, phi)?;
        Self::new(public_exponent, private_exponent, modulus)
    }

    /// Build a key from user-supplied decimal strings
    pub fn from_decimal(public_exponent: &str, private_exponent: &str, modulus: &str) -> RsaResult<Self> {
        Self::new(
            parse_decimal("public exponent", public_exponent)?,
            parse_decimal("private exponent", private_exponent)?,
            parse_decimal("modulus", modulus)?,
        )
    }

    fn new(public_exponent: u64, private_exponent: u64, modulus: u64) -> RsaResult<Self> {
        if modulus < 2 {
            return Err(RsaError::invalid("modulus must be at least 2"));
        }
        if public_exponent == 0 || private_exponent == 0 {
            return Err(RsaError::invalid("exponents must be non-zero"));
        }
        check_budget("modulus", modulus, MODULUS_BIT_BUDGET)?;
        check_budget("private exponent", private_exponent, MODULUS_BIT_BUDGET)?;
        check_budget("public exponent", public_exponent, MODULUS_BIT_BUDGET)?;

        Ok(Self {
            public_exponent,
            private_exponent,
            modulus,
        })
    }

    pub fn public_exponent(&self) -> u64 {
        self.public_exponent
    }

    pub fn private_exponent(&self) -> u64 {
        self.private_exponent
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u32 {
        bit_length(self.modulus)
    }

    pub fn to_key_file(&self) -> LegacyKeyFile {
        LegacyKeyFile {
            public_exponent: self.public_exponent.to_string(),
            private_exponent: self.private_exponent.to_string(),
            modulus: self.modulus.to_string(),
        }
    }

    pub fn from_key_file(file: &LegacyKeyFile) -> RsaResult<Self> {
        Self::from_decimal(&file.public_exponent, &file.private_exponent, &file.modulus)
    }
}

impl fmt::Display for LegacyKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RSA Key Information:")?;
        writeln!(f, "Public Key (e): {}", self.public_exponent)?;
        writeln!(f, "Private Key (d): {}", self.private_exponent)?;
        write!(f, "Modulus (n): {}", self.modulus)
    }
}

/// Generates legacy key pairs within the configured retry budget
#[derive(Debug, Clone)]
pub struct LegacyKeyGenerator {
    config: LegacyConfig,
}

impl LegacyKeyGenerator {
    pub fn new(config: LegacyConfig) -> RsaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LegacyConfig {
        &self.config
    }

    /// Generate with the thread-local RNG
    pub fn generate(&self) -> RsaResult<LegacyKeyPair> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate RSA key pair
    ///
    /// Each attempt draws p != q, tries 65537 then the fallback exponents,
    /// and rejects results outside the bit budgets. Fails with
    /// `KeyGenerationExhausted` once `max_attempts` are spent.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> RsaResult<LegacyKeyPair> {
        let range = self.config.prime_range();
        let attempts = self.config.max_attempts;

        for attempt in 1..=attempts {
            match self.try_once(range.clone(), rng)? {
                Some(keypair) => {
                    info!(
                        attempt,
                        modulus_bits = keypair.bit_length(),
                        public_exponent = keypair.public_exponent,
                        "Generated legacy key pair"
                    );
                    return Ok(keypair);
                }
                None => continue,
            }
        }

        Err(RsaError::KeyGenerationExhausted { attempts })
    }

    fn try_once<R: Rng + ?Sized>(&self, range: Range<u64>, rng: &mut R) -> RsaResult<Option<LegacyKeyPair>> {
        let draws = self.config.max_prime_draws;
        let p = generate_prime(range.clone(), draws, rng)?;
        let q = generate_prime(range, draws, rng)?;

        if p == q {
            debug!(p, "Rejected attempt: p == q");
            return Ok(None);
        }

        let (modulus, phi) = match modulus_and_totient(p, q) {
            Ok(values) => values,
            Err(e) => {
                debug!(p, q, error = %e, "Rejected attempt: modulus out of budget");
                return Ok(None);
            }
        };

        let Some(e) = self.select_public_exponent(phi) else {
            debug!(phi, "Rejected attempt: no exponent coprime with phi");
            return Ok(None);
        };

        let d = mod_inverse(e, phi)?;
        if bit_length(d) > MODULUS_BIT_BUDGET || bit_length(e) > PUBLIC_EXPONENT_BIT_BUDGET {
            debug!(d_bits = bit_length(d), e, "Rejected attempt: exponent out of budget");
            return Ok(None);
        }

        LegacyKeyPair::new(e, d, modulus).map(Some)
    }

    /// First exponent below `phi` and coprime with it: the preferred
    /// exponent, then the fallbacks in order.
    pub fn select_public_exponent(&self, phi: u64) -> Option<u64> {
        let preferred = self.config.public_exponent;
        if preferred < phi && gcd(preferred, phi) == 1 {
            return Some(preferred);
        }

        let fallback = self
            .config
            .fallback_exponents
            .iter()
            .copied()
            .find(|&e| e > 1 && e < phi && gcd(e, phi) == 1);
        if let Some(e) = fallback {
            warn!(phi, e, preferred, "Public exponent fell back");
        }
        fallback
    }
}

/// Generate a legacy key pair with default settings
pub fn generate_legacy_keypair() -> RsaResult<LegacyKeyPair> {
    LegacyKeyGenerator::new(LegacyConfig::default())?.generate()
}

fn modulus_and_totient(p: u64, q: u64) -> RsaResult<(u64, u64)> {
    if p < 2 || q < 2 {
        return Err(RsaError::invalid("primes must be at least 2"));
    }
    let modulus = p.checked_mul(q).ok_or(RsaError::BitBudgetExceeded {
        what: "modulus",
        bits: bit_length(p) + bit_length(q),
        budget: MODULUS_BIT_BUDGET,
    })?;
    check_budget("modulus", modulus, MODULUS_BIT_BUDGET)?;
    // (p-1)(q-1) < p*q, so it cannot overflow once the product fits
    Ok((modulus, (p - 1) * (q - 1)))
}

fn check_budget(what: &'static str, value: u64, budget: u32) -> RsaResult<()> {
    let bits = bit_length(value);
    if bits > budget {
        return Err(RsaError::BitBudgetExceeded { what, bits, budget });
    }
    Ok(())
}

fn parse_decimal(what: &str, text: &str) -> RsaResult<u64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(RsaError::invalid(format!("{} is empty", what)));
    }
    cleaned
        .parse::<u64>()
        .map_err(|e| RsaError::invalid(format!("{} '{}' is not a decimal integer: {}", what, cleaned, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_textbook_key() {
        let key = LegacyKeyPair::from_primes(61, 53, 17).unwrap();
        assert_eq!(key.modulus(), 3233);
        assert_eq!(key.public_exponent(), 17);
        assert_eq!(key.private_exponent(), 2753);
    }

    #[test]
    fn test_key_generation() {
        let generator = LegacyKeyGenerator::new(LegacyConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let key = generator.generate_with(&mut rng).unwrap();

        assert!(key.bit_length() <= MODULUS_BIT_BUDGET);
        assert!(key.modulus() >= 100_000_000u64 * 100_000_000);
        assert!(bit_length(key.public_exponent()) <= PUBLIC_EXPONENT_BIT_BUDGET);
    }

    #[test]
    fn test_key_properties_from_primes() {
        // Verify e * d ≡ 1 (mod φ(n)) for a freshly derived key
        let p = 999_999_937u64;
        let q = 999_999_929u64;
        let key = LegacyKeyPair::from_primes(p, q, 65537).unwrap();
        let phi = (p - 1) * (q - 1);

        assert_eq!(gcd(key.public_exponent(), phi), 1);
        let product = key.public_exponent() as u128 * key.private_exponent() as u128;
        assert_eq!(product % phi as u128, 1);
    }

    #[test]
    fn test_exponent_fallback() {
        let generator = LegacyKeyGenerator::new(LegacyConfig::default()).unwrap();
        // 11 * 13: phi = 120, 65537 too large, 3 and 5 share factors
        assert_eq!(generator.select_public_exponent(120), Some(17));
        // 61 * 53: phi = 3120 is divisible by 3 and 5
        assert_eq!(generator.select_public_exponent(3120), Some(17));
        assert_eq!(generator.select_public_exponent(999_999_936 * 999_999_928), Some(65537));
        // 2 * 3: phi = 2, nothing fits
        assert_eq!(generator.select_public_exponent(2), None);
    }

    #[test]
    fn test_exhausted_budget() {
        // Single-digit primes {3, 5, 7}: phi is always even and small,
        // and a one-element exponent list that never fits
        let config = LegacyConfig::default()
            .with_prime_digits(1)
            .with_max_attempts(4)
            .with_public_exponent(65537)
            .with_fallback_exponents(vec![2]);
        let generator = LegacyKeyGenerator::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let err = generator.generate_with(&mut rng).unwrap_err();
        assert!(matches!(err, RsaError::KeyGenerationExhausted { attempts: 4 }));
        assert_eq!(err.kind(), ErrorKind::KeyGenerationExhausted);
    }

    #[test]
    fn test_from_decimal() {
        let key = LegacyKeyPair::from_decimal(" 17\n", "2753", "32 33").unwrap();
        assert_eq!(key, LegacyKeyPair::from_primes(61, 53, 17).unwrap());

        assert!(matches!(LegacyKeyPair::from_decimal("", "2753", "3233"), Err(RsaError::InvalidArgument(_))));
        assert!(matches!(LegacyKeyPair::from_decimal("17", "x", "3233"), Err(RsaError::InvalidArgument(_))));
        assert!(matches!(LegacyKeyPair::from_decimal("17", "2753", "1"), Err(RsaError::InvalidArgument(_))));
        assert!(matches!(
            LegacyKeyPair::from_decimal("17", "2753", "9223372036854775808"),
            Err(RsaError::BitBudgetExceeded { what: "modulus", .. })
        ));
    }

    #[test]
    fn test_key_file_roundtrip() {
        let key = LegacyKeyPair::from_primes(61, 53, 17).unwrap();
        let file = key.to_key_file();
        assert_eq!(file.modulus, "3233");
        assert_eq!(LegacyKeyPair::from_key_file(&file).unwrap(), key);
    }

    #[test]
    fn test_display() {
        let key = LegacyKeyPair::from_primes(61, 53, 17).unwrap();
        let text = key.to_string();
        assert!(text.contains("Public Key (e): 17"));
        assert!(text.contains("Modulus (n): 3233"));
    }
}
