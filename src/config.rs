// Engine configuration
// Built-in defaults; everything can be overridden from TOML

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ciphertext::WireFormat;
use crate::error::{RsaError, RsaResult};
use crate::rsa::padding::PaddingScheme;

pub const MIN_PRODUCTION_KEY_BITS: usize = 512;
pub const MAX_PRODUCTION_KEY_BITS: usize = 16384;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] RsaError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub legacy: LegacyConfig,
    pub production: ProductionConfig,
    pub output: OutputConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> RsaResult<()> {
        self.legacy.validate()?;
        self.production.validate()
    }
}

/// Legacy key generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Decimal digits per prime; 9 keeps p*q below 10^18 < 2^63
    pub prime_digits: u32,
    /// Prime pairs tried before giving up
    pub max_attempts: u32,
    /// Candidates drawn per prime before giving up
    pub max_prime_draws: u32,
    pub public_exponent: u64,
    pub fallback_exponents: Vec<u64>,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            prime_digits: 9,
            max_attempts: 32,
            max_prime_draws: 100_000,
            public_exponent: 65537,
            fallback_exponents: vec![3, 5, 17, 257],
        }
    }
}

impl LegacyConfig {
    pub fn validate(&self) -> RsaResult<()> {
        if !(1..=9).contains(&self.prime_digits) {
            return Err(RsaError::invalid(format!(
                "prime_digits must be between 1 and 9, got {}",
                self.prime_digits
            )));
        }
        if self.max_attempts == 0 || self.max_prime_draws == 0 {
            return Err(RsaError::invalid("retry budgets must be non-zero"));
        }
        if self.public_exponent < 2 {
            return Err(RsaError::invalid("public exponent must be at least 2"));
        }
        if self.fallback_exponents.is_empty() {
            return Err(RsaError::invalid("fallback exponent list is empty"));
        }
        Ok(())
    }

    /// Half-open range primes are drawn from
    pub fn prime_range(&self) -> Range<u64> {
        let lower = 10u64.pow(self.prime_digits - 1).max(2);
        let upper = 10u64.pow(self.prime_digits);
        lower..upper
    }

    pub fn with_prime_digits(mut self, digits: u32) -> Self {
        self.prime_digits = digits;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_public_exponent(mut self, e: u64) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_fallback_exponents(mut self, exponents: Vec<u64>) -> Self {
        self.fallback_exponents = exponents;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    pub key_bits: usize,
    pub padding: PaddingScheme,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            key_bits: 2048,
            padding: PaddingScheme::OaepSha1,
        }
    }
}

impl ProductionConfig {
    pub fn validate(&self) -> RsaResult<()> {
        validate_key_bits(self.key_bits)
    }

    pub fn with_key_bits(mut self, bits: usize) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn with_padding(mut self, padding: PaddingScheme) -> Self {
        self.padding = padding;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: WireFormat,
}

pub fn validate_key_bits(bits: usize) -> RsaResult<()> {
    if !(MIN_PRODUCTION_KEY_BITS..=MAX_PRODUCTION_KEY_BITS).contains(&bits) {
        return Err(RsaError::invalid(format!(
            "RSA key size must be between {} and {} bits, got {}",
            MIN_PRODUCTION_KEY_BITS, MAX_PRODUCTION_KEY_BITS, bits
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.legacy.prime_range(), 100_000_000..1_000_000_000);
        assert_eq!(config.legacy.fallback_exponents, vec![3, 5, 17, 257]);
        assert_eq!(config.production.key_bits, 2048);
        assert_eq!(config.production.padding, PaddingScheme::OaepSha1);
        assert_eq!(config.output.format, WireFormat::Base64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            [legacy]
            prime_digits = 6

            [production]
            key_bits = 1024
            padding = "pkcs1"

            [output]
            format = "csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.legacy.prime_digits, 6);
        assert_eq!(config.legacy.max_attempts, 32);
        assert_eq!(config.production.key_bits, 1024);
        assert_eq!(config.production.padding, PaddingScheme::Pkcs1v15);
        assert_eq!(config.output.format, WireFormat::Csv);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EngineConfig::from_toml_str("[legacy]\nprime_digits = 10\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[production]\nkey_bits = 256\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[legacy\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_single_digit_range_starts_at_two() {
        let config = LegacyConfig::default().with_prime_digits(1);
        assert_eq!(config.prime_range(), 2..10);
    }
}
