// Padding schemes for the production engine
// Only the per-block overhead matters here; padding itself is applied
// by the RSA primitive

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RsaError, RsaResult};

/// Recognised encryption padding modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddingScheme {
    /// PKCS#1 v1.5: 0x00 || 0x02 || PS (>= 8 bytes) || 0x00 || data
    #[serde(rename = "pkcs1")]
    Pkcs1v15,
    /// OAEP with SHA-1 and MGF1-SHA-1
    #[default]
    #[serde(rename = "oaep")]
    OaepSha1,
    /// OAEP with SHA-256 and MGF1-SHA-256
    #[serde(rename = "oaep-sha256")]
    OaepSha256,
}

impl PaddingScheme {
    pub const ALL: [PaddingScheme; 3] = [
        PaddingScheme::Pkcs1v15,
        PaddingScheme::OaepSha1,
        PaddingScheme::OaepSha256,
    ];

    /// Bytes of each block consumed by the padding
    pub fn overhead(self) -> usize {
        match self {
            PaddingScheme::Pkcs1v15 => 11,
            // 2 * hash length + 2
            PaddingScheme::OaepSha1 => 2 * 20 + 2,
            PaddingScheme::OaepSha256 => 2 * 32 + 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaddingScheme::Pkcs1v15 => "pkcs1",
            PaddingScheme::OaepSha1 => "oaep",
            PaddingScheme::OaepSha256 => "oaep-sha256",
        }
    }
}

impl fmt::Display for PaddingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaddingScheme {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pkcs1" | "pkcs1v15" | "pkcs1-v1_5" => Ok(PaddingScheme::Pkcs1v15),
            "oaep" | "oaep-sha1" => Ok(PaddingScheme::OaepSha1),
            "oaep-sha256" => Ok(PaddingScheme::OaepSha256),
            "pss" => Err(RsaError::invalid("PSS padding is signature-only and cannot encrypt")),
            other => Err(RsaError::invalid(format!("unsupported RSA padding mode '{}'", other))),
        }
    }
}

/// Largest plaintext chunk one block can carry under `padding`
pub fn max_chunk_size(block_size_bytes: usize, padding: PaddingScheme) -> RsaResult<usize> {
    let overhead = padding.overhead();
    match block_size_bytes.checked_sub(overhead) {
        Some(size) if size > 0 => Ok(size),
        _ => Err(RsaError::InvalidPaddingConfiguration {
            block_size: block_size_bytes,
            overhead,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overheads() {
        assert_eq!(PaddingScheme::Pkcs1v15.overhead(), 11);
        assert_eq!(PaddingScheme::OaepSha1.overhead(), 42);
        assert_eq!(PaddingScheme::OaepSha256.overhead(), 66);
    }

    #[test]
    fn test_max_chunk_size() {
        assert_eq!(max_chunk_size(256, PaddingScheme::OaepSha1).unwrap(), 214);
        // Maximum data size for a 512-bit key: 64 - 11 = 53 bytes
        assert_eq!(max_chunk_size(64, PaddingScheme::Pkcs1v15).unwrap(), 53);
    }

    #[test]
    fn test_max_chunk_size_too_small() {
        let err = max_chunk_size(42, PaddingScheme::OaepSha1).unwrap_err();
        assert!(matches!(
            err,
            RsaError::InvalidPaddingConfiguration { block_size: 42, overhead: 42 }
        ));
        assert!(max_chunk_size(8, PaddingScheme::Pkcs1v15).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!("pkcs1".parse::<PaddingScheme>().unwrap(), PaddingScheme::Pkcs1v15);
        assert_eq!("OAEP".parse::<PaddingScheme>().unwrap(), PaddingScheme::OaepSha1);
        assert_eq!("oaep-sha256".parse::<PaddingScheme>().unwrap(), PaddingScheme::OaepSha256);
        assert!("pss".parse::<PaddingScheme>().is_err());
        assert!("none".parse::<PaddingScheme>().is_err());

        for scheme in PaddingScheme::ALL {
            assert_eq!(scheme.to_string().parse::<PaddingScheme>().unwrap(), scheme);
        }
    }
}
