// Ciphertext wire formats
//
// Legacy ciphertext travels either as decimal CSV ("123,456,789") or as
// packed little-endian 64-bit values in standard Base64. Parsing picks the
// format by trial: Base64 first, then CSV, and CSV only when the input is
// made of digits, commas and minus signs. Digit-only strings can also be
// valid Base64, so this order decides how they are read.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RsaError, RsaResult};

const VALUE_WIDTH: usize = std::mem::size_of::<u64>();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Base64,
    Csv,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Base64 => f.write_str("base64"),
            WireFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for WireFormat {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(WireFormat::Base64),
            "csv" | "decimal" => Ok(WireFormat::Csv),
            other => Err(RsaError::invalid(format!("unknown wire format '{}'", other))),
        }
    }
}

pub fn serialize(values: &[i64], format: WireFormat) -> String {
    match format {
        WireFormat::Base64 => serialize_base64(values),
        WireFormat::Csv => serialize_csv(values),
    }
}

/// Decimal values joined by ','
pub fn serialize_csv(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Split on ',' and parse each segment; empty segments are skipped.
/// Whitespace is not trimmed here.
pub fn parse_csv(input: &str) -> RsaResult<Vec<i64>> {
    input
        .split(',')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .parse::<i64>()
                .map_err(|e| RsaError::invalid(format!("'{}' is not a decimal ciphertext value: {}", segment, e)))
        })
        .collect()
}

/// 8-byte little-endian per value, then standard Base64
pub fn serialize_base64(values: &[i64]) -> String {
    let bytes: Vec<u8> = values
        .iter()
        .flat_map(|&value| (value as u64).to_le_bytes())
        .collect();
    encode_bytes_base64(&bytes)
}

pub fn parse_base64(input: &str) -> RsaResult<Vec<i64>> {
    let bytes = BASE64.decode(input)?;
    if bytes.len() % VALUE_WIDTH != 0 {
        return Err(RsaError::LengthMismatch { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(VALUE_WIDTH)
        .map(|chunk| {
            let mut raw = [0u8; VALUE_WIDTH];
            raw.copy_from_slice(chunk);
            u64::from_le_bytes(raw) as i64
        })
        .collect())
}

/// Parse ciphertext in either wire format
pub fn parse(input: &str) -> RsaResult<Vec<i64>> {
    parse_with_format(input).map(|(values, _)| values)
}

/// Like `parse`, also reporting which format matched. Empty input
/// yields no values and reports Base64.
pub fn parse_with_format(input: &str) -> RsaResult<(Vec<i64>, WireFormat)> {
    let cleaned = strip_whitespace(input);
    if cleaned.is_empty() {
        return Ok((Vec::new(), WireFormat::Base64));
    }

    match parse_base64(&cleaned) {
        Ok(values) => {
            debug!(values = values.len(), "Parsed ciphertext as Base64");
            Ok((values, WireFormat::Base64))
        }
        Err(base64_err) if is_numeric_ciphertext(&cleaned) => {
            debug!(error = %base64_err, "Not Base64, parsing ciphertext as decimal CSV");
            parse_csv(&cleaned).map(|values| (values, WireFormat::Csv))
        }
        Err(base64_err) => Err(base64_err),
    }
}

/// Only digits, commas and minus signs
pub fn is_numeric_ciphertext(input: &str) -> bool {
    input.bytes().all(|b| b.is_ascii_digit() || b == b',' || b == b'-')
}

pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Raw bytes to standard Base64 (production ciphertext, file payloads)
pub fn encode_bytes_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Standard Base64 to raw bytes, ignoring embedded whitespace
pub fn decode_bytes_base64(input: &str) -> RsaResult<Vec<u8>> {
    Ok(BASE64.decode(strip_whitespace(input))?)
}
