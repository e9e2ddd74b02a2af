// Legacy RSA codec
// One modular exponentiation per plaintext byte; ciphertext is one
// signed 64-bit value per byte

use super::keygen::LegacyKeyPair;
use super::number_theory::mod_pow;
use crate::error::{RsaError, RsaResult};

/// Encrypt bytes with the legacy public exponent
pub fn encrypt_bytes(plaintext: &[u8], key: &LegacyKeyPair) -> RsaResult<Vec<i64>> {
    let modulus = key.modulus();
    plaintext
        .iter()
        .map(|&byte| {
            let value = u64::from(byte);
            if value >= modulus {
                return Err(RsaError::ValueExceedsModulus { value, modulus });
            }
            // modulus < 2^63, so the result fits i64
            Ok(mod_pow(value as i64, key.public_exponent(), modulus) as i64)
        })
        .collect()
}

/// Decrypt legacy ciphertext back into bytes
pub fn decrypt_bytes(ciphertext: &[i64], key: &LegacyKeyPair) -> RsaResult<Vec<u8>> {
    ciphertext
        .iter()
        .map(|&c| {
            let m = mod_pow(c, key.private_exponent(), key.modulus());
            u8::try_from(m).map_err(|_| RsaError::DecryptedValueOutOfRange { value: m })
        })
        .collect()
}

/// Encrypt a string using the legacy key
pub fn encrypt_text(plaintext: &str, key: &LegacyKeyPair) -> RsaResult<Vec<i64>> {
    encrypt_bytes(plaintext.as_bytes(), key)
}

/// Decrypt legacy ciphertext to a string
pub fn decrypt_to_string(ciphertext: &[i64], key: &LegacyKeyPair) -> RsaResult<String> {
    let plaintext = decrypt_bytes(ciphertext, key)?;
    String::from_utf8(plaintext).map_err(|e| RsaError::invalid(format!("Invalid UTF-8: {}", e)))
}
