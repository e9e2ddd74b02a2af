// Caller-owned engine session
// Bundles the active key with its wire settings so callers hold one value
// instead of process-wide "current key" state

use crate::ciphertext::{self, WireFormat};
use crate::error::RsaResult;
use crate::rsa::adapter::ProductionKeyPair;
use crate::rsa::keygen::LegacyKeyPair;
use crate::rsa::legacy;
use crate::rsa::padding::PaddingScheme;
use crate::rsa::primitive::{RsaPrimitive, RustCryptoPrimitive};
use crate::rsa::production::ProductionCipher;

#[derive(Debug, Clone)]
pub enum Session<P: RsaPrimitive = RustCryptoPrimitive> {
    Legacy {
        key: LegacyKeyPair,
        output: WireFormat,
    },
    Production {
        cipher: ProductionCipher<P>,
        key: ProductionKeyPair<P>,
        padding: PaddingScheme,
    },
}

impl<P: RsaPrimitive> Session<P> {
    pub fn legacy(key: LegacyKeyPair, output: WireFormat) -> Self {
        Session::Legacy { key, output }
    }

    pub fn production(primitive: P, key: ProductionKeyPair<P>, padding: PaddingScheme) -> Self {
        Session::Production {
            cipher: ProductionCipher::new(primitive),
            key,
            padding,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Session::Legacy { .. } => "Legacy long long mode",
            Session::Production { .. } => "PEM mode",
        }
    }

    /// Encrypt and render as wire text
    pub fn encrypt(&self, plaintext: &[u8]) -> RsaResult<String> {
        match self {
            Session::Legacy { key, output } => {
                let values = legacy::encrypt_bytes(plaintext, key)?;
                Ok(ciphertext::serialize(&values, *output))
            }
            Session::Production { cipher, key, padding } => {
                let bytes = cipher.encrypt(plaintext, key, *padding)?;
                Ok(ciphertext::encode_bytes_base64(&bytes))
            }
        }
    }

    /// Parse wire text and decrypt
    pub fn decrypt(&self, wire: &str) -> RsaResult<Vec<u8>> {
        match self {
            Session::Legacy { key, .. } => {
                let values = ciphertext::parse(wire)?;
                legacy::decrypt_bytes(&values, key)
            }
            Session::Production { cipher, key, padding } => {
                let bytes = ciphertext::decode_bytes_base64(wire)?;
                cipher.decrypt(&bytes, key, *padding)
            }
        }
    }
}
