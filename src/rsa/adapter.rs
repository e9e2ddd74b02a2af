// Production key handling
// Wraps key material from the RSA primitive and does the block/chunk
// bookkeeping the primitive does not

use std::fmt;

use tracing::info;

use super::padding::{max_chunk_size, PaddingScheme};
use super::primitive::{RsaPrimitive, RustCryptoPrimitive};
use crate::config::validate_key_bits;
use crate::error::RsaResult;

/// Production key pair. Private material is optional: public-only keys
/// can encrypt but not decrypt.
pub struct ProductionKeyPair<P: RsaPrimitive> {
    public: P::PublicKey,
    private: Option<P::PrivateKey>,
    key_size_bits: usize,
}

impl<P: RsaPrimitive> Clone for ProductionKeyPair<P> {
    fn clone(&self) -> Self {
        Self {
            public: self.public.clone(),
            private: self.private.clone(),
            key_size_bits: self.key_size_bits,
        }
    }
}

impl<P: RsaPrimitive> fmt::Debug for ProductionKeyPair<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductionKeyPair")
            .field("key_size_bits", &self.key_size_bits)
            .field("has_private", &self.private.is_some())
            .finish()
    }
}

impl<P: RsaPrimitive> ProductionKeyPair<P> {
    pub fn public(&self) -> &P::PublicKey {
        &self.public
    }

    pub fn private(&self) -> Option<&P::PrivateKey> {
        self.private.as_ref()
    }

    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    pub fn key_size_bits(&self) -> usize {
        self.key_size_bits
    }

    pub fn block_size_bytes(&self) -> usize {
        self.key_size_bits / 8
    }

    /// Drop the private half, e.g. before handing the key to a peer
    pub fn to_public_only(&self) -> Self {
        Self {
            public: self.public.clone(),
            private: None,
            key_size_bits: self.key_size_bits,
        }
    }
}

impl ProductionKeyPair<RustCryptoPrimitive> {
    /// Load from a public PEM and, optionally, a private PEM
    pub fn from_pem(public_pem: &str, private_pem: Option<&str>) -> RsaResult<Self> {
        let public = RustCryptoPrimitive::public_key_from_pem(public_pem)?;
        let private = private_pem
            .map(RustCryptoPrimitive::private_key_from_pem)
            .transpose()?;
        ProductionKeyAdapter::new(RustCryptoPrimitive).key_pair(public, private)
    }

    pub fn public_key_pem(&self) -> RsaResult<String> {
        RustCryptoPrimitive::public_key_to_pem(&self.public)
    }

    pub fn private_key_pem(&self) -> RsaResult<Option<String>> {
        self.private
            .as_ref()
            .map(RustCryptoPrimitive::private_key_to_pem)
            .transpose()
    }
}

/// Requests key material from the primitive and sizes chunks for it
#[derive(Debug, Clone, Default)]
pub struct ProductionKeyAdapter<P: RsaPrimitive> {
    primitive: P,
}

impl<P: RsaPrimitive> ProductionKeyAdapter<P> {
    pub fn new(primitive: P) -> Self {
        Self { primitive }
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Generate a full key pair of `bits` (512..=16384)
    pub fn generate_key_pair(&self, bits: usize) -> RsaResult<ProductionKeyPair<P>> {
        validate_key_bits(bits)?;
        let (public, private) = self.primitive.generate_key_pair(bits)?;
        let keypair = self.key_pair(public, Some(private))?;
        info!(key_size_bits = keypair.key_size_bits, "Generated production key pair");
        Ok(keypair)
    }

    /// Wrap existing key material
    pub fn key_pair(&self, public: P::PublicKey, private: Option<P::PrivateKey>) -> RsaResult<ProductionKeyPair<P>> {
        let key_size_bits = self.key_size_bits(&public)?;
        Ok(ProductionKeyPair {
            public,
            private,
            key_size_bits,
        })
    }

    pub fn key_size_bits(&self, public: &P::PublicKey) -> RsaResult<usize> {
        Ok(self.primitive.block_size_bytes(public)? * 8)
    }

    pub fn max_chunk_size(&self, keypair: &ProductionKeyPair<P>, padding: PaddingScheme) -> RsaResult<usize> {
        max_chunk_size(keypair.block_size_bytes(), padding)
    }
}
