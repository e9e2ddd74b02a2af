// Production RSA codec
// Splits plaintext into padding-sized chunks, one primitive call per
// chunk, and concatenates fixed-width blocks in order

use tracing::debug;

use super::adapter::ProductionKeyPair;
use super::padding::{max_chunk_size, PaddingScheme};
use super::primitive::RsaPrimitive;
use crate::error::{RsaError, RsaResult};

/// Number of blocks `len` plaintext bytes encrypt into
pub fn chunk_count(len: usize, max_chunk: usize) -> usize {
    len.div_ceil(max_chunk)
}

#[derive(Debug, Clone, Default)]
pub struct ProductionCipher<P: RsaPrimitive> {
    primitive: P,
}

impl<P: RsaPrimitive> ProductionCipher<P> {
    pub fn new(primitive: P) -> Self {
        Self { primitive }
    }

    /// Encrypt bytes; empty plaintext gives empty ciphertext
    pub fn encrypt(&self, plaintext: &[u8], key: &ProductionKeyPair<P>, padding: PaddingScheme) -> RsaResult<Vec<u8>> {
        let block_size = key.block_size_bytes();
        let max_chunk = max_chunk_size(block_size, padding)?;
        let blocks = chunk_count(plaintext.len(), max_chunk);

        let mut encrypted = Vec::with_capacity(blocks * block_size);
        for chunk in plaintext.chunks(max_chunk) {
            let block = self.primitive.public_encrypt_block(chunk, key.public(), padding)?;
            if block.len() != block_size {
                return Err(RsaError::CryptoPrimitiveFailure(format!(
                    "expected a {}-byte block, primitive returned {}",
                    block_size,
                    block.len()
                )));
            }
            encrypted.extend_from_slice(&block);
        }

        debug!(
            plaintext_len = plaintext.len(),
            blocks,
            block_size,
            max_chunk,
            %padding,
            "Encrypted production ciphertext"
        );
        Ok(encrypted)
    }

    /// Decrypt whole blocks; requires private key material
    pub fn decrypt(&self, ciphertext: &[u8], key: &ProductionKeyPair<P>, padding: PaddingScheme) -> RsaResult<Vec<u8>> {
        let private = key
            .private()
            .ok_or_else(|| RsaError::invalid("private key not loaded; cannot decrypt"))?;
        let block_size = key.block_size_bytes();
        max_chunk_size(block_size, padding)?;

        if ciphertext.len() % block_size != 0 {
            return Err(RsaError::MisalignedCiphertext {
                len: ciphertext.len(),
                block_size,
            });
        }

        let mut decrypted = Vec::with_capacity(ciphertext.len());
        for block in ciphertext.chunks_exact(block_size) {
            let chunk = self.primitive.private_decrypt_block(block, private, padding)?;
            decrypted.extend_from_slice(&chunk);
        }

        debug!(
            blocks = ciphertext.len() / block_size,
            plaintext_len = decrypted.len(),
            %padding,
            "Decrypted production ciphertext"
        );
        Ok(decrypted)
    }
}
