// RSA Module - Main module file
// Exports the legacy and production engines

pub mod adapter;
pub mod keygen;
pub mod legacy;
pub mod number_theory;
pub mod padding;
pub mod primitive;
pub mod production;

pub use adapter::{ProductionKeyAdapter, ProductionKeyPair};
pub use keygen::{generate_legacy_keypair, LegacyKeyFile, LegacyKeyGenerator, LegacyKeyPair};
pub use legacy::{decrypt_bytes, decrypt_to_string, encrypt_bytes, encrypt_text};
pub use padding::{max_chunk_size, PaddingScheme};
pub use primitive::{RsaPrimitive, RustCryptoPrimitive};
pub use production::{chunk_count, ProductionCipher};
