// Error types shared by both RSA engines and the ciphertext codec

use thiserror::Error;

/// Coarse classification of every failure the library can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    RangeViolation,
    KeyGenerationExhausted,
    MisalignedCiphertext,
    CryptoPrimitiveFailure,
    NoInverse,
}

#[derive(Error, Debug)]
pub enum RsaError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Padding overhead {overhead} leaves no room in a {block_size}-byte block")]
    InvalidPaddingConfiguration { block_size: usize, overhead: usize },

    #[error("Base64 ciphertext length mismatch: {len} bytes is not a multiple of 8")]
    LengthMismatch { len: usize },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Value {value} must be smaller than modulus {modulus}")]
    ValueExceedsModulus { value: u64, modulus: u64 },

    #[error("Decrypted value {value} is outside byte range")]
    DecryptedValueOutOfRange { value: u64 },

    #[error("{what} needs {bits} bits, budget is {budget}")]
    BitBudgetExceeded {
        what: &'static str,
        bits: u32,
        budget: u32,
    },

    #[error("Unable to generate a legacy key pair after {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },

    #[error("Ciphertext length {len} is not aligned with RSA block size {block_size}")]
    MisalignedCiphertext { len: usize, block_size: usize },

    #[error("RSA primitive failed: {0}")]
    CryptoPrimitiveFailure(String),

    #[error("{a} has no inverse modulo {m}")]
    NoInverse { a: u64, m: u64 },
}

impl RsaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RsaError::InvalidArgument(_)
            | RsaError::InvalidPaddingConfiguration { .. }
            | RsaError::LengthMismatch { .. }
            | RsaError::Base64(_) => ErrorKind::InvalidArgument,
            RsaError::ValueExceedsModulus { .. }
            | RsaError::DecryptedValueOutOfRange { .. }
            | RsaError::BitBudgetExceeded { .. } => ErrorKind::RangeViolation,
            RsaError::KeyGenerationExhausted { .. } => ErrorKind::KeyGenerationExhausted,
            RsaError::MisalignedCiphertext { .. } => ErrorKind::MisalignedCiphertext,
            RsaError::CryptoPrimitiveFailure(_) => ErrorKind::CryptoPrimitiveFailure,
            RsaError::NoInverse { .. } => ErrorKind::NoInverse,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RsaError::InvalidArgument(message.into())
    }
}

pub type RsaResult<T> = Result<T, RsaError>;
