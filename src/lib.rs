//! Educational RSA toolkit.
//!
//! Two independent engines:
//!
//! - **Legacy**: textbook RSA on machine words. Keys are `{e, d, n}` with a
//!   modulus below 2^63 and every plaintext byte is encrypted on its own.
//! - **Production**: full-size RSA keys from the RustCrypto `rsa` crate,
//!   with chunking sized to the padding overhead.
//!
//! Legacy ciphertext is carried as decimal CSV or packed Base64, see
//! [`ciphertext`]. Nothing here holds global state; callers own their keys
//! or a [`session::Session`].

pub mod ciphertext;
pub mod config;
pub mod error;
pub mod rsa;
pub mod session;
pub mod util;

pub use config::EngineConfig;
pub use error::{ErrorKind, RsaError, RsaResult};
pub use session::Session;
