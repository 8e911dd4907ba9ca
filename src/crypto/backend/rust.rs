//! This backend implements the primitives using the [RustCrypto] ecosystem
//! and the [`hpke`] crate, which is built on top of it.
//!
//! [RustCrypto]: https://github.com/RustCrypto

use thiserror::Error;

use super::interface;
use crate::crypto::Failure;

pub mod aes_kw;
pub mod hpke;

/// The errors that can be produced by the rust crypto backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The key-encryption key does not have the length of the variant.
    #[error("invalid key length, expected {expected} bytes but got {found}")]
    InvalidKeyLength {
        /// The key length of the variant
        expected: usize,
        /// The length of the given key
        found: usize,
    },

    /// The HPKE private key is not a valid key of the KEM.
    #[error("invalid HPKE private key")]
    InvalidPrivateKey,

    /// The output buffer is too small.
    #[error("output buffer too small, {needed} bytes are needed")]
    BufferTooSmall {
        /// The length of the output
        needed: usize,
    },

    /// The wrapped key is shorter than 24 bytes or not a multiple of 8 bytes.
    #[error("wrapped key has an invalid length")]
    InvalidWrappedKey,

    /// The integrity check of the key unwrap failed.
    #[error("key unwrap integrity check failed")]
    IntegrityCheckFailed,

    /// The encapsulated key is not a valid public key of the KEM.
    #[error("invalid encapsulated key")]
    InvalidEncapsulatedKey,

    /// An HPKE operation failed.
    // `HpkeError` only implements `std::error::Error` with its `std` feature,
    // so it is not exposed as the source.
    #[error("an HPKE operation failed: {0}")]
    Hpke(::hpke::HpkeError),
}

/// The [RustCrypto] based backend.
///
/// [RustCrypto]: https://github.com/RustCrypto
#[derive(Debug)]
pub enum Backend {}

impl interface::Backend for Backend {
    type Error = BackendError;
    type HpkePrivateKey = hpke::PrivateKey;
    type Kek = aes_kw::Kek;

    fn classify(error: &Self::Error) -> Failure {
        match error {
            BackendError::InvalidKeyLength { .. } | BackendError::InvalidPrivateKey => {
                Failure::InvalidKey
            }
            BackendError::BufferTooSmall { needed } => Failure::BufferTooSmall { needed: *needed },
            BackendError::InvalidWrappedKey
            | BackendError::IntegrityCheckFailed
            | BackendError::InvalidEncapsulatedKey
            | BackendError::Hpke(_) => Failure::Rejected,
        }
    }
}
