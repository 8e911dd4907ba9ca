//! Common traits that define the API each backend must implement.

use core::{error, fmt};

use crate::crypto::Failure;

pub(crate) mod aes_kw;
pub(crate) mod hpke;

/// The backend trait that all backends must implement.
pub(crate) trait Backend {
    /// The error type that is used by this backend.
    type Error: fmt::Debug + fmt::Display + error::Error;

    /// The AES Key Wrap key type.
    type Kek: aes_kw::Kek;

    /// The HPKE receiver private key type.
    type HpkePrivateKey: hpke::PrivateKey;

    /// Maps an error of this backend to the library independent
    /// classification.
    fn classify(error: &Self::Error) -> Failure;
}
