//! Cryptographic primitives.
//!
//! This module contains the primitives the recipient decoders need to recover
//! a content-encryption key: AES Key Wrap and HPKE in base mode. It abstracts
//! away the cryptographic library in use. The library is selected at compile
//! time through a cargo feature, see [`DefaultBackend`].
//!
//! Decoders talk to the primitives through the [`CryptoBackend`] trait, which
//! can be implemented to route the operations to other hardware or software.

pub(crate) mod backend;
pub mod aes_kw;
pub mod hpke;

use core::{error, fmt};

use backend::interface;
use secrecy::ExposeSecret as _;

use self::{
    aes_kw::KeyEncryptionKey,
    backend::{
        interface::{aes_kw::Kek as _, hpke::PrivateKey as _, Backend as _},
        Backend,
    },
    hpke::SecretKey,
};
use crate::algorithm;

/// The result type used for cryptographic operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The erased error type that is used to generalize all errors that all the
/// cryptographic libraries can return.
pub struct Error {
    inner: Inner,
}

enum Inner {
    Backend(<Backend as interface::Backend>::Error),
    Failure(Failure),
}

impl Error {
    /// Creates an error that is not backed by an error of the compiled in
    /// library. This is meant for custom [`CryptoBackend`]s.
    pub const fn new(failure: Failure) -> Self {
        Self {
            inner: Inner::Failure(failure),
        }
    }

    /// Classifies this error.
    pub fn failure(&self) -> Failure {
        match &self.inner {
            Inner::Backend(err) => Backend::classify(err),
            Inner::Failure(failure) => *failure,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Backend(err) => fmt::Display::fmt(err, f),
            Inner::Failure(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Backend(err) => fmt::Debug::fmt(err, f),
            Inner::Failure(failure) => fmt::Debug::fmt(failure, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.inner {
            Inner::Backend(err) => error::Error::source(err),
            Inner::Failure(_) => None,
        }
    }
}

impl<E> From<E> for Error
where
    <Backend as interface::Backend>::Error: From<E>,
{
    fn from(err: E) -> Self {
        Self {
            inner: Inner::Backend(<Backend as interface::Backend>::Error::from(err)),
        }
    }
}

/// The reason a cryptographic operation failed, independent of the library
/// that performed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Failure {
    /// The key cannot be used with the requested algorithm, e.g. because its
    /// length does not match.
    #[error("the key is not usable with this algorithm")]
    InvalidKey,
    /// The output buffer cannot hold the recovered key.
    #[error("output buffer too small, {needed} bytes are needed")]
    BufferTooSmall {
        /// The number of bytes the output would have taken
        needed: usize,
    },
    /// The input was rejected by the primitive, e.g. because the integrity
    /// check of a key wrap or the authentication tag of HPKE failed.
    #[error("the primitive rejected the input")]
    Rejected,
}

/// The operations the recipient decoders perform on secret key material.
///
/// Implementations write the recovered key into the beginning of `out` and
/// return its length. On error, the contents of `out` are unspecified and
/// callers must not use them.
pub trait CryptoBackend {
    /// Unwraps `ciphertext` with `kek` using AES Key Wrap.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not fit `alg`, if `out` is too small
    /// or if the integrity check fails.
    fn kw_unwrap(
        &self,
        alg: algorithm::AesKw,
        kek: &KeyEncryptionKey,
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize>;

    /// Opens `ciphertext` with single shot HPKE in base mode, using an empty
    /// `info` and `aad` as additional authenticated data.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not fit the KEM of `alg`, if `enc` is
    /// not a valid encapsulated key, if `out` is too small or if the
    /// ciphertext does not authenticate.
    fn hpke_decrypt(
        &self,
        alg: algorithm::Hpke,
        enc: &[u8],
        skr: &SecretKey,
        ciphertext: &[u8],
        aad: &[u8],
        out: &mut [u8],
    ) -> Result<usize>;
}

impl<C: CryptoBackend + ?Sized> CryptoBackend for &C {
    fn kw_unwrap(
        &self,
        alg: algorithm::AesKw,
        kek: &KeyEncryptionKey,
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        (**self).kw_unwrap(alg, kek, ciphertext, out)
    }

    fn hpke_decrypt(
        &self,
        alg: algorithm::Hpke,
        enc: &[u8],
        skr: &SecretKey,
        ciphertext: &[u8],
        aad: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        (**self).hpke_decrypt(alg, enc, skr, ciphertext, aad, out)
    }
}

type BackendKek = <Backend as interface::Backend>::Kek;
type BackendHpkePrivateKey = <Backend as interface::Backend>::HpkePrivateKey;

/// The [`CryptoBackend`] of the library selected at compile time.
///
/// With the `crypto-rustcrypto` feature this uses the [RustCrypto] `aes-kw`
/// crate and the `hpke` crate. Without any backend feature every operation
/// fails.
///
/// [RustCrypto]: https://github.com/RustCrypto
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultBackend;

impl DefaultBackend {
    /// The name of the compiled in library, if any.
    pub const fn name() -> Option<&'static str> {
        option_env!("COSE_RECIPIENT_CRYPTO_BACKEND")
    }
}

impl CryptoBackend for DefaultBackend {
    fn kw_unwrap(
        &self,
        alg: algorithm::AesKw,
        kek: &KeyEncryptionKey,
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        let kek = BackendKek::new(alg, kek.expose_secret())?;
        kek.unwrap(ciphertext, out)
    }

    fn hpke_decrypt(
        &self,
        alg: algorithm::Hpke,
        enc: &[u8],
        skr: &SecretKey,
        ciphertext: &[u8],
        aad: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        let skr = BackendHpkePrivateKey::new(alg, skr.expose_secret())?;
        skr.open(enc, ciphertext, aad, out)
    }
}
