//! The interfaces for AES Key Wrap.

use crate::{algorithm, crypto::Result};

/// A key-encryption key bound to one key wrap variant.
pub(crate) trait Kek: Sized {
    /// Creates a new key from the given bytes.
    ///
    /// Fails with an invalid key error if the length of `key` does not match
    /// the variant.
    fn new(variant: algorithm::AesKw, key: &[u8]) -> Result<Self>;

    /// Unwraps `wrapped` into the beginning of `out` and returns the length
    /// of the unwrapped key.
    ///
    /// On error, `out` must not contain any part of the unwrapped key.
    fn unwrap(&self, wrapped: &[u8], out: &mut [u8]) -> Result<usize>;
}
