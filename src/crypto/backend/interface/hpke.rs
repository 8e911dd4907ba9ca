//! The interfaces for HPKE.

use crate::{algorithm, crypto::Result};

/// The private key of an HPKE receiver, bound to one ciphersuite.
pub(crate) trait PrivateKey: Sized {
    /// Deserializes the private key for the KEM of `suite`.
    fn new(suite: algorithm::Hpke, key: &[u8]) -> Result<Self>;

    /// Opens a single shot base mode ciphertext, using an empty `info`.
    ///
    /// The plaintext is written into the beginning of `out` and its length is
    /// returned. On error, `out` must not contain any part of the plaintext.
    fn open(&self, enc: &[u8], ciphertext: &[u8], aad: &[u8], out: &mut [u8]) -> Result<usize>;
}
