use alloc::vec::Vec;
use core::fmt;

use ::hpke::{
    aead::{Aead, AesGcm128, ChaCha20Poly1305},
    kdf::HkdfSha256,
    kem::{DhP256HkdfSha256, X25519HkdfSha256},
    Deserializable as _, Kem, OpModeR,
};
use zeroize::Zeroizing;

use super::BackendError;
use crate::{
    algorithm,
    crypto::{backend::interface::hpke, Result},
};

type P256PrivateKey = <DhP256HkdfSha256 as Kem>::PrivateKey;
type X25519PrivateKey = <X25519HkdfSha256 as Kem>::PrivateKey;

enum ErasedKey {
    P256(P256PrivateKey),
    X25519(X25519PrivateKey),
}

/// A low level HPKE receiver key together with its ciphersuite.
pub struct PrivateKey {
    suite: algorithm::Hpke,
    inner: ErasedKey,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}

impl hpke::PrivateKey for PrivateKey {
    fn new(suite: algorithm::Hpke, key: &[u8]) -> Result<Self> {
        let inner = match suite.kem() {
            algorithm::Kem::P256Sha256 => ErasedKey::P256(
                P256PrivateKey::from_bytes(key).map_err(|_| BackendError::InvalidPrivateKey)?,
            ),
            algorithm::Kem::X25519Sha256 => ErasedKey::X25519(
                X25519PrivateKey::from_bytes(key).map_err(|_| BackendError::InvalidPrivateKey)?,
            ),
        };

        Ok(Self { suite, inner })
    }

    fn open(&self, enc: &[u8], ciphertext: &[u8], aad: &[u8], out: &mut [u8]) -> Result<usize> {
        use algorithm::Hpke::*;

        let plaintext = match (&self.inner, self.suite) {
            (ErasedKey::P256(sk), P256Sha256Aes128Gcm) => {
                open::<AesGcm128, DhP256HkdfSha256>(sk, enc, ciphertext, aad)?
            }
            (ErasedKey::P256(sk), P256Sha256ChaCha20Poly1305) => {
                open::<ChaCha20Poly1305, DhP256HkdfSha256>(sk, enc, ciphertext, aad)?
            }
            (ErasedKey::X25519(sk), X25519Sha256Aes128Gcm) => {
                open::<AesGcm128, X25519HkdfSha256>(sk, enc, ciphertext, aad)?
            }
            (ErasedKey::X25519(sk), X25519Sha256ChaCha20Poly1305) => {
                open::<ChaCha20Poly1305, X25519HkdfSha256>(sk, enc, ciphertext, aad)?
            }
            // `new` derives the key type from the suite
            _ => return Err(BackendError::InvalidPrivateKey.into()),
        };

        let needed = plaintext.len();
        let out = out
            .get_mut(..needed)
            .ok_or(BackendError::BufferTooSmall { needed })?;
        out.copy_from_slice(&plaintext);
        Ok(needed)
    }
}

fn open<A: Aead, K: Kem>(
    sk: &K::PrivateKey,
    enc: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let enc = K::EncappedKey::from_bytes(enc).map_err(|_| BackendError::InvalidEncapsulatedKey)?;
    let plaintext = ::hpke::single_shot_open::<A, HkdfSha256, K>(
        &OpModeR::Base,
        sk,
        &enc,
        b"",
        ciphertext,
        aad,
    )
    .map_err(BackendError::Hpke)?;

    Ok(Zeroizing::new(plaintext))
}
