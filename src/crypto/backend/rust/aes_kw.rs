use core::fmt;

use ::aes_kw::{KekAes128, KekAes192, KekAes256};
use generic_array::GenericArray;
use zeroize::Zeroize as _;

use super::BackendError;
use crate::{
    algorithm,
    crypto::{backend::interface::aes_kw, Result},
};

/// Length of the integrity check value prepended by the wrap operation.
const ICV_LEN: usize = 8;

/// Rust crypto uses generic arguments to represent the variant.
///
/// We don't to that at this level, so we have to erase the type.
enum ErasedKek {
    Aes128(KekAes128),
    Aes192(KekAes192),
    Aes256(KekAes256),
}

/// A low level AES Key Wrap key.
#[repr(transparent)]
pub struct Kek {
    inner: ErasedKek,
}

impl fmt::Debug for Kek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.inner {
            ErasedKek::Aes128(_) => algorithm::AesKw::Aes128,
            ErasedKek::Aes192(_) => algorithm::AesKw::Aes192,
            ErasedKek::Aes256(_) => algorithm::AesKw::Aes256,
        };
        f.debug_struct("Kek")
            .field("variant", &variant)
            .finish_non_exhaustive()
    }
}

impl aes_kw::Kek for Kek {
    fn new(variant: algorithm::AesKw, key: &[u8]) -> Result<Self> {
        if key.len() != variant.key_len() {
            return Err(BackendError::InvalidKeyLength {
                expected: variant.key_len(),
                found: key.len(),
            }
            .into());
        }

        let key = match variant {
            algorithm::AesKw::Aes128 => {
                ErasedKek::Aes128(KekAes128::new(GenericArray::from_slice(key)))
            }
            algorithm::AesKw::Aes192 => {
                ErasedKek::Aes192(KekAes192::new(GenericArray::from_slice(key)))
            }
            algorithm::AesKw::Aes256 => {
                ErasedKek::Aes256(KekAes256::new(GenericArray::from_slice(key)))
            }
        };

        Ok(Self { inner: key })
    }

    fn unwrap(&self, wrapped: &[u8], out: &mut [u8]) -> Result<usize> {
        // at least the ICV and two 64 bit blocks of key data
        if wrapped.len() < ICV_LEN + 16 || wrapped.len() % 8 != 0 {
            return Err(BackendError::InvalidWrappedKey.into());
        }

        let needed = wrapped.len() - ICV_LEN;
        let out = out
            .get_mut(..needed)
            .ok_or(BackendError::BufferTooSmall { needed })?;

        let unwrapped = match &self.inner {
            ErasedKek::Aes128(kek) => kek.unwrap(wrapped, out),
            ErasedKek::Aes192(kek) => kek.unwrap(wrapped, out),
            ErasedKek::Aes256(kek) => kek.unwrap(wrapped, out),
        };

        match unwrapped {
            Ok(()) => Ok(needed),
            Err(_) => {
                out.zeroize();
                Err(BackendError::IntegrityCheckFailed.into())
            }
        }
    }
}
