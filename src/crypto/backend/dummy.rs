//! This backend is a dummy backend, that will return an error for all
//! methods.
//!
//! It is compiled when no backend feature is enabled, so that the crate still
//! builds and every recipient fails to decrypt.

use super::interface;
use crate::{
    algorithm,
    crypto::{Failure, Result},
};

#[derive(Debug, thiserror::Error)]
#[error("the dummy crypto backend does not support any operations")]
pub(crate) struct Error;

/// The dummy backend.
#[derive(Debug)]
pub(crate) enum Backend {}

impl interface::Backend for Backend {
    type Error = Error;
    type HpkePrivateKey = DummyKey;
    type Kek = DummyKey;

    fn classify(_: &Self::Error) -> Failure {
        Failure::Rejected
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DummyKey {
    _private: (),
}

impl interface::aes_kw::Kek for DummyKey {
    fn new(_: algorithm::AesKw, _: &[u8]) -> Result<Self> {
        Err(Error.into())
    }

    fn unwrap(&self, _: &[u8], _: &mut [u8]) -> Result<usize> {
        unreachable!()
    }
}

impl interface::hpke::PrivateKey for DummyKey {
    fn new(_: algorithm::Hpke, _: &[u8]) -> Result<Self> {
        Err(Error.into())
    }

    fn open(&self, _: &[u8], _: &[u8], _: &[u8], _: &mut [u8]) -> Result<usize> {
        unreachable!()
    }
}
