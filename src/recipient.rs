//! Recovery of the content-encryption key from the `COSE_Recipient`
//! structures of a `COSE_Encrypt` message, as defined in [section 5.1 of RFC
//! 9052].
//!
//! Every key establishment scheme is handled by a [`RecipientDecoder`]. The
//! [`RecipientDecoders`] dispatch loop tries its registered decoders on the
//! recipients of a message until one of them yields the key.
//!
//! ```
//! # use cose_recipient::{
//! #     cbor::Cursor,
//! #     crypto::aes_kw::KeyEncryptionKey,
//! #     header::{Parameter, ParameterStorage},
//! #     recipient::{ErrorKind, KeyWrapRecipientDecoder, RecipientDecoders},
//! # };
//! let kek = KeyEncryptionKey::new(&[0x42; 16]);
//!
//! let mut decoders = RecipientDecoders::new();
//! decoders.add(KeyWrapRecipientDecoder::new().set_kek(&kek));
//!
//! // [[h'', {1: -3}, h'00..00']], a recipient that was not wrapped with `kek`
//! let mut message = vec![0x81, 0x83, 0x40, 0xa1, 0x01, 0x22, 0x58, 0x18];
//! message.extend_from_slice(&[0; 24]);
//!
//! let mut cursor = Cursor::new(&message);
//! let mut cek = [0u8; 32];
//! let mut slots: [Option<Parameter<'_>>; 8] = [None; 8];
//! let mut storage = ParameterStorage::new(&mut slots);
//!
//! let err = decoders
//!     .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DecryptFailure);
//! assert!(cursor.finish().is_ok());
//! ```
//!
//! [section 5.1 of RFC 9052]: <https://datatracker.ietf.org/doc/html/rfc9052#section-5.1>

mod common;
mod dispatch;
mod error;
mod hpke;
mod key_wrap;

use alloc::boxed::Box;

#[doc(inline)]
pub use self::{
    dispatch::{RecipientDecoders, Unwrapped},
    error::{Error, ErrorKind, FormatError},
    hpke::HpkeRecipientDecoder,
    key_wrap::KeyWrapRecipientDecoder,
};
use crate::{
    cbor::Cursor,
    header::{HeaderLocation, ParameterList, ParameterStorage},
};

/// The successful outcome of [`RecipientDecoder::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recovered {
    /// The header parameters of the recipient
    pub parameters: ParameterList,
    /// The length of the content-encryption key at the beginning of the CEK
    /// buffer
    pub cek_len: usize,
}

/// Recovers the content-encryption key from one kind of `COSE_Recipient`.
///
/// Implementations carry their own key material, which is configured before
/// the decoder is registered, and keep no state between calls.
pub trait RecipientDecoder {
    /// Decodes the recipient at the position of `cursor` and writes the
    /// content-encryption key into the beginning of `cek_buffer`.
    ///
    /// The header parameters of the recipient are decoded into `storage` at
    /// `location`.
    ///
    /// On success and on failure the cursor is left behind the recipient,
    /// unless the recipient is not a well-formed data item. On failure, the
    /// CEK buffer is zeroized and the slots of `storage` claimed by this call
    /// are released.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient is malformed, uses an algorithm this
    /// decoder does not handle, is not meant for the key of this decoder, or
    /// if the key cannot be recovered. See [`ErrorKind`].
    fn decode<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Recovered, Error>;
}

impl<D: RecipientDecoder + ?Sized> RecipientDecoder for &D {
    fn decode<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Recovered, Error> {
        D::decode(self, location, cursor, cek_buffer, storage)
    }
}

impl<D: RecipientDecoder + ?Sized> RecipientDecoder for Box<D> {
    fn decode<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Recovered, Error> {
        D::decode(self, location, cursor, cek_buffer, storage)
    }
}
