use super::{common, Error, FormatError, RecipientDecoder, Recovered};
use crate::{
    algorithm::Algorithm,
    cbor::Cursor,
    crypto::{aes_kw::KeyEncryptionKey, CryptoBackend, DefaultBackend},
    header::{HeaderLocation, ParameterStorage},
    policy::KidMatch,
};

/// Decodes recipients that carry the content-encryption key wrapped with AES
/// Key Wrap, see [section 6.2.1 of RFC 9053].
///
/// Such a recipient is an array of an empty protected bucket, the unprotected
/// bucket and the wrapped key. The unprotected bucket must name one of the
/// `A128KW`, `A192KW` or `A256KW` algorithms.
///
/// [section 6.2.1 of RFC 9053]: <https://datatracker.ietf.org/doc/html/rfc9053#section-6.2.1>
#[derive(Debug, Clone)]
pub struct KeyWrapRecipientDecoder<'k, C = DefaultBackend> {
    kek: Option<&'k KeyEncryptionKey>,
    kid: Option<&'k [u8]>,
    kid_match: KidMatch,
    backend: C,
}

impl KeyWrapRecipientDecoder<'_> {
    /// Creates a decoder without a key, using the [`DefaultBackend`].
    ///
    /// Until a key is set with [`set_kek`](Self::set_kek), every recipient
    /// fails with [`Error::NoKey`].
    pub const fn new() -> Self {
        Self {
            kek: None,
            kid: None,
            kid_match: KidMatch::IfPresent,
            backend: DefaultBackend,
        }
    }
}

impl Default for KeyWrapRecipientDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k, C> KeyWrapRecipientDecoder<'k, C> {
    /// Uses `backend` for the unwrap operation.
    pub fn with_backend<D: CryptoBackend>(self, backend: D) -> KeyWrapRecipientDecoder<'k, D> {
        KeyWrapRecipientDecoder {
            kek: self.kek,
            kid: self.kid,
            kid_match: self.kid_match,
            backend,
        }
    }

    /// Sets the key-encryption key.
    pub fn set_kek(mut self, kek: &'k KeyEncryptionKey) -> Self {
        self.kek = Some(kek);
        self
    }

    /// Sets the identifier of the key-encryption key.
    ///
    /// It is compared with the `kid` of every recipient as configured with
    /// [`set_kid_match`](Self::set_kid_match).
    pub fn set_kid(mut self, kid: &'k [u8]) -> Self {
        self.kid = Some(kid);
        self
    }

    /// Sets how the identifier set with [`set_kid`](Self::set_kid) is
    /// matched, the default is [`KidMatch::IfPresent`].
    pub fn set_kid_match(mut self, kid_match: KidMatch) -> Self {
        self.kid_match = kid_match;
        self
    }
}

impl<C: CryptoBackend> KeyWrapRecipientDecoder<'_, C> {
    fn try_decode<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Recovered, Error> {
        let recipient = common::open_recipient(cursor, location, storage)?;
        let parameters = recipient.headers.parameters;
        let alg = common::algorithm(storage, parameters, |alg| match alg {
            Algorithm::AesKw(alg) => Some(alg),
            _ => None,
        })?;
        if !recipient.headers.protected.is_empty() {
            return Err(FormatError::ProtectedHeaders.into());
        }
        let [wrapped] = recipient.read_fields::<1>(cursor)?;

        self.kid_match.check(self.kid, storage.key_id(parameters))?;
        let kek = self.kek.ok_or(Error::NoKey)?;

        tracing::trace!(
            alg = Algorithm::from(alg).id(),
            wrapped_len = wrapped.len(),
            "unwrapping content-encryption key"
        );
        let cek_len = self
            .backend
            .kw_unwrap(alg, kek, wrapped, cek_buffer)
            .map_err(|err| common::crypto_error(err, cek_buffer.len()))?;

        Ok(Recovered {
            parameters,
            cek_len,
        })
    }
}

impl<C: CryptoBackend> RecipientDecoder for KeyWrapRecipientDecoder<'_, C> {
    fn decode<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Recovered, Error> {
        let start = common::Start::new(cursor, storage);
        let result = self.try_decode(location, cursor, cek_buffer, storage);
        start.rewind(result, cursor, cek_buffer, storage)
    }
}
