use super::{common, Error, RecipientDecoder, Recovered};
use crate::{
    algorithm::Algorithm,
    cbor::Cursor,
    crypto::{hpke::SecretKey, CryptoBackend, DefaultBackend},
    header::{HeaderLocation, ParameterStorage},
    policy::KidMatch,
};

/// Decodes recipients that carry the content-encryption key encrypted with
/// single shot HPKE in base mode, see [draft-ietf-cose-hpke].
///
/// Such a recipient is an array of the protected bucket, the unprotected
/// bucket, the encapsulated key and the ciphertext:
///
/// ```text
/// [protected: bstr, unprotected: map, enc: bstr, ciphertext: bstr]
/// ```
///
/// The encoded protected bucket is authenticated as the additional data of
/// the HPKE ciphertext, the HPKE `info` is empty.
///
/// [draft-ietf-cose-hpke]: <https://datatracker.ietf.org/doc/draft-ietf-cose-hpke/>
#[derive(Debug, Clone)]
pub struct HpkeRecipientDecoder<'k, C = DefaultBackend> {
    secret_key: Option<&'k SecretKey>,
    kid: Option<&'k [u8]>,
    kid_match: KidMatch,
    backend: C,
}

impl HpkeRecipientDecoder<'_> {
    /// Creates a decoder without a key, using the [`DefaultBackend`].
    pub const fn new() -> Self {
        Self {
            secret_key: None,
            kid: None,
            kid_match: KidMatch::IfPresent,
            backend: DefaultBackend,
        }
    }
}

impl Default for HpkeRecipientDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k, C> HpkeRecipientDecoder<'k, C> {
    /// Uses `backend` for the HPKE operations.
    pub fn with_backend<D: CryptoBackend>(self, backend: D) -> HpkeRecipientDecoder<'k, D> {
        HpkeRecipientDecoder {
            secret_key: self.secret_key,
            kid: self.kid,
            kid_match: self.kid_match,
            backend,
        }
    }

    /// Sets the private key of the receiver, `skR`.
    pub fn set_secret_key(mut self, secret_key: &'k SecretKey) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    /// Sets the identifier of the receiver key.
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

impl<C: CryptoBackend> HpkeRecipientDecoder<'_, C> {
    fn try_decode<'b>(
        &self,
        location: HeaderLocation,
        cursor: &mut Cursor<'b>,
        cek_buffer: &mut [u8],
        storage: &mut ParameterStorage<'_, 'b>,
    ) -> Result<Recovered, Error> {
        let recipient = common::open_recipient(cursor, location, storage)?;
        let parameters = recipient.headers.parameters;

        self.kid_match.check(self.kid, storage.key_id(parameters))?;
        let alg = common::algorithm(storage, parameters, |alg| match alg {
            Algorithm::Hpke(alg) => Some(alg),
            _ => None,
        })?;
        let [enc, ciphertext] = recipient.read_fields::<2>(cursor)?;
        let secret_key = self.secret_key.ok_or(Error::NoKey)?;

        tracing::trace!(
            alg = Algorithm::from(alg).id(),
            enc_len = enc.len(),
            ciphertext_len = ciphertext.len(),
            "opening content-encryption key"
        );
        let cek_len = self
            .backend
            .hpke_decrypt(
                alg,
                enc,
                secret_key,
                ciphertext,
                recipient.headers.protected,
                cek_buffer,
            )
            .map_err(|err| common::crypto_error(err, cek_buffer.len()))?;

        Ok(Recovered {
            parameters,
            cek_len,
        })
    }
}

impl<C: CryptoBackend> RecipientDecoder for HpkeRecipientDecoder<'_, C> {
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
