use crate::{cbor, crypto, header, policy::KidMatchFail};

/// The class of a recipient decoding failure.
///
/// Every [`Error`] belongs to exactly one kind, see [`Error::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The recipient structure or its headers are malformed.
    Format,
    /// The algorithm is absent, unknown or not handled by the decoder.
    UnsupportedAlgorithm,
    /// The decoder holds no key for this recipient.
    KeyMismatch,
    /// The cryptographic primitive rejected the recipient.
    DecryptFailure,
    /// A caller supplied buffer is too small.
    StorageExhausted,
}

impl ErrorKind {
    /// Orders kinds by how much they tell about a recipient. The dispatch
    /// loop reports the highest ranked error if every attempt failed.
    pub(crate) const fn rank(self) -> u8 {
        match self {
            Self::UnsupportedAlgorithm => 0,
            Self::Format => 1,
            Self::KeyMismatch => 2,
            Self::DecryptFailure => 3,
            Self::StorageExhausted => 4,
        }
    }
}

/// Errors that may occur while decoding a `COSE_Recipient`
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The structure of the recipient is invalid, see [`FormatError`]
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The `alg` parameter is absent, or names an algorithm the decoder does
    /// not implement. Contains the integer id, if there was one.
    #[error("unsupported recipient algorithm")]
    UnsupportedAlgorithm(Option<i64>),
    /// The key identifier check failed
    #[error(transparent)]
    KeyId(#[from] KidMatchFail),
    /// The configured key cannot be used with the algorithm of the recipient
    #[error("the configured key does not fit the recipient algorithm")]
    WrongKey,
    /// The decoder was registered without a key
    #[error("no key configured for this decoder")]
    NoKey,
    /// The crypto backend failed to recover the content-encryption key
    #[error("failed to recover the content-encryption key")]
    DecryptFailure(#[source] crypto::Error),
    /// The parameter storage has no free slot left
    #[error("parameter storage is full, capacity is {capacity}")]
    StorageExhausted {
        /// The number of slots of the storage
        capacity: usize,
    },
    /// The content-encryption key does not fit into the supplied buffer
    #[error("content-encryption key of {needed} bytes does not fit into {capacity} bytes")]
    CekBufferTooSmall {
        /// The length of the recovered key
        needed: usize,
        /// The length of the supplied buffer
        capacity: usize,
    },
    /// The dispatch loop has no decoder registered
    #[error("no recipient decoder registered")]
    NoDecoders,
    /// The recipients array is empty
    #[error("the message has no recipients")]
    NoRecipients,
}

impl Error {
    /// The class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) | Self::NoRecipients => ErrorKind::Format,
            Self::UnsupportedAlgorithm(_) | Self::NoDecoders => ErrorKind::UnsupportedAlgorithm,
            Self::KeyId(_) | Self::WrongKey | Self::NoKey => ErrorKind::KeyMismatch,
            Self::DecryptFailure(_) => ErrorKind::DecryptFailure,
            Self::StorageExhausted { .. } | Self::CekBufferTooSmall { .. } => {
                ErrorKind::StorageExhausted
            }
        }
    }
}

impl From<cbor::Error> for Error {
    fn from(err: cbor::Error) -> Self {
        Self::Format(FormatError::Cbor(err))
    }
}

impl From<header::Error> for Error {
    fn from(err: header::Error) -> Self {
        match err {
            header::Error::StorageExhausted { capacity } => Self::StorageExhausted { capacity },
            header::Error::Cbor(err) => err.into(),
            err => Self::Format(FormatError::Header(err)),
        }
    }
}

/// The ways a `COSE_Recipient` can be malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    /// The CBOR structure is invalid
    #[error(transparent)]
    Cbor(cbor::Error),
    /// One of the header buckets is invalid
    #[error(transparent)]
    Header(header::Error),
    /// The recipient array has the wrong number of fields
    #[error("recipient has {found} fields, expected {expected}")]
    FieldCount {
        /// The number of fields of the algorithm
        expected: u64,
        /// The number of fields of the array
        found: u64,
    },
    /// The algorithm requires an empty protected bucket
    #[error("protected header parameters are not allowed for this algorithm")]
    ProtectedHeaders,
}
