use crate::cbor;

/// Errors that may occur while decoding the protected and unprotected header
/// buckets of a COSE structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The CBOR structure of a bucket is invalid, see [`cbor::Error`].
    #[error(transparent)]
    Cbor(#[from] cbor::Error),
    /// A header parameter label is neither an integer nor a text string
    #[error("header parameter label is neither an integer nor a text string")]
    InvalidLabel,
    /// A parameter defined by [section 3.1 of RFC 9052] has a value of the
    /// wrong type
    ///
    /// [section 3.1 of RFC 9052]: <https://datatracker.ietf.org/doc/html/rfc9052#section-3.1>
    #[error("header parameter {label} has a value of the wrong type")]
    InvalidValue {
        /// The label of the offending parameter
        label: i64,
    },
    /// The same label appears more than once, within one bucket or across the
    /// protected and unprotected bucket
    #[error("header parameter appears more than once")]
    DuplicateParameter,
    /// The `crit` parameter was found in the unprotected bucket
    #[error("the critical parameters list must be protected")]
    CriticalNotProtected,
    /// The `crit` parameter is present but an empty array
    #[error("the critical parameters list is empty")]
    EmptyCriticalParameters,
    /// The `crit` parameter lists a label this implementation does not
    /// understand
    #[error("a critical header parameter is not understood")]
    UnknownCriticalParameter,
    /// Both the IV and the Partial IV parameter are present
    #[error("both IV and Partial IV are present")]
    IvAndPartialIv,
    /// A parameter was found at a location where it has no meaning
    #[error("header parameter {label} is not allowed at this location")]
    NotAllowedHere {
        /// The label of the offending parameter
        label: i64,
    },
    /// The caller supplied [`ParameterStorage`](super::ParameterStorage) has
    /// no free slot left
    #[error("parameter storage is full, capacity is {capacity}")]
    StorageExhausted {
        /// The number of slots of the storage
        capacity: usize,
    },
}
