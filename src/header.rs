//! Decoding of the protected and unprotected header buckets of a COSE
//! structure, as defined in [section 3 of RFC 9052].
//!
//! The decoder does not allocate. Decoded [`Parameter`]s borrow from the
//! input and are written into a caller supplied [`ParameterStorage`].
//!
//! [section 3 of RFC 9052]: <https://datatracker.ietf.org/doc/html/rfc9052#section-3>

mod decode;
mod error;
mod location;
mod parameter;
mod storage;

#[doc(inline)]
pub use self::{
    decode::{decode, DecodedHeaders},
    error::Error,
    location::HeaderLocation,
    parameter::{Bucket, Label, Parameter, Value},
    storage::{ParameterList, ParameterStorage},
};

/// The labels of the common header parameters of [section 3.1 of RFC 9052].
///
/// [section 3.1 of RFC 9052]: <https://datatracker.ietf.org/doc/html/rfc9052#section-3.1>
pub mod label {
    /// `alg`
    pub const ALGORITHM: i64 = 1;
    /// `crit`
    pub const CRITICAL: i64 = 2;
    /// `content type`
    pub const CONTENT_TYPE: i64 = 3;
    /// `kid`
    pub const KEY_ID: i64 = 4;
    /// `IV`
    pub const IV: i64 = 5;
    /// `Partial IV`
    pub const PARTIAL_IV: i64 = 6;
}
