//! Recovery of content-encryption keys from the `COSE_Recipient` structures
//! of multi-recipient `COSE_Encrypt` messages ([RFC 9052]).
//!
//! The crate decodes recipients that protect the content-encryption key with
//! AES Key Wrap ([RFC 3394]) or with HPKE in base mode ([RFC 9180]). Decoders
//! for both schemes implement [`RecipientDecoder`], and
//! [`RecipientDecoders`] tries them on the recipients of a message until one
//! recovers the key.
//!
//! Decoding does not allocate: header parameters are stored in a caller
//! supplied [`ParameterStorage`](header::ParameterStorage) and the key is
//! written into a caller supplied buffer.
//!
//! The cryptographic library is selected with a cargo feature, see
//! [`crypto`].
//!
//! [RFC 9052]: <https://datatracker.ietf.org/doc/html/rfc9052>
//! [RFC 3394]: <https://datatracker.ietf.org/doc/html/rfc3394>
//! [RFC 9180]: <https://datatracker.ietf.org/doc/html/rfc9180>
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    explicit_outlives_requirements,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc
)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    macro_use_extern_crate,
    non_ascii_idents,
    elided_lifetimes_in_paths
)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

pub mod algorithm;
pub mod cbor;
pub mod crypto;
pub mod header;
pub mod policy;
pub mod recipient;

pub use recipient::{RecipientDecoder, RecipientDecoders};
