//! The COSE algorithms understood by the recipient decoders, as registered in
//! the [IANA `COSE Algorithms` registry][1].
//!
//! [1]: <https://www.iana.org/assignments/cose/cose.xhtml#algorithms>

mod aes_kw;
mod hpke;

#[doc(inline)]
pub use self::{
    aes_kw::AesKw,
    hpke::{Hpke, Kem},
};

/// A COSE algorithm used to protect the content-encryption key of a
/// `COSE_Recipient`.
///
/// This enum covers the values of the `alg` header parameter (label `1`) that
/// this implementation can act upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Algorithm {
    /// AES Key Wrap
    AesKw(AesKw),
    /// Hybrid public key encryption in base mode
    Hpke(Hpke),
    /// Algorithms that no decoder of this crate acts upon.
    ///
    /// This includes registered HPKE suites, such as the P-384, P-521 and
    /// X448 based ones, that no crypto backend of this crate implements.
    /// Those are still displayed with their registered name.
    Other(i64),
}

impl_cose_algorithm!(
    Algorithm,
    [
        -3, "A128KW" => Self::AesKw(AesKw::Aes128); Self::AesKw(AesKw::Aes128),
        -4, "A192KW" => Self::AesKw(AesKw::Aes192); Self::AesKw(AesKw::Aes192),
        -5, "A256KW" => Self::AesKw(AesKw::Aes256); Self::AesKw(AesKw::Aes256),

        35, "HPKE-Base-P256-SHA256-AES128GCM" =>
            Self::Hpke(Hpke::P256Sha256Aes128Gcm);
            Self::Hpke(Hpke::P256Sha256Aes128Gcm),
        36, "HPKE-Base-P256-SHA256-ChaCha20Poly1305" =>
            Self::Hpke(Hpke::P256Sha256ChaCha20Poly1305);
            Self::Hpke(Hpke::P256Sha256ChaCha20Poly1305),
        41, "HPKE-Base-X25519-SHA256-AES128GCM" =>
            Self::Hpke(Hpke::X25519Sha256Aes128Gcm);
            Self::Hpke(Hpke::X25519Sha256Aes128Gcm),
        42, "HPKE-Base-X25519-SHA256-ChaCha20Poly1305" =>
            Self::Hpke(Hpke::X25519Sha256ChaCha20Poly1305);
            Self::Hpke(Hpke::X25519Sha256ChaCha20Poly1305),
    ],
    unimplemented: [
        37, "HPKE-Base-P384-SHA384-AES256GCM",
        38, "HPKE-Base-P384-SHA384-ChaCha20Poly1305",
        39, "HPKE-Base-P521-SHA512-AES256GCM",
        40, "HPKE-Base-P521-SHA512-ChaCha20Poly1305",
        43, "HPKE-Base-X448-SHA512-AES256GCM",
        44, "HPKE-Base-X448-SHA512-ChaCha20Poly1305",
    ]
);
