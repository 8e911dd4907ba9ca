/// AES Key Wrap as defined in [section 6.2.1 of RFC 9053], using the default
/// initial value of [RFC 3394]
///
/// [section 6.2.1 of RFC 9053]: <https://datatracker.ietf.org/doc/html/rfc9053#section-6.2.1>
/// [RFC 3394]: <https://datatracker.ietf.org/doc/html/rfc3394>
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
pub enum AesKw {
    /// `A128KW`, AES Key Wrap using a 128-bit key
    Aes128,
    /// `A192KW`, AES Key Wrap using a 192-bit key
    Aes192,
    /// `A256KW`, AES Key Wrap using a 256-bit key
    Aes256,
}

impl AesKw {
    /// The length of the key-encryption key in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

impl From<AesKw> for super::Algorithm {
    fn from(x: AesKw) -> Self {
        Self::AesKw(x)
    }
}
