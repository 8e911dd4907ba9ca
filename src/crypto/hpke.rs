//! Keys for [HPKE].
//!
//! [HPKE]: <https://datatracker.ietf.org/doc/html/rfc9180>

use alloc::boxed::Box;
use core::fmt;

use secrecy::{ExposeSecret, SecretBox};

/// The private key of an HPKE receiver, `skR` in [RFC 9180].
///
/// The key is stored in its serialized form, as defined by
/// `SerializePrivateKey` of the KEM: a 32 byte scalar for P-256 and the 32
/// byte X25519 secret. Which KEM it belongs to is only known once it is used
/// with the algorithm of a recipient.
///
/// The key bytes are zeroized on drop and never printed.
///
/// [RFC 9180]: <https://datatracker.ietf.org/doc/html/rfc9180#section-7.1.2>
pub struct SecretKey {
    key: SecretBox<[u8]>,
}

impl SecretKey {
    /// Copies the serialized private key `key`.
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: SecretBox::new(Box::from(key)),
        }
    }
}

impl From<SecretBox<[u8]>> for SecretKey {
    fn from(key: SecretBox<[u8]>) -> Self {
        Self { key }
    }
}

impl ExposeSecret<[u8]> for SecretKey {
    fn expose_secret(&self) -> &[u8] {
        self.key.expose_secret()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}
