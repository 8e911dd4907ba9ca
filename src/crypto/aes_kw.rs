//! Keys for [AES Key Wrap].
//!
//! [AES Key Wrap]: <https://datatracker.ietf.org/doc/html/rfc3394>

use alloc::boxed::Box;
use core::fmt;

use secrecy::{ExposeSecret, SecretBox};

/// A symmetric key-encryption key (KEK) for AES Key Wrap.
///
/// The key length is not fixed here. It is checked against the algorithm of
/// a recipient when the key is used, a 16 byte key can only unwrap `A128KW`
/// recipients.
///
/// The key bytes are zeroized on drop and never printed.
pub struct KeyEncryptionKey {
    key: SecretBox<[u8]>,
}

impl KeyEncryptionKey {
    /// Copies `key` into a new key-encryption key.
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: SecretBox::new(Box::from(key)),
        }
    }

    /// The length of the key in bytes.
    pub fn len(&self) -> usize {
        self.key.expose_secret().len()
    }

    /// Returns `true` for a zero length key.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<SecretBox<[u8]>> for KeyEncryptionKey {
    fn from(key: SecretBox<[u8]>) -> Self {
        Self { key }
    }
}

impl ExposeSecret<[u8]> for KeyEncryptionKey {
    fn expose_secret(&self) -> &[u8] {
        self.key.expose_secret()
    }
}

impl fmt::Debug for KeyEncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEncryptionKey")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
