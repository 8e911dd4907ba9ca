/// HPKE in base mode as registered for COSE by [draft-ietf-cose-hpke]
///
/// The name of each variant lists the KEM, KDF and AEAD of the ciphersuite.
///
/// [draft-ietf-cose-hpke]: <https://datatracker.ietf.org/doc/draft-ietf-cose-hpke/>
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
pub enum Hpke {
    /// `HPKE-Base-P256-SHA256-AES128GCM`
    P256Sha256Aes128Gcm,
    /// `HPKE-Base-P256-SHA256-ChaCha20Poly1305`
    P256Sha256ChaCha20Poly1305,
    /// `HPKE-Base-X25519-SHA256-AES128GCM`
    X25519Sha256Aes128Gcm,
    /// `HPKE-Base-X25519-SHA256-ChaCha20Poly1305`
    X25519Sha256ChaCha20Poly1305,
}

impl Hpke {
    /// The KEM of this ciphersuite.
    pub const fn kem(self) -> Kem {
        match self {
            Self::P256Sha256Aes128Gcm | Self::P256Sha256ChaCha20Poly1305 => Kem::P256Sha256,
            Self::X25519Sha256Aes128Gcm | Self::X25519Sha256ChaCha20Poly1305 => {
                Kem::X25519Sha256
            }
        }
    }
}

/// The key encapsulation mechanisms used by the supported [`Hpke`] suites.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
pub enum Kem {
    /// `DHKEM(P-256, HKDF-SHA256)`
    P256Sha256,
    /// `DHKEM(X25519, HKDF-SHA256)`
    X25519Sha256,
}

impl Kem {
    /// The length of a serialized private key in bytes.
    pub const fn private_key_len(self) -> usize {
        match self {
            Self::P256Sha256 | Self::X25519Sha256 => 32,
        }
    }

    /// The length of an encapsulated key in bytes.
    pub const fn encapsulated_key_len(self) -> usize {
        match self {
            // uncompressed SEC1 point
            Self::P256Sha256 => 65,
            Self::X25519Sha256 => 32,
        }
    }
}

impl From<Hpke> for super::Algorithm {
    fn from(x: Hpke) -> Self {
        Self::Hpke(x)
    }
}
