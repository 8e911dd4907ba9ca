//! Common test helpers.
#![allow(dead_code)]

use std::cell::Cell;

use aes_kw::{KekAes128, KekAes192, KekAes256};
use cose_recipient::{
    algorithm::{AesKw, Hpke},
    crypto::{self, aes_kw::KeyEncryptionKey, hpke::SecretKey, CryptoBackend, DefaultBackend},
};
use generic_array::GenericArray;
use hpke::{
    aead::{Aead, AesGcm128, ChaCha20Poly1305},
    kdf::HkdfSha256,
    kem::{DhP256HkdfSha256, X25519HkdfSha256},
    Kem, OpModeS, Serializable as _,
};
use minicbor::Encoder;
use rand_core::OsRng;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Decodes a hex test vector.
pub fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).expect("valid hex in test vector")
}

/// Encodes `{1: alg}` with an optional `kid`.
pub fn header_map(alg: Option<i64>, kid: Option<&[u8]>) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new());
    e.map(u64::from(alg.is_some()) + u64::from(kid.is_some()))
        .unwrap();
    if let Some(alg) = alg {
        e.i64(1).unwrap().i64(alg).unwrap();
    }
    if let Some(kid) = kid {
        e.i64(4).unwrap().bytes(kid).unwrap();
    }
    e.into_writer()
}

/// `[h'', {1: alg, ?4: kid}, wrapped]`
pub fn key_wrap_recipient(alg: i64, kid: Option<&[u8]>, wrapped: &[u8]) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new());
    e.array(3).unwrap().bytes(&[]).unwrap();
    let mut out = e.into_writer();
    out.extend(header_map(Some(alg), kid));
    let mut e = Encoder::new(out);
    e.bytes(wrapped).unwrap();
    e.into_writer()
}

/// `[protected, {?4: kid}, enc, ciphertext]`
pub fn hpke_recipient(
    protected: &[u8],
    kid: Option<&[u8]>,
    enc: &[u8],
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new());
    e.array(4).unwrap().bytes(protected).unwrap();
    let mut out = e.into_writer();
    out.extend(header_map(None, kid));
    let mut e = Encoder::new(out);
    e.bytes(enc).unwrap().bytes(ciphertext).unwrap();
    e.into_writer()
}

/// A definite length array of already encoded `items`.
pub fn array(items: &[Vec<u8>]) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new());
    e.array(items.len() as u64).unwrap();
    let mut out = e.into_writer();
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// Wraps `cek` with AES Key Wrap, the variant is picked by the KEK length.
pub fn wrap(kek: &[u8], cek: &[u8]) -> Vec<u8> {
    let mut out = vec![0; cek.len() + 8];
    match kek.len() {
        16 => KekAes128::new(GenericArray::from_slice(kek)).wrap(cek, &mut out),
        24 => KekAes192::new(GenericArray::from_slice(kek)).wrap(cek, &mut out),
        32 => KekAes256::new(GenericArray::from_slice(kek)).wrap(cek, &mut out),
        len => panic!("no AES Key Wrap variant for a {len} byte KEK"),
    }
    .unwrap();
    out
}

/// A receiver key pair of an HPKE suite, derived from `ikm`.
pub struct Receiver {
    pub suite: Hpke,
    pub secret_key: SecretKey,
    public_key: Vec<u8>,
}

impl Receiver {
    pub fn derive(suite: Hpke, ikm: &[u8]) -> Self {
        let (secret_key, public_key) = match suite {
            Hpke::P256Sha256Aes128Gcm | Hpke::P256Sha256ChaCha20Poly1305 => {
                let (sk, pk) = DhP256HkdfSha256::derive_keypair(ikm);
                (sk.to_bytes().to_vec(), pk.to_bytes().to_vec())
            }
            Hpke::X25519Sha256Aes128Gcm | Hpke::X25519Sha256ChaCha20Poly1305 => {
                let (sk, pk) = X25519HkdfSha256::derive_keypair(ikm);
                (sk.to_bytes().to_vec(), pk.to_bytes().to_vec())
            }
        };

        Self {
            suite,
            secret_key: SecretKey::new(&secret_key),
            public_key,
        }
    }

    /// Encrypts `cek` to this receiver, returns the encapsulated key and the
    /// ciphertext.
    pub fn seal(&self, aad: &[u8], cek: &[u8]) -> (Vec<u8>, Vec<u8>) {
        match self.suite {
            Hpke::P256Sha256Aes128Gcm => {
                seal::<AesGcm128, DhP256HkdfSha256>(&self.public_key, aad, cek)
            }
            Hpke::P256Sha256ChaCha20Poly1305 => {
                seal::<ChaCha20Poly1305, DhP256HkdfSha256>(&self.public_key, aad, cek)
            }
            Hpke::X25519Sha256Aes128Gcm => {
                seal::<AesGcm128, X25519HkdfSha256>(&self.public_key, aad, cek)
            }
            Hpke::X25519Sha256ChaCha20Poly1305 => {
                seal::<ChaCha20Poly1305, X25519HkdfSha256>(&self.public_key, aad, cek)
            }
        }
    }
}

fn seal<A: Aead, K: Kem>(public_key: &[u8], aad: &[u8], cek: &[u8]) -> (Vec<u8>, Vec<u8>) {
    use hpke::Deserializable as _;

    let pk = K::PublicKey::from_bytes(public_key).unwrap();
    let (enc, ciphertext) = hpke::single_shot_seal::<A, HkdfSha256, K, _>(
        &OpModeS::Base,
        &pk,
        b"",
        cek,
        aad,
        &mut OsRng,
    )
    .unwrap();
    (enc.to_bytes().to_vec(), ciphertext)
}

/// A [`CryptoBackend`] that counts how often it is called and forwards to
/// the [`DefaultBackend`].
#[derive(Debug, Default)]
pub struct CountingBackend {
    calls: Cell<usize>,
}

impl CountingBackend {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CryptoBackend for CountingBackend {
    fn kw_unwrap(
        &self,
        alg: AesKw,
        kek: &KeyEncryptionKey,
        ciphertext: &[u8],
        out: &mut [u8],
    ) -> crypto::Result<usize> {
        self.calls.set(self.calls.get() + 1);
        DefaultBackend.kw_unwrap(alg, kek, ciphertext, out)
    }

    fn hpke_decrypt(
        &self,
        alg: Hpke,
        enc: &[u8],
        skr: &SecretKey,
        ciphertext: &[u8],
        aad: &[u8],
        out: &mut [u8],
    ) -> crypto::Result<usize> {
        self.calls.set(self.calls.get() + 1);
        DefaultBackend.hpke_decrypt(alg, enc, skr, ciphertext, aad, out)
    }
}
