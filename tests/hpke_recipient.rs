mod common;

use common::{header_map, hpke_recipient, CountingBackend, Receiver};
use cose_recipient::{
    algorithm::{Algorithm, Hpke},
    cbor::Cursor,
    crypto::hpke::SecretKey,
    header::{HeaderLocation, Parameter, ParameterStorage},
    policy::KidMatch,
    recipient::{Error, ErrorKind, HpkeRecipientDecoder},
    RecipientDecoder,
};

const RECIPIENT: HeaderLocation = HeaderLocation::new(1, 0);

const SUITES: [Hpke; 4] = [
    Hpke::P256Sha256Aes128Gcm,
    Hpke::P256Sha256ChaCha20Poly1305,
    Hpke::X25519Sha256Aes128Gcm,
    Hpke::X25519Sha256ChaCha20Poly1305,
];

fn decode<D: RecipientDecoder>(decoder: &D, input: &[u8], cek: &mut [u8]) -> Result<usize, Error> {
    let mut slots: [Option<Parameter<'_>>; 8] = [None; 8];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(input);

    let result = decoder.decode(RECIPIENT, &mut cursor, cek, &mut storage);
    assert!(cursor.finish().is_ok(), "cursor must end behind the recipient");
    result.map(|recovered| recovered.cek_len)
}

/// A recipient for `receiver` with the algorithm in the protected bucket.
fn sealed(receiver: &Receiver, kid: Option<&[u8]>, cek: &[u8]) -> Vec<u8> {
    let protected = header_map(Some(Algorithm::from(receiver.suite).id()), None);
    let (enc, ciphertext) = receiver.seal(&protected, cek);
    hpke_recipient(&protected, kid, &enc, &ciphertext)
}

#[test]
fn round_trip_all_suites() {
    let cek = [0x42; 16];
    for suite in SUITES {
        let receiver = Receiver::derive(suite, b"round trip receiver");
        let decoder = HpkeRecipientDecoder::new().set_secret_key(&receiver.secret_key);

        let mut out = [0u8; 32];
        let len = decode(&decoder, &sealed(&receiver, None, &cek), &mut out)
            .unwrap_or_else(|err| panic!("{suite:?}: {err}"));
        assert_eq!(&out[..len], &cek, "{suite:?}");
    }
}

#[test]
fn parameters_of_both_buckets_are_returned() {
    let receiver = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"parameters");
    let decoder = HpkeRecipientDecoder::new()
        .set_secret_key(&receiver.secret_key)
        .set_kid(b"receiver-1");
    let input = sealed(&receiver, Some(&b"receiver-1"[..]), &[7; 32]);

    let mut slots: [Option<Parameter<'_>>; 8] = [None; 8];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&input);
    let mut out = [0u8; 32];
    let recovered = decoder
        .decode(RECIPIENT, &mut cursor, &mut out, &mut storage)
        .unwrap();

    assert_eq!(recovered.cek_len, 32);
    assert_eq!(recovered.parameters.len(), 2);
    assert_eq!(storage.algorithm(recovered.parameters), Some(41));
    assert_eq!(storage.key_id(recovered.parameters), Some(&b"receiver-1"[..]));
}

#[test]
fn protected_headers_are_authenticated() {
    let receiver = Receiver::derive(Hpke::X25519Sha256ChaCha20Poly1305, b"aad");
    let protected = header_map(Some(42), None);
    let (enc, ciphertext) = receiver.seal(&protected, &[0x42; 16]);

    // same algorithm, but the protected bucket has a different encoding
    let mut tampered = vec![0xb9, 0x00, 0x01];
    tampered.extend_from_slice(&protected[1..]);
    let input = hpke_recipient(&tampered, None, &enc, &ciphertext);

    let decoder = HpkeRecipientDecoder::new().set_secret_key(&receiver.secret_key);
    let mut out = [0u8; 16];
    let err = decode(&decoder, &input, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecryptFailure);
}

#[test]
fn wrong_receiver_key() {
    let receiver = Receiver::derive(Hpke::P256Sha256Aes128Gcm, b"intended");
    let other = Receiver::derive(Hpke::P256Sha256Aes128Gcm, b"somebody else");
    let input = sealed(&receiver, None, &[0x42; 16]);

    let decoder = HpkeRecipientDecoder::new().set_secret_key(&other.secret_key);
    let mut out = [0xee; 16];
    let err = decode(&decoder, &input, &mut out).unwrap_err();
    assert!(matches!(err, Error::DecryptFailure(_)));
    assert_eq!(out, [0; 16], "CEK buffer must be zeroized");
}

#[test]
fn kid_mismatch_skips_decryption() {
    let receiver = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"kid");
    let backend = CountingBackend::default();
    let decoder = HpkeRecipientDecoder::new()
        .set_secret_key(&receiver.secret_key)
        .set_kid(b"receiver-1")
        .with_backend(&backend);

    let input = sealed(&receiver, Some(&b"receiver-2"[..]), &[0x42; 16]);
    let mut out = [0u8; 16];
    let err = decode(&decoder, &input, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyMismatch);
    assert_eq!(backend.calls(), 0);

    // without a kid in the recipient, the key is tried
    let input = sealed(&receiver, None, &[0x42; 16]);
    assert_eq!(decode(&decoder, &input, &mut out).unwrap(), 16);
    assert_eq!(backend.calls(), 1);

    let decoder = decoder.set_kid_match(KidMatch::Required);
    let err = decode(&decoder, &input, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyMismatch);
    assert_eq!(backend.calls(), 1);
}

#[test]
fn key_of_the_wrong_length() {
    let receiver = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"length");
    let input = sealed(&receiver, None, &[0x42; 16]);

    let short = SecretKey::new(&[1; 16]);
    let decoder = HpkeRecipientDecoder::new().set_secret_key(&short);
    let mut out = [0u8; 16];
    let err = decode(&decoder, &input, &mut out).unwrap_err();
    assert!(matches!(err, Error::WrongKey));
}

#[test]
fn truncated_encapsulated_key() {
    let receiver = Receiver::derive(Hpke::P256Sha256ChaCha20Poly1305, b"enc");
    let protected = header_map(Some(36), None);
    let (enc, ciphertext) = receiver.seal(&protected, &[0x42; 16]);
    let input = hpke_recipient(&protected, None, &enc[..enc.len() - 1], &ciphertext);

    let decoder = HpkeRecipientDecoder::new().set_secret_key(&receiver.secret_key);
    let mut out = [0u8; 16];
    let err = decode(&decoder, &input, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecryptFailure);
}

#[test]
fn algorithm_in_the_unprotected_bucket() {
    let receiver = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"unprotected");
    let (enc, ciphertext) = receiver.seal(&[], &[0x42; 16]);

    let mut input = vec![0x84, 0x40];
    input.extend(header_map(Some(41), None));
    let mut rest = hpke_recipient(&[], None, &enc, &ciphertext);
    // drop the array header, the empty protected bucket and the empty map
    input.extend(rest.drain(3..));

    let decoder = HpkeRecipientDecoder::new().set_secret_key(&receiver.secret_key);
    let mut out = [0u8; 16];
    assert_eq!(decode(&decoder, &input, &mut out).unwrap(), 16);
}
