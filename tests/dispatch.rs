mod common;

use common::{
    array, header_map, hpke_recipient, key_wrap_recipient, unhex, wrap, CountingBackend, Receiver,
};
use cose_recipient::{
    algorithm::Hpke,
    cbor::Cursor,
    crypto::aes_kw::KeyEncryptionKey,
    header::{self, HeaderLocation, Parameter, ParameterStorage},
    policy::StrictPolicy,
    recipient::{Error, ErrorKind, HpkeRecipientDecoder, KeyWrapRecipientDecoder},
    RecipientDecoders,
};

const KEK: [u8; 16] = [0x5a; 16];
const CEK: [u8; 16] = [0x17; 16];

#[test]
fn second_decoder_second_recipient() {
    let ours = KeyEncryptionKey::new(&KEK);
    let receiver = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"dispatch");
    let stranger = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"stranger");

    let protected = header_map(Some(41), None);
    let (enc, ciphertext) = stranger.seal(&protected, &CEK);
    let recipients = array(&[
        hpke_recipient(&protected, Some(&b"stranger"[..]), &enc, &ciphertext),
        key_wrap_recipient(-3, Some(&b"ours"[..]), &wrap(&KEK, &CEK)),
        key_wrap_recipient(-3, None, &[0; 24]),
    ]);

    let mut decoders = RecipientDecoders::new();
    decoders
        .add(HpkeRecipientDecoder::new().set_secret_key(&receiver.secret_key))
        .add(KeyWrapRecipientDecoder::new().set_kek(&ours).set_kid(b"ours"));

    let mut slots: [Option<Parameter<'_>>; 8] = [None; 8];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let mut cek = [0u8; 32];
    let unwrapped = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap();

    assert_eq!(unwrapped.cek, &CEK);
    assert_eq!(unwrapped.decoder, 1);
    assert_eq!(unwrapped.recipient, HeaderLocation::new(1, 1));
    assert!(cursor.finish().is_ok(), "remaining recipients must be skipped");

    // only the parameters of the successful recipient stay in the storage
    assert_eq!(storage.len(), 2);
    assert_eq!(storage.algorithm(unwrapped.parameters), Some(-3));
    assert_eq!(storage.key_id(unwrapped.parameters), Some(&b"ours"[..]));
}

#[test]
fn body_headers_share_the_storage() {
    let ours = KeyEncryptionKey::new(&KEK);
    let mut decoders = RecipientDecoders::new();
    decoders.add(KeyWrapRecipientDecoder::new().set_kek(&ours));

    // protected {1: 1}, unprotected {5: h'00..00'}, then the recipients
    let mut message = unhex("43a10101a1054c000000000000000000000000");
    message.extend(array(&[key_wrap_recipient(-3, None, &wrap(&KEK, &CEK))]));

    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&message);
    let body = header::decode(&mut cursor, HeaderLocation::BODY, &mut storage).unwrap();

    let mut cek = [0u8; 16];
    let unwrapped = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap();
    assert_eq!(unwrapped.cek, &CEK);
    assert!(cursor.finish().is_ok());

    assert_eq!(storage.len(), 3);
    assert_eq!(storage.algorithm(body.parameters), Some(1));
    assert_eq!(body.protected, &[0xa1, 0x01, 0x01]);
    assert_eq!(storage.algorithm(unwrapped.parameters), Some(-3));
}

#[test]
fn most_telling_error_wins() {
    let ours = KeyEncryptionKey::new(&KEK);
    let recipients = array(&[
        key_wrap_recipient(-65535, None, &[0; 24]),
        key_wrap_recipient(-3, None, &wrap(&[0x01; 16], &CEK)),
        unhex("83"),
    ]);
    // the last recipient is cut off, drop it and fix the array length
    let mut recipients = recipients[..recipients.len() - 1].to_vec();
    recipients[0] = 0x82;

    let mut decoders = RecipientDecoders::new();
    decoders.add(KeyWrapRecipientDecoder::new().set_kek(&ours));

    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let mut cek = [0xee; 16];
    let err = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DecryptFailure);
    assert_eq!(cek, [0; 16]);
    assert!(storage.is_empty());
    assert!(cursor.finish().is_ok());
}

#[test]
fn strict_policy_stops_at_malformed_recipient() {
    let ours = KeyEncryptionKey::new(&KEK);
    let recipients = array(&[
        // a key wrap recipient with a protected bucket
        unhex("8343a10122a05818000000000000000000000000000000000000000000000000"),
        key_wrap_recipient(-3, None, &wrap(&KEK, &CEK)),
    ]);

    let backend = CountingBackend::default();
    let mut decoders = RecipientDecoders::new().with_policy(StrictPolicy);
    decoders.add(
        KeyWrapRecipientDecoder::new()
            .set_kek(&ours)
            .with_backend(&backend),
    );

    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let mut cek = [0u8; 16];
    let err = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(backend.calls(), 0);

    // the standard policy moves on to the next recipient
    let mut decoders = RecipientDecoders::new();
    decoders.add(KeyWrapRecipientDecoder::new().set_kek(&ours));
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let unwrapped = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap();
    assert_eq!(unwrapped.recipient, HeaderLocation::new(1, 1));
    assert_eq!(unwrapped.cek, &CEK);
}

#[test]
fn storage_exhaustion_stops_dispatch() {
    let ours = KeyEncryptionKey::new(&KEK);
    let recipients = array(&[
        key_wrap_recipient(-3, Some(&b"too many parameters"[..]), &wrap(&KEK, &CEK)),
        key_wrap_recipient(-3, None, &wrap(&KEK, &CEK)),
    ]);

    let backend = CountingBackend::default();
    let mut decoders = RecipientDecoders::new();
    decoders.add(
        KeyWrapRecipientDecoder::new()
            .set_kek(&ours)
            .with_backend(&backend),
    );

    let mut slots: [Option<Parameter<'_>>; 1] = [None; 1];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let mut cek = [0u8; 16];
    let err = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap_err();
    assert!(matches!(err, Error::StorageExhausted { capacity: 1 }));
    assert_eq!(backend.calls(), 0);
}

#[test]
fn decoders_without_keys() {
    let recipients = array(&[key_wrap_recipient(-3, None, &wrap(&KEK, &CEK))]);

    let mut decoders = RecipientDecoders::new();
    decoders
        .add(KeyWrapRecipientDecoder::new())
        .add(HpkeRecipientDecoder::new());
    assert_eq!(decoders.len(), 2);

    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let mut cek = [0u8; 16];
    let err = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap_err();
    // the key wrap decoder has no key, the HPKE decoder finds a foreign shape
    assert!(matches!(err, Error::NoKey));
}

#[test]
fn single_recipient() {
    let ours = KeyEncryptionKey::new(&KEK);
    let mut decoders = RecipientDecoders::new();
    decoders
        .add(HpkeRecipientDecoder::new())
        .add(KeyWrapRecipientDecoder::new().set_kek(&ours));

    let recipient = key_wrap_recipient(-3, None, &wrap(&KEK, &CEK));
    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipient);
    let mut cek = [0u8; 16];
    let location = HeaderLocation::new(2, 3);
    let unwrapped = decoders
        .decode_recipient(location, &mut cursor, &mut cek, &mut storage)
        .unwrap();

    assert_eq!(unwrapped.decoder, 1);
    assert_eq!(unwrapped.recipient, location);
    assert_eq!(unwrapped.cek, &CEK);
    let parameter = storage.parameters(unwrapped.parameters).next().unwrap();
    assert_eq!(parameter.location, location);
}

#[test]
fn strict_policy_moves_past_other_schemes() {
    let ours = KeyEncryptionKey::new(&KEK);
    let receiver = Receiver::derive(Hpke::X25519Sha256Aes128Gcm, b"strict");
    let protected = header_map(Some(41), None);
    let (enc, ciphertext) = receiver.seal(&protected, &CEK);
    let recipients = array(&[hpke_recipient(&protected, None, &enc, &ciphertext)]);

    let backend = CountingBackend::default();
    let mut decoders = RecipientDecoders::new().with_policy(StrictPolicy);
    decoders
        .add(
            KeyWrapRecipientDecoder::new()
                .set_kek(&ours)
                .with_backend(&backend),
        )
        .add(HpkeRecipientDecoder::new().set_secret_key(&receiver.secret_key));

    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&recipients);
    let mut cek = [0u8; 16];
    let unwrapped = decoders
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap();

    assert_eq!(unwrapped.decoder, 1);
    assert_eq!(unwrapped.cek, &CEK);
    assert_eq!(backend.calls(), 0, "the key wrap decoder must not unwrap");
    assert!(cursor.finish().is_ok());
}

#[test]
fn no_decoder_for_the_scheme() {
    let receiver = Receiver::derive(Hpke::P256Sha256Aes128Gcm, b"unhandled");
    let protected = header_map(Some(35), None);
    let (enc, ciphertext) = receiver.seal(&protected, &CEK);
    let hpke_only = array(&[hpke_recipient(&protected, None, &enc, &ciphertext)]);
    let key_wrap_only = array(&[key_wrap_recipient(-5, None, &wrap(&[0x5a; 32], &CEK))]);

    let ours = KeyEncryptionKey::new(&KEK);
    let sk = receiver.secret_key;
    let mut key_wrap = RecipientDecoders::new().with_policy(StrictPolicy);
    key_wrap.add(KeyWrapRecipientDecoder::new().set_kek(&ours));
    let mut hpke = RecipientDecoders::new();
    hpke.add(HpkeRecipientDecoder::new().set_secret_key(&sk));

    let mut slots: [Option<Parameter<'_>>; 4] = [None; 4];
    let mut cek = [0u8; 16];

    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&hpke_only);
    let err = key_wrap
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAlgorithm(Some(35))));
    assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
    assert!(cursor.finish().is_ok());

    let mut storage = ParameterStorage::new(&mut slots);
    let mut cursor = Cursor::new(&key_wrap_only);
    let err = hpke
        .decode_recipients(1, &mut cursor, &mut cek, &mut storage)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAlgorithm(Some(-5))));
    assert!(cursor.finish().is_ok());
}
