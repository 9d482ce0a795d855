use rsa_session::codec::{base64_to_bytes, bytes_to_base64};
use rsa_session::rsa::bigint::{random_in_range, RsaBigInt};
use rsa_session::rsa::{
    decrypt_bytes, decrypt_integer, encrypt_bytes, encrypt_integer, generate_keypair,
    strip_leading_control_byte,
};
use rsa_session::{
    initialize_session_as_receiver, initialize_session_as_sender, CryptoError, EncryptedEnvelope,
    KeyGenConfig, RsaKeyPair, Session,
};

fn keypair() -> RsaKeyPair {
    generate_keypair(&KeyGenConfig::default().with_modulus_bits(512)).unwrap()
}

#[test]
fn test_abc_roundtrip() {
    let keypair = keypair();
    let c = encrypt_bytes(&[0x41, 0x42, 0x43], &keypair.public_key).unwrap();
    let m = decrypt_bytes(&c, &keypair.private_key).unwrap();
    assert_eq!(m, vec![0x41, 0x42, 0x43]);
}

#[test]
fn test_integer_roundtrip_below_modulus() {
    let keypair = keypair();
    let n = &keypair.public_key.n;
    let max = n - 1u8;

    let mut samples = vec![RsaBigInt::from(0u8), RsaBigInt::from(1u8), max.clone()];
    for _ in 0..20 {
        samples.push(random_in_range(&RsaBigInt::from(0u8), &max));
    }

    for m in samples {
        let c = encrypt_integer(&m, &keypair.public_key).unwrap();
        assert_eq!(decrypt_integer(&c, &keypair.private_key).unwrap(), m);
    }
}

#[test]
fn test_leading_control_byte_limitation() {
    let keypair = keypair();

    // Unframed decryption keeps a leading 0x07; the legacy heuristic drops it
    let c = encrypt_bytes(&[0x07, 0x41, 0x42], &keypair.public_key).unwrap();
    let m = decrypt_bytes(&c, &keypair.private_key).unwrap();
    assert_eq!(m, vec![0x07, 0x41, 0x42]);
    assert_eq!(strip_leading_control_byte(&m), vec![0x41, 0x42]);
}

#[test]
fn test_handshake_through_identity_records() {
    let receiver = keypair();

    // What the caller would persist and publish
    let stored = receiver.to_identity_record().unwrap();
    let published = serde_json::to_string(&receiver.to_public_identity().unwrap()).unwrap();

    let peer_public = serde_json::from_str::<rsa_session::PublicIdentity>(&published)
        .unwrap()
        .public_key()
        .unwrap();
    let (wrapped, sender_key) = initialize_session_as_sender(&peer_public).unwrap();

    let own_private = stored.private_key().unwrap();
    let receiver_key = initialize_session_as_receiver(&wrapped, &own_private).unwrap();
    assert_eq!(sender_key.export(), receiver_key.export());

    let sender = Session::new(sender_key);
    let receiver = Session::new(receiver_key);
    let envelope = sender.seal("My name is Allison Burgers.".as_bytes()).unwrap();
    assert_eq!(
        receiver.open_text(&envelope).unwrap(),
        "My name is Allison Burgers."
    );
}

#[test]
fn test_tampered_envelope_nonce() {
    let receiver = keypair();
    let (wrapped, sender_key) = initialize_session_as_sender(&receiver.public_key).unwrap();
    let receiver_key = initialize_session_as_receiver(&wrapped, &receiver.private_key).unwrap();

    let envelope = Session::new(sender_key).seal(b"attack at dawn").unwrap();

    let mut nonce = base64_to_bytes(&envelope.nonce).unwrap();
    nonce[11] ^= 0x80;
    let tampered = EncryptedEnvelope {
        ciphertext: envelope.ciphertext.clone(),
        nonce: bytes_to_base64(&nonce),
    };

    let result = Session::new(receiver_key).open(&tampered);
    assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
}
