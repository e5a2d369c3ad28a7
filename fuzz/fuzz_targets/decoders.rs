#![no_main]
// Decoders must reject arbitrary input with an error, never a panic.
use libfuzzer_sys::fuzz_target;
use rand_chacha::{ChaChaRng, rand_core::SeedableRng};
use sm2_core::{
    CurveParams, PublicKey, SecretKey,
    dsa::{Signature, SigningKey, VerifyingKey},
    pke::{Ciphertext, DecryptingKey, Mode},
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 32 {
        return;
    }

    let curve = CurveParams::sm2();
    let mut rng = ChaChaRng::from_seed(data[0..32].try_into().unwrap());
    let input = &data[32..];

    let _ = PublicKey::from_sec1_bytes(curve, input);
    let _ = VerifyingKey::from_sec1_bytes(curve, input);
    let _ = SecretKey::from_slice(curve, input);

    let sk = SecretKey::random(curve, &mut rng).unwrap();

    for mode in [Mode::C1C2C3, Mode::C1C3C2] {
        let dk = DecryptingKey::new_with_mode(sk.clone(), mode);
        if let Ok(ciphertext) = Ciphertext::from_slice(curve, input, mode) {
            assert_eq!(ciphertext.to_vec(curve, mode), input);
            assert!(dk.decrypt(&ciphertext).is_err());
        }
        assert!(dk.decrypt_slice(input).is_err());
    }

    let signing_key = SigningKey::new(sk).unwrap();
    if let Ok(signature) = Signature::from_slice(curve, input) {
        assert_eq!(signature.to_bytes(curve).unwrap(), input);
        assert!(!signing_key.verifying_key().is_valid(b"fuzz", &signature));
    }
});
