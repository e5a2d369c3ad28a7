//! SM2DSA tests.

use num_bigint::BigUint;
use proptest::prelude::*;
use rand_core::OsRng;
use sha2::Sha256;
use sm2_core::{
    CurveParams, Error, SecretKey,
    dsa::{
        Signature, SigningKey, VerifyingKey,
        signature::{RandomizedSigner, Signer, Verifier},
    },
};

const MSG: &[u8] = b"testing";

fn signing_key() -> SigningKey<'static> {
    let sk = SecretKey::random(CurveParams::sm2(), &mut OsRng).unwrap();
    SigningKey::new(sk).unwrap()
}

#[test]
fn sign_and_verify() {
    let sk = signing_key();
    let signature: Signature = sk.sign(MSG);
    assert!(sk.verifying_key().verify(MSG, &signature).is_ok());
    assert!(sk.verifying_key().is_valid(MSG, &signature));
}

#[test]
fn signatures_are_randomized() {
    let sk = signing_key();
    let a = sk.sign_with_rng(&mut OsRng, MSG).unwrap();
    let b = sk.sign_with_rng(&mut OsRng, MSG).unwrap();
    assert_ne!(a, b);
    assert!(sk.verifying_key().is_valid(MSG, &a));
    assert!(sk.verifying_key().is_valid(MSG, &b));
}

#[test]
fn reject_other_message() {
    let sk = signing_key();
    let signature: Signature = sk.sign(MSG);
    assert_eq!(
        sk.verifying_key().verify_digest::<sm2_core::Sm3>(b"tested", &signature),
        Err(Error::InvalidSignature)
    );
    assert!(sk.verifying_key().verify(b"tested", &signature).is_err());
}

#[test]
fn reject_other_key() {
    let signature: Signature = signing_key().sign(MSG);
    let other = signing_key();
    assert!(!other.verifying_key().is_valid(MSG, &signature));
}

#[test]
fn reject_out_of_range_components() {
    let curve = CurveParams::sm2();
    let sk = signing_key();
    let vk = sk.verifying_key();
    let signature: Signature = sk.sign(MSG);
    let n = curve.order().value();

    let zero = BigUint::from(0u8);
    for (r, s) in [
        (zero.clone(), signature.s().clone()),
        (signature.r().clone(), zero),
        (n.clone(), signature.s().clone()),
        (signature.r().clone(), n.clone()),
        (signature.r() + n, signature.s().clone()),
    ] {
        let forged = Signature::new(r, s);
        assert_eq!(
            vk.verify_digest::<sm2_core::Sm3>(MSG, &forged),
            Err(Error::InvalidSignatureEncoding)
        );
        assert!(vk.verify(MSG, &forged).is_err());
    }
}

#[test]
fn reject_swapped_components() {
    let sk = signing_key();
    let signature: Signature = sk.sign(MSG);
    let swapped = Signature::new(signature.s().clone(), signature.r().clone());
    assert!(!sk.verifying_key().is_valid(MSG, &swapped));
}

#[test]
fn signature_bytes_round_trip() {
    let curve = CurveParams::sm2();
    let sk = signing_key();
    let signature: Signature = sk.sign(MSG);

    let bytes = signature.to_bytes(curve).unwrap();
    assert_eq!(bytes.len(), 64);
    let decoded = Signature::from_slice(curve, &bytes).unwrap();
    assert_eq!(decoded, signature);
    assert!(sk.verifying_key().is_valid(MSG, &decoded));
}

#[test]
fn verifying_key_from_sec1_bytes() {
    let curve = CurveParams::sm2();
    let sk = signing_key();
    let bytes = sk.verifying_key().to_sec1_bytes();
    let vk = VerifyingKey::from_sec1_bytes(curve, &bytes).unwrap();

    let signature = sk.try_sign_with_rng(&mut OsRng, MSG).unwrap();
    assert!(vk.verify(MSG, &signature).is_ok());
}

#[test]
fn sha256_signatures() {
    let sk = signing_key();
    let signature = sk.sign_digest_with_rng::<_, Sha256>(&mut OsRng, MSG).unwrap();
    assert!(sk.verifying_key().verify_digest::<Sha256>(MSG, &signature).is_ok());
    assert!(!sk.verifying_key().is_valid(MSG, &signature));
}

#[test]
fn reject_n_minus_one_secret() {
    let curve = CurveParams::sm2();
    let d = curve.order().value() - BigUint::from(1u8);
    let sk = SecretKey::from_scalar(curve, &d).unwrap();
    assert_eq!(SigningKey::new(sk).unwrap_err(), Error::InvalidScalarRange);
}

prop_compose! {
    fn signing_key_strategy()(bytes in any::<[u8; 32]>()) -> SigningKey<'static> {
        let curve = CurveParams::sm2();
        // d in [1, n-2]
        let bound = curve.order().value() - BigUint::from(2u8);
        let d = BigUint::from_bytes_be(&bytes) % bound + BigUint::from(1u8);
        SigningKey::new(SecretKey::from_scalar(curve, &d).unwrap()).unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sign_and_verify_any_message(
        sk in signing_key_strategy(),
        msg in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let signature = sk.sign_with_rng(&mut OsRng, &msg).unwrap();
        prop_assert!(sk.verifying_key().verify(&msg, &signature).is_ok());
    }

    #[test]
    fn reject_flipped_message_bit(
        sk in signing_key_strategy(),
        msg in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let signature = sk.sign_with_rng(&mut OsRng, &msg).unwrap();
        let mut tampered = msg.clone();
        tampered[index.index(msg.len())] ^= 1 << bit;
        prop_assert!(sk.verifying_key().verify(&tampered, &signature).is_err());
    }
}
