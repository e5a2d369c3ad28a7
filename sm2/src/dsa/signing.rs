//! Support for SM2DSA signing.
//!
//! ## Algorithm
//!
//! ```text
//! A1: calculate e=Hv(M)
//! A2: pick a random number k in [1, n-1] via a random number generator
//! A3: calculate the elliptic curve point (x1, y1)=[k]G
//! A4: calculate r=(e+x1) modn, return to A2 if r=0 or r+k=n
//! A5: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A2 if s=0
//! A6: the digital signature of M is (r, s)
//! ```

use super::{Signature, VerifyingKey, hash_message};
use crate::{CurveParams, Error, Hash256, MAX_ATTEMPTS, Result, SecretKey};
use core::fmt::{self, Debug};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use signature::{KeypairRef, RandomizedSigner, rand_core::CryptoRngCore};
use sm3::Sm3;
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

#[cfg(feature = "getrandom")]
use {rand_core::OsRng, signature::Signer};

/// SM2DSA secret key used for signing messages and producing signatures.
///
/// ## Usage
///
/// The [`signature`] crate defines the following traits which are the
/// primary API for signing:
///
/// - [`Signer`](signature::Signer): sign a message using this key and the
///   operating system's random number generator
/// - [`RandomizedSigner`]: sign a message using a caller-provided random
///   number generator
#[derive(Clone)]
pub struct SigningKey<'a> {
    /// Secret key.
    secret_key: SecretKey<'a>,

    /// Verifying key for this signing key.
    verifying_key: VerifyingKey<'a>,
}

impl<'a> SigningKey<'a> {
    /// Create signing key from a secret key.
    ///
    /// Fails with [`Error::InvalidScalarRange`] for `d = n - 1`, where
    /// `1 + d` has no inverse.
    pub fn new(secret_key: SecretKey<'a>) -> Result<Self> {
        if !secret_key.is_signing_scalar() {
            return Err(Error::InvalidScalarRange);
        }

        let verifying_key = VerifyingKey::new(secret_key.public_key());
        Ok(Self {
            secret_key,
            verifying_key,
        })
    }

    /// Parse signing key from big endian-encoded byte slice containing a secret
    /// scalar value.
    pub fn from_slice(curve: &'a CurveParams, slice: &[u8]) -> Result<Self> {
        SecretKey::from_slice(curve, slice).and_then(Self::new)
    }

    /// Borrow the [`SecretKey`] of this key.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn as_secret_key(&self) -> &SecretKey<'a> {
        &self.secret_key
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> &VerifyingKey<'a> {
        &self.verifying_key
    }

    /// Curve this key belongs to.
    pub fn curve(&self) -> &'a CurveParams {
        self.secret_key.curve()
    }

    /// Sign `msg` using the default digest algorithm (`Sm3`).
    pub fn sign_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Signature> {
        self.sign_digest_with_rng::<R, Sm3>(rng, msg)
    }

    /// Sign `msg` using the specified digest algorithm.
    pub fn sign_digest_with_rng<R, D>(&self, rng: &mut R, msg: &[u8]) -> Result<Signature>
    where
        R: CryptoRngCore + ?Sized,
        D: Hash256,
    {
        // A1: calculate e=Hv(M)
        let e = hash_message::<D>(msg);
        sign_prehash(self.curve(), &self.secret_key.to_scalar(), &e, rng)
    }
}

//
// `*Signer` trait impls
//

impl RandomizedSigner<Signature> for SigningKey<'_> {
    fn try_sign_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        msg: &[u8],
    ) -> signature::Result<Signature> {
        self.sign_with_rng(rng, msg)
            .map_err(|_| signature::Error::new())
    }
}

#[cfg(feature = "getrandom")]
impl Signer<Signature> for SigningKey<'_> {
    fn try_sign(&self, msg: &[u8]) -> signature::Result<Signature> {
        self.try_sign_with_rng(&mut OsRng, msg)
    }
}

//
// Other trait impls
//

impl<'a> AsRef<VerifyingKey<'a>> for SigningKey<'a> {
    fn as_ref(&self) -> &VerifyingKey<'a> {
        &self.verifying_key
    }
}

impl ConstantTimeEq for SigningKey<'_> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret_key.ct_eq(&other.secret_key)
    }
}

impl Debug for SigningKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

/// Constant-time comparison
impl Eq for SigningKey<'_> {}
impl PartialEq for SigningKey<'_> {
    fn eq(&self, other: &SigningKey<'_>) -> bool {
        self.secret_key == other.secret_key
    }
}

impl<'a> KeypairRef for SigningKey<'a> {
    type VerifyingKey = VerifyingKey<'a>;
}

/// Sign the message digest `e` with the secret scalar `d`, drawing a fresh
/// nonce until `r` and `s` are usable.
fn sign_prehash<R: CryptoRngCore + ?Sized>(
    curve: &CurveParams,
    d: &BigUint,
    e: &BigUint,
    rng: &mut R,
) -> Result<Signature> {
    let n = curve.order();
    let d_plus_1_inv = n
        .invert(&(d + BigUint::one()))
        .ok_or(Error::InvalidScalarRange)?;

    for attempt in 1..=MAX_ATTEMPTS {
        // A2: pick a random number k in [1, n-1] via a random number generator
        let k = curve.random_scalar(rng)?;

        // A3: calculate the elliptic curve point (x1, y1)=[k]G
        let point = curve.mul_by_generator(&k);
        let Some(x1) = point.x() else {
            debug!(attempt, "nonce produced the identity, retrying");
            continue;
        };

        // A4: calculate r=(e+x1) modn, return to A2 if r=0 or r+k=n
        let r = n.add(e, x1);
        if r.is_zero() || n.add(&r, &k).is_zero() {
            debug!(attempt, "unusable r, drawing a new nonce");
            continue;
        }

        // A5: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A2 if s=0
        let s = n.mul(&d_plus_1_inv, &n.sub(&k, &n.mul(&r, d)));
        if s.is_zero() {
            debug!(attempt, "s is zero, drawing a new nonce");
            continue;
        }

        // A6: the digital signature of M is (r, s)
        return Ok(Signature::new(r, s));
    }

    Err(Error::RetriesExhausted(MAX_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::{SigningKey, sign_prehash};
    use crate::{
        CurveParams, Error, MAX_ATTEMPTS, SecretKey,
        arithmetic::tests::toy_curve,
        dev::StuckRng,
        dsa::signature::{RandomizedSigner, Verifier},
    };
    use num_bigint::BigUint;
    use rand_core::OsRng;

    #[test]
    fn reject_n_minus_one() {
        let curve = toy_curve();
        let sk = SecretKey::from_scalar(&curve, &BigUint::from(28u8)).unwrap();
        assert_eq!(SigningKey::new(sk).unwrap_err(), Error::InvalidScalarRange);
    }

    #[test]
    fn toy_curve_signatures_verify() {
        let curve = toy_curve();
        for d in 1u8..28 {
            let sk = SecretKey::from_scalar(&curve, &BigUint::from(d)).unwrap();
            let signing_key = SigningKey::new(sk).unwrap();

            let signature = signing_key.sign_with_rng(&mut OsRng, b"SM2").unwrap();
            assert!(curve.is_valid_scalar(signature.r()));
            assert!(curve.is_valid_scalar(signature.s()));
            assert!(signing_key.verifying_key().verify(b"SM2", &signature).is_ok());
        }
    }

    #[test]
    fn randomized_signer_trait() {
        let curve = toy_curve();
        let sk = SecretKey::from_scalar(&curve, &BigUint::from(5u8)).unwrap();
        let signing_key = SigningKey::new(sk).unwrap();

        let signature = signing_key.try_sign_with_rng(&mut OsRng, b"message").unwrap();
        assert!(signing_key.verifying_key().is_valid(b"message", &signature));
    }

    #[test]
    fn from_slice_round_trip() {
        let curve = toy_curve();
        let sk = SecretKey::from_scalar(&curve, &BigUint::from(9u8)).unwrap();
        let signing_key = SigningKey::from_slice(&curve, &sk.to_bytes()).unwrap();
        assert_eq!(signing_key.as_secret_key(), &sk);
        assert_eq!(
            SigningKey::from_slice(&curve, &[28]).unwrap_err(),
            Error::InvalidScalarRange
        );
    }

    #[test]
    fn stuck_rng_exhausts_nonce_sampling() {
        let curve = CurveParams::sm2();
        let mut rng = StuckRng::new(0);
        assert_eq!(
            sign_prehash(curve, &BigUint::from(5u8), &BigUint::from(1u8), &mut rng),
            Err(Error::RetriesExhausted(MAX_ATTEMPTS))
        );
        assert_eq!(rng.fills, MAX_ATTEMPTS);
    }

    #[test]
    fn repeated_nonce_exhausts_signing_attempts() {
        let curve = toy_curve();
        let d = BigUint::from(5u8);

        // k = 3 every draw, [3]G = (11, 9)
        // e = 18 gives r = 0, e = 15 gives r + k = n
        for e in [18u8, 15] {
            let mut rng = StuckRng::new(3);
            assert_eq!(
                sign_prehash(&curve, &d, &BigUint::from(e), &mut rng),
                Err(Error::RetriesExhausted(MAX_ATTEMPTS)),
                "e = {e}"
            );
            assert_eq!(rng.fills, MAX_ATTEMPTS);
        }

        // any other e signs on the first draw
        let mut rng = StuckRng::new(3);
        let signature = sign_prehash(&curve, &d, &BigUint::from(1u8), &mut rng).unwrap();
        assert_eq!(rng.fills, 1);
        assert_eq!(signature.r(), &BigUint::from(12u8));
    }
}
