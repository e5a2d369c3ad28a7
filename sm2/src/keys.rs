//! Secret and public keys.

use crate::{AffinePoint, CurveParams, Error, FixedBaseMul, Result};
use core::fmt::{self, Debug};
use num_bigint::BigUint;
use num_traits::One;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// SEC1 tag of an uncompressed point.
const SEC1_UNCOMPRESSED: u8 = 0x04;

/// Generate a fresh keypair `(d, Q = [d]G)` on `curve`.
///
/// `d` is drawn uniformly from `[1, n-2]`, so the key can be used for both
/// encryption and signing.
pub fn generate_keypair<'a, R: CryptoRngCore + ?Sized>(
    curve: &'a CurveParams,
    rng: &mut R,
) -> Result<(SecretKey<'a>, PublicKey<'a>)> {
    let secret_key = SecretKey::random(curve, rng)?;
    let public_key = secret_key.public_key();
    Ok((secret_key, public_key))
}

/// Check that `point` is usable as a public key on `curve`.
///
/// Rejects the identity, coordinates outside `[0, p)`, points which do not
/// satisfy the curve equation, and points outside the subgroup of order `n`
/// (`[n]Q ≠ O`).
pub fn validate_public_key(curve: &CurveParams, point: &AffinePoint) -> Result<()> {
    if point.is_identity() || !curve.is_on_curve(point) {
        return Err(Error::InvalidPublicKey);
    }

    if !curve.mul(curve.order().value(), point).is_identity() {
        return Err(Error::InvalidPublicKey);
    }

    Ok(())
}

/// Private scalar `d ∈ [1, n-1]`.
///
/// Stored as a fixed-width big-endian byte string which is zeroized on drop.
#[derive(Clone)]
pub struct SecretKey<'a> {
    curve: &'a CurveParams,
    bytes: Zeroizing<Vec<u8>>,
}

impl<'a> SecretKey<'a> {
    /// Generate a random secret key in `[1, n-2]`.
    pub fn random<R: CryptoRngCore + ?Sized>(curve: &'a CurveParams, rng: &mut R) -> Result<Self> {
        let d = curve.random_secret_scalar(rng)?;
        Self::from_scalar(curve, &d)
    }

    /// Create a secret key from a scalar, which must lie in `[1, n-1]`.
    pub fn from_scalar(curve: &'a CurveParams, d: &BigUint) -> Result<Self> {
        if !curve.is_valid_scalar(d) {
            return Err(Error::InvalidScalarRange);
        }

        Ok(Self {
            curve,
            bytes: Zeroizing::new(curve.order().to_be_bytes(d)),
        })
    }

    /// Parse a secret key from a big-endian byte string of
    /// [`CurveParams::scalar_len`] bytes.
    pub fn from_slice(curve: &'a CurveParams, slice: &[u8]) -> Result<Self> {
        if slice.len() != curve.scalar_len() {
            return Err(Error::MalformedEncoding);
        }

        let d = BigUint::from_bytes_be(slice);
        Self::from_scalar(curve, &d)
    }

    /// Serialize as fixed-width big-endian bytes.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        self.bytes.clone()
    }

    /// Curve this key belongs to.
    pub fn curve(&self) -> &'a CurveParams {
        self.curve
    }

    /// Secret scalar `d`.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn to_scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }

    /// Public key `Q = [d]G` for this secret key.
    pub fn public_key(&self) -> PublicKey<'a> {
        PublicKey {
            curve: self.curve,
            point: self.curve.mul_by_generator(&self.to_scalar()),
        }
    }

    /// Is `1 + d` invertible modulo `n`, i.e. `d ≠ n - 1`?
    pub(crate) fn is_signing_scalar(&self) -> bool {
        self.curve
            .order()
            .invert(&(self.to_scalar() + BigUint::one()))
            .is_some()
    }
}

impl ConstantTimeEq for SecretKey<'_> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.bytes.as_slice().ct_eq(other.bytes.as_slice())
    }
}

/// Constant-time comparison
impl Eq for SecretKey<'_> {}
impl PartialEq for SecretKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve && bool::from(self.ct_eq(other))
    }
}

impl Debug for SecretKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

/// Public point `Q = [d]G`, validated to lie in the prime-order subgroup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<'a> {
    curve: &'a CurveParams,
    point: AffinePoint,
}

impl<'a> PublicKey<'a> {
    /// Initialize [`PublicKey`] from an affine point, running
    /// [`validate_public_key`] on it.
    pub fn from_affine(curve: &'a CurveParams, point: AffinePoint) -> Result<Self> {
        validate_public_key(curve, &point)?;
        Ok(Self { curve, point })
    }

    /// Decode the SEC1 uncompressed encoding `04 || x || y`.
    pub fn from_sec1_bytes(curve: &'a CurveParams, bytes: &[u8]) -> Result<Self> {
        let point = decode_point(curve, bytes)?;
        Self::from_affine(curve, point)
    }

    /// Encode as SEC1 uncompressed `04 || x || y`.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        encode_point(self.curve, &self.point)
    }

    /// Borrow the inner [`AffinePoint`] for this public key.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Curve this key belongs to.
    pub fn curve(&self) -> &'a CurveParams {
        self.curve
    }
}

/// Multiplies `Q`.
impl FixedBaseMul for PublicKey<'_> {
    fn mul_base(&self, k: &BigUint) -> AffinePoint {
        self.curve.mul(k, &self.point)
    }
}

impl AsRef<AffinePoint> for PublicKey<'_> {
    fn as_ref(&self) -> &AffinePoint {
        &self.point
    }
}

/// SEC1 uncompressed encoding of a non-identity point; the identity encodes
/// as the single byte `00`.
pub(crate) fn encode_point(curve: &CurveParams, point: &AffinePoint) -> Vec<u8> {
    match point.coordinates() {
        None => vec![0],
        Some((x, y)) => {
            let mut out = Vec::with_capacity(1 + 2 * curve.field_len());
            out.push(SEC1_UNCOMPRESSED);
            out.extend(curve.field().to_be_bytes(x));
            out.extend(curve.field().to_be_bytes(y));
            out
        }
    }
}

/// Decode `04 || x || y`. The identity and compressed forms are rejected.
///
/// Only the tag and length are checked; curve membership is left to the
/// caller.
pub(crate) fn decode_point(curve: &CurveParams, bytes: &[u8]) -> Result<AffinePoint> {
    let len = curve.field_len();
    let (tag, coordinates) = bytes.split_first().ok_or(Error::MalformedEncoding)?;
    if *tag != SEC1_UNCOMPRESSED || coordinates.len() != 2 * len {
        return Err(Error::MalformedEncoding);
    }

    let (x, y) = coordinates.split_at(len);
    Ok(AffinePoint::new(
        BigUint::from_bytes_be(x),
        BigUint::from_bytes_be(y),
    ))
}

#[cfg(test)]
mod tests {
    use super::{PublicKey, SecretKey, decode_point, generate_keypair, validate_public_key};
    use crate::{
        AffinePoint, CurveParams, Error,
        arithmetic::tests::{point, toy_curve},
    };
    use num_bigint::BigUint;
    use rand_core::OsRng;

    /// `y² = x³ + x + 1` over F₂₃ has 28 points; `(5, 4)` generates the
    /// subgroup of order 7.
    fn curve_with_cofactor() -> CurveParams {
        CurveParams::new(
            BigUint::from(23u8),
            BigUint::from(1u8),
            BigUint::from(1u8),
            BigUint::from(7u8),
            (BigUint::from(5u8), BigUint::from(4u8)),
        )
        .unwrap()
    }

    #[test]
    fn generated_public_key_is_valid() {
        let curve = CurveParams::sm2();
        let (sk, pk) = generate_keypair(curve, &mut OsRng).unwrap();
        assert!(validate_public_key(curve, pk.as_affine()).is_ok());
        assert_eq!(sk.public_key(), pk);
        assert_eq!(sk.to_bytes().len(), 32);
    }

    #[test]
    fn toy_public_key() {
        let curve = toy_curve();
        let sk = SecretKey::from_scalar(&curve, &BigUint::from(5u8)).unwrap();
        assert_eq!(sk.public_key().as_affine(), &point(7, 20));
    }

    #[test]
    fn reject_out_of_range_secret_scalars() {
        let curve = toy_curve();
        assert_eq!(
            SecretKey::from_scalar(&curve, &BigUint::from(0u8)).unwrap_err(),
            Error::InvalidScalarRange
        );
        assert_eq!(
            SecretKey::from_scalar(&curve, &BigUint::from(29u8)).unwrap_err(),
            Error::InvalidScalarRange
        );
        assert!(SecretKey::from_scalar(&curve, &BigUint::from(28u8)).is_ok());
    }

    #[test]
    fn secret_key_bytes_round_trip() {
        let curve = CurveParams::sm2();
        let sk = SecretKey::random(curve, &mut OsRng).unwrap();
        let decoded = SecretKey::from_slice(curve, &sk.to_bytes()).unwrap();
        assert_eq!(sk, decoded);
        assert_eq!(
            SecretKey::from_slice(curve, &[1u8; 31]).unwrap_err(),
            Error::MalformedEncoding
        );
    }

    #[test]
    fn reject_identity() {
        let curve = toy_curve();
        assert_eq!(
            validate_public_key(&curve, &AffinePoint::Identity),
            Err(Error::InvalidPublicKey)
        );
    }

    #[test]
    fn reject_out_of_range_coordinates() {
        let curve = toy_curve();
        // (0, 2) shifted by p
        assert_eq!(
            validate_public_key(&curve, &point(23, 2)),
            Err(Error::InvalidPublicKey)
        );
        assert_eq!(
            validate_public_key(&curve, &point(0, 25)),
            Err(Error::InvalidPublicKey)
        );
    }

    #[test]
    fn reject_point_off_curve() {
        let curve = toy_curve();
        assert_eq!(
            validate_public_key(&curve, &point(0, 3)),
            Err(Error::InvalidPublicKey)
        );
    }

    #[test]
    fn reject_point_outside_subgroup() {
        let curve = curve_with_cofactor();
        // on the curve, order 28
        assert_eq!(
            validate_public_key(&curve, &point(0, 1)),
            Err(Error::InvalidPublicKey)
        );
        // on the curve, order 2
        assert_eq!(
            validate_public_key(&curve, &point(4, 0)),
            Err(Error::InvalidPublicKey)
        );
        // on the curve, order 7
        assert!(validate_public_key(&curve, &point(13, 7)).is_ok());
    }

    #[test]
    fn sec1_point_off_curve_is_an_invalid_public_key() {
        let curve = CurveParams::sm2();
        let mut bytes = PublicKey::from_affine(curve, curve.generator().clone())
            .unwrap()
            .to_sec1_bytes();
        bytes[64] ^= 1;

        assert_eq!(
            PublicKey::from_sec1_bytes(curve, &bytes).unwrap_err(),
            Error::InvalidPublicKey
        );
        assert_eq!(
            PublicKey::from_affine(curve, decode_point(curve, &bytes).unwrap()).unwrap_err(),
            Error::InvalidPublicKey
        );

        let toy = toy_curve();
        assert_eq!(
            PublicKey::from_sec1_bytes(&toy, &[0x04, 0, 3]).unwrap_err(),
            Error::InvalidPublicKey
        );
    }

    #[test]
    fn sec1_round_trip() {
        let curve = CurveParams::sm2();
        let (_, pk) = generate_keypair(curve, &mut OsRng).unwrap();
        let bytes = pk.to_sec1_bytes();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0x04);
        assert_eq!(PublicKey::from_sec1_bytes(curve, &bytes).unwrap(), pk);
    }

    #[test]
    fn sec1_rejects_malformed_input() {
        let curve = toy_curve();
        assert_eq!(
            PublicKey::from_sec1_bytes(&curve, &[]).unwrap_err(),
            Error::MalformedEncoding
        );
        assert_eq!(
            PublicKey::from_sec1_bytes(&curve, &[0x02, 0, 2]).unwrap_err(),
            Error::MalformedEncoding
        );
        assert_eq!(
            PublicKey::from_sec1_bytes(&curve, &[0x04, 0, 2, 0]).unwrap_err(),
            Error::MalformedEncoding
        );
        assert!(PublicKey::from_sec1_bytes(&curve, &[0x04, 0, 2]).is_ok());
    }
}
