//! Support for verifying SM2DSA signatures.
//!
//! ## Algorithm
//!
//! ```text
//! B1: verify whether r' in [1,n-1], verification failed if not
//! B2: verify whether s' in [1,n-1], verification failed if not
//! B3: calculate e'=Hv(M')
//! B4: calculate t = (r' + s') modn, verification failed if t=0
//! B5: calculate the point (x1', y1')=[s']G + [t]PA
//! B6: calculate R=(e'+x1') modn, verification pass if R=r', otherwise failed
//! ```

use super::{Signature, hash_message};
use crate::{AffinePoint, CurveParams, Error, Hash256, PublicKey, Result};
use num_traits::Zero;
use signature::Verifier;
use sm3::Sm3;

/// SM2DSA public key used for verifying signatures are valid for a given
/// message.
///
/// ## Usage
///
/// The [`signature`] crate defines the following trait which is the primary
/// API for verifying:
///
/// - [`Verifier`]: verify a message against a provided key and signature
///
/// [`VerifyingKey::verify_digest`] reports why a signature was rejected and
/// [`VerifyingKey::is_valid`] only whether it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey<'a> {
    /// Signer's public key.
    public_key: PublicKey<'a>,
}

impl<'a> VerifyingKey<'a> {
    /// Initialize [`VerifyingKey`] from a signer's public key.
    pub fn new(public_key: PublicKey<'a>) -> Self {
        Self { public_key }
    }

    /// Initialize [`VerifyingKey`] from a SEC1-encoded public key.
    pub fn from_sec1_bytes(curve: &'a CurveParams, bytes: &[u8]) -> Result<Self> {
        PublicKey::from_sec1_bytes(curve, bytes).map(Self::new)
    }

    /// Initialize [`VerifyingKey`] from an affine point.
    ///
    /// Returns an [`Error`] if the point fails public key validation.
    pub fn from_affine(curve: &'a CurveParams, affine: AffinePoint) -> Result<Self> {
        PublicKey::from_affine(curve, affine).map(Self::new)
    }

    /// Borrow the inner [`PublicKey`].
    pub fn as_public_key(&self) -> &PublicKey<'a> {
        &self.public_key
    }

    /// Borrow the inner [`AffinePoint`] for this public key.
    pub fn as_affine(&self) -> &AffinePoint {
        self.public_key.as_affine()
    }

    /// Curve this key belongs to.
    pub fn curve(&self) -> &'a CurveParams {
        self.public_key.curve()
    }

    /// Encode as SEC1 uncompressed `04 || x || y`.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.public_key.to_sec1_bytes()
    }

    /// Verify `signature` over `msg` using the specified digest algorithm.
    ///
    /// Components outside `[1, n-1]` are reported as
    /// [`Error::InvalidSignatureEncoding`], every other rejection as
    /// [`Error::InvalidSignature`].
    pub fn verify_digest<D: Hash256>(&self, msg: &[u8], signature: &Signature) -> Result<()> {
        let curve = self.curve();
        let n = curve.order();
        let (r, s) = signature.split();

        // B1: verify whether r' in [1,n-1], verification failed if not
        // B2: verify whether s' in [1,n-1], verification failed if not
        if !curve.is_valid_scalar(r) || !curve.is_valid_scalar(s) {
            return Err(Error::InvalidSignatureEncoding);
        }

        // B3: calculate e'=Hv(M')
        let e = hash_message::<D>(msg);

        // B4: calculate t = (r' + s') modn, verification failed if t=0
        let t = n.add(r, s);
        if t.is_zero() {
            return Err(Error::InvalidSignature);
        }

        // B5: calculate the point (x1', y1')=[s']G + [t]PA
        let point = curve.add(
            &curve.mul_by_generator(s),
            &curve.mul(&t, self.public_key.as_affine()),
        );
        let x1 = point.x().ok_or(Error::InvalidSignature)?;

        // B6: calculate R=(e'+x1') modn, verification pass if R=r'
        if &n.add(&e, x1) == r {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Is `signature` a valid `Sm3` signature over `msg`?
    pub fn is_valid(&self, msg: &[u8], signature: &Signature) -> bool {
        self.verify_digest::<Sm3>(msg, signature).is_ok()
    }
}

//
// `*Verifier` trait impls
//

impl Verifier<Signature> for VerifyingKey<'_> {
    fn verify(&self, msg: &[u8], signature: &Signature) -> signature::Result<()> {
        self.verify_digest::<Sm3>(msg, signature)
            .map_err(|_| signature::Error::new())
    }
}

//
// Other trait impls
//

impl AsRef<AffinePoint> for VerifyingKey<'_> {
    fn as_ref(&self) -> &AffinePoint {
        self.as_affine()
    }
}

impl<'a> From<PublicKey<'a>> for VerifyingKey<'a> {
    fn from(public_key: PublicKey<'a>) -> VerifyingKey<'a> {
        Self::new(public_key)
    }
}

impl<'a> From<VerifyingKey<'a>> for PublicKey<'a> {
    fn from(verifying_key: VerifyingKey<'a>) -> PublicKey<'a> {
        verifying_key.public_key
    }
}

impl<'a> From<&VerifyingKey<'a>> for PublicKey<'a> {
    fn from(verifying_key: &VerifyingKey<'a>) -> PublicKey<'a> {
        verifying_key.public_key.clone()
    }
}
