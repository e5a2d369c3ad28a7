//! Group operations on short Weierstrass curves `y² = x³ + ax + b` over a
//! prime field, with the curve given as a runtime [`CurveParams`] value.
//!
//! The recommended SM2 parameters can be found in [draft-shen-sm2-ecdsa
//! Appendix D]: Recommended Parameters.
//!
//! [draft-shen-sm2-ecdsa Appendix D]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#appendix-D

pub mod field;
mod point;
mod table;

pub use self::{
    point::AffinePoint,
    table::{FixedBaseMul, PrecomputedTable},
};

use self::field::Modulus;
use crate::{Error, MAX_ATTEMPTS, Result};
use hex_literal::hex;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use std::sync::LazyLock;

/// Recommended SM2 parameters, built on first use.
static SM2: LazyLock<CurveParams> = LazyLock::new(|| {
    let field = BigUint::from_bytes_be(&hex!(
        "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF"
    ));
    let order = BigUint::from_bytes_be(&hex!(
        "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123"
    ));

    CurveParams {
        // a = -3
        a: BigUint::from_bytes_be(&hex!(
            "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFC"
        )),
        b: BigUint::from_bytes_be(&hex!(
            "28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93"
        )),
        generator: AffinePoint::new(
            BigUint::from_bytes_be(&hex!(
                "32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7"
            )),
            BigUint::from_bytes_be(&hex!(
                "BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0"
            )),
        ),
        field: Modulus::new(field),
        order: Modulus::new(order),
    }
});

/// Domain parameters of a curve: field prime `p`, equation coefficients `a`
/// and `b`, base point `G` and the prime order `n` of the subgroup generated
/// by `G`.
///
/// Parameters are immutable once built. Keys borrow them, so every operation
/// runs against exactly the parameters its keys were created with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParams {
    field: Modulus,
    order: Modulus,
    a: BigUint,
    b: BigUint,
    generator: AffinePoint,
}

impl CurveParams {
    /// Build and validate a set of domain parameters.
    ///
    /// Checks that `p` is odd and greater than 3, that `a, b < p`, that the
    /// curve is non-singular (`4a³ + 27b² ≢ 0`), that `G` lies on the curve
    /// and that `G` has order `n`. Primality of `p` and `n` is assumed, not
    /// tested.
    pub fn new(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        n: BigUint,
        generator: (BigUint, BigUint),
    ) -> Result<Self> {
        if p <= BigUint::from(3u8) || !p.bit(0) {
            return Err(Error::InvalidCurveParameters("field prime must be odd and > 3"));
        }
        if n < BigUint::from(3u8) {
            return Err(Error::InvalidCurveParameters("group order must be >= 3"));
        }
        if a >= p || b >= p {
            return Err(Error::InvalidCurveParameters("coefficients must be reduced"));
        }

        let field = Modulus::new(p);
        let discriminant = field.add(
            &field.mul(&BigUint::from(4u8), &field.mul(&a, &field.square(&a))),
            &field.mul(&BigUint::from(27u8), &field.square(&b)),
        );
        if discriminant.is_zero() {
            return Err(Error::InvalidCurveParameters("curve is singular"));
        }

        let params = Self {
            field,
            order: Modulus::new(n),
            a,
            b,
            generator: AffinePoint::new(generator.0, generator.1),
        };

        if !params.is_on_curve(&params.generator) {
            return Err(Error::InvalidCurveParameters("generator is not on the curve"));
        }
        if !params.mul(params.order.value(), &params.generator).is_identity() {
            return Err(Error::InvalidCurveParameters("generator does not have order n"));
        }

        Ok(params)
    }

    /// Recommended SM2 256-bit parameters (GM/T 0003-2012).
    pub fn sm2() -> &'static Self {
        &SM2
    }

    /// Base field modulus `p`.
    pub fn field(&self) -> &Modulus {
        &self.field
    }

    /// Scalar field modulus, i.e. the group order `n`.
    pub fn order(&self) -> &Modulus {
        &self.order
    }

    /// Equation coefficient `a`.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Equation coefficient `b`.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Base point `G`.
    pub fn generator(&self) -> &AffinePoint {
        &self.generator
    }

    /// Width of an encoded coordinate: `ceil(bits(p) / 8)`.
    pub fn field_len(&self) -> usize {
        self.field.byte_len()
    }

    /// Width of an encoded scalar: `ceil(bits(n) / 8)`.
    pub fn scalar_len(&self) -> usize {
        self.order.byte_len()
    }

    /// Is `k` in `[1, n-1]`?
    pub fn is_valid_scalar(&self, k: &BigUint) -> bool {
        !k.is_zero() && self.order.contains(k)
    }

    /// Draw a scalar uniformly from `[1, n-1]`.
    pub fn random_scalar<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<BigUint> {
        random_in_range(rng, &(self.order.value() - BigUint::one()))
    }

    /// Draw a scalar uniformly from `[1, n-2]`, the range of SM2 private keys.
    pub(crate) fn random_secret_scalar<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<BigUint> {
        random_in_range(rng, &(self.order.value() - BigUint::from(2u8)))
    }
}

/// Rejection-sample a value uniformly from `[1, max]`.
///
/// Candidates are drawn with the bit length of `max`, so each draw is
/// accepted with probability above one half.
fn random_in_range<R: CryptoRngCore + ?Sized>(rng: &mut R, max: &BigUint) -> Result<BigUint> {
    let bits = max.bits();
    let len = usize::try_from(bits.div_ceil(8)).map_err(|_| Error::InvalidScalarRange)?;
    let excess = u32::try_from((8 - bits % 8) % 8).map_err(|_| Error::InvalidScalarRange)?;
    let mut buf = vec![0u8; len];

    for _ in 0..MAX_ATTEMPTS {
        rng.try_fill_bytes(&mut buf).map_err(|_| Error::Rng)?;
        if let Some(first) = buf.first_mut() {
            *first &= 0xFF >> excess;
        }

        let candidate = BigUint::from_bytes_be(&buf);
        if !candidate.is_zero() && &candidate <= max {
            return Ok(candidate);
        }
    }

    Err(Error::RetriesExhausted(MAX_ATTEMPTS))
}
