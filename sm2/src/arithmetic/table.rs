//! Precomputed multiples of a fixed base point.

use super::{AffinePoint, CurveParams};
use num_bigint::BigUint;

/// Scalar multiplication of a base point fixed by the implementor.
pub trait FixedBaseMul {
    /// `[k]B`
    fn mul_base(&self, k: &BigUint) -> AffinePoint;
}

/// Multiplies the curve's generator `G`.
impl FixedBaseMul for CurveParams {
    fn mul_base(&self, k: &BigUint) -> AffinePoint {
        self.mul_by_generator(k)
    }
}

/// Table containing the doublings `[B, 2B, 4B, ..., 2^(t-1)B]` of a base point
/// `B`, where `t` is the bit length of the group order `n`.
///
/// Multiplying by a scalar below `2^t` then costs only the additions of
/// double-and-add. The table is bounded by `t` entries and is never filled
/// implicitly: callers build one for a base point they will multiply
/// repeatedly and drop it when done.
#[derive(Clone, Debug)]
pub struct PrecomputedTable<'a> {
    curve: &'a CurveParams,
    base: AffinePoint,
    doublings: Vec<AffinePoint>,
}

impl<'a> PrecomputedTable<'a> {
    /// Compute a new table for `base`.
    pub fn new(curve: &'a CurveParams, base: &AffinePoint) -> Self {
        let bits = usize::try_from(curve.order().bits()).unwrap_or(0);
        let mut doublings = Vec::with_capacity(bits);
        let mut point = base.clone();

        for _ in 0..bits {
            let next = curve.double(&point);
            doublings.push(point);
            point = next;
        }

        Self {
            curve,
            base: base.clone(),
            doublings,
        }
    }

    /// Base point `B` this table was computed for.
    pub fn base(&self) -> &AffinePoint {
        &self.base
    }

    /// Number of precomputed points.
    pub fn len(&self) -> usize {
        self.doublings.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.doublings.is_empty()
    }
}

impl FixedBaseMul for PrecomputedTable<'_> {
    fn mul_base(&self, k: &BigUint) -> AffinePoint {
        let fits = u64::try_from(self.doublings.len()).is_ok_and(|len| k.bits() <= len);
        if !fits {
            return self.curve.mul(k, &self.base);
        }

        (0u64..)
            .zip(&self.doublings)
            .filter(|(i, _)| k.bit(*i))
            .fold(AffinePoint::Identity, |acc, (_, point)| {
                self.curve.add(&acc, point)
            })
    }
}
