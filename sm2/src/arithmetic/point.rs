//! Affine curve points and the group law.

use super::CurveParams;
use num_bigint::BigUint;
use num_traits::Zero;

/// Point on a Weierstrass curve in affine coordinates.
///
/// Coordinates are canonical residues in `[0, p)` for every point produced by
/// the group operations of [`CurveParams`]. Points built with
/// [`AffinePoint::new`] are unchecked; see
/// [`validate_public_key`](crate::validate_public_key).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AffinePoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    #[default]
    Identity,

    /// Point with affine coordinates `(x, y)`.
    Affine {
        /// x-coordinate
        x: BigUint,
        /// y-coordinate
        y: BigUint,
    },
}

impl AffinePoint {
    /// Point with the given coordinates. No curve membership check.
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self::Affine { x, y }
    }

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Affine coordinates, or `None` for the identity.
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            Self::Identity => None,
            Self::Affine { x, y } => Some((x, y)),
        }
    }

    /// x-coordinate, or `None` for the identity.
    pub fn x(&self) -> Option<&BigUint> {
        self.coordinates().map(|(x, _)| x)
    }

    /// y-coordinate, or `None` for the identity.
    pub fn y(&self) -> Option<&BigUint> {
        self.coordinates().map(|(_, y)| y)
    }
}

impl CurveParams {
    /// Does `point` satisfy `y² ≡ x³ + ax + b (mod p)` with both coordinates
    /// in `[0, p)`?
    ///
    /// The identity is a group element and is reported as on the curve.
    pub fn is_on_curve(&self, point: &AffinePoint) -> bool {
        let Some((x, y)) = point.coordinates() else {
            return true;
        };

        let fp = &self.field;
        if !fp.contains(x) || !fp.contains(y) {
            return false;
        }

        let lhs = fp.square(y);
        let rhs = fp.add(
            &fp.add(&fp.mul(&fp.square(x), x), &fp.mul(&self.a, x)),
            &self.b,
        );
        lhs == rhs
    }

    /// `-P`
    pub fn negate(&self, point: &AffinePoint) -> AffinePoint {
        match point {
            AffinePoint::Identity => AffinePoint::Identity,
            AffinePoint::Affine { x, y } => AffinePoint::new(x.clone(), self.field.neg(y)),
        }
    }

    /// `P₁ + P₂`
    pub fn add(&self, p1: &AffinePoint, p2: &AffinePoint) -> AffinePoint {
        let (x1, y1, x2, y2) = match (p1, p2) {
            (AffinePoint::Identity, _) => return p2.clone(),
            (_, AffinePoint::Identity) => return p1.clone(),
            (AffinePoint::Affine { x: x1, y: y1 }, AffinePoint::Affine { x: x2, y: y2 }) => {
                (x1, y1, x2, y2)
            }
        };

        if x1 == x2 {
            // Either P₂ = -P₁ or P₂ = P₁.
            return if y1 == y2 {
                self.double(p1)
            } else {
                AffinePoint::Identity
            };
        }

        let fp = &self.field;
        let Some(dx_inv) = fp.invert(&fp.sub(x2, x1)) else {
            // x₁ ≡ x₂ with non-canonical coordinates.
            return AffinePoint::Identity;
        };

        // λ = (y₂ - y₁) / (x₂ - x₁)
        let lambda = fp.mul(&fp.sub(y2, y1), &dx_inv);
        self.chord(&lambda, x1, y1, x2)
    }

    /// `2P`
    pub fn double(&self, point: &AffinePoint) -> AffinePoint {
        let Some((x, y)) = point.coordinates() else {
            return AffinePoint::Identity;
        };

        let fp = &self.field;
        let Some(two_y_inv) = fp.invert(&fp.add(y, y)) else {
            // Tangent is vertical: P has order 2.
            return AffinePoint::Identity;
        };

        // λ = (3x² + a) / 2y
        let three_x2 = fp.mul(&BigUint::from(3u8), &fp.square(x));
        let lambda = fp.mul(&fp.add(&three_x2, &self.a), &two_y_inv);
        self.chord(&lambda, x, y, x)
    }

    /// `x₃ = λ² - x₁ - x₂`, `y₃ = λ(x₁ - x₃) - y₁`
    fn chord(&self, lambda: &BigUint, x1: &BigUint, y1: &BigUint, x2: &BigUint) -> AffinePoint {
        let fp = &self.field;
        let x3 = fp.sub(&fp.sub(&fp.square(lambda), x1), x2);
        let y3 = fp.sub(&fp.mul(lambda, &fp.sub(x1, &x3)), y1);
        AffinePoint::new(x3, y3)
    }

    /// `[k]P` by binary double-and-add, scanning `k` from the least
    /// significant bit. `[0]P` is the identity.
    ///
    /// `k` is used as given, without reduction modulo `n`.
    pub fn mul(&self, k: &BigUint, point: &AffinePoint) -> AffinePoint {
        let mut result = AffinePoint::Identity;
        if k.is_zero() || point.is_identity() {
            return result;
        }

        let bits = k.bits();
        let mut addend = point.clone();
        for i in 0..bits {
            if k.bit(i) {
                result = self.add(&result, &addend);
            }
            if i + 1 < bits {
                addend = self.double(&addend);
            }
        }

        result
    }

    /// `[k]G`
    pub fn mul_by_generator(&self, k: &BigUint) -> AffinePoint {
        self.mul(k, &self.generator)
    }
}
