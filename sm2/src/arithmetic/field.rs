//! Arithmetic modulo a prime.
//!
//! The same type serves as the base field of a curve (modulo `p`) and as its
//! scalar field (modulo the group order `n`). Operands may be unreduced; every
//! result is reduced into `[0, m)`.

use num_bigint::BigUint;
use num_traits::Zero;

/// Odd prime modulus `m` together with the modular operations over it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modulus {
    value: BigUint,
    byte_len: usize,
}

impl Modulus {
    /// Wrap `value`. Primality is the caller's responsibility; it is only
    /// relied upon by [`Modulus::invert`].
    pub(crate) fn new(value: BigUint) -> Self {
        let byte_len = usize::try_from(value.bits().div_ceil(8)).unwrap_or(usize::MAX);
        Self { value, byte_len }
    }

    /// The modulus itself.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.value.bits()
    }

    /// Width in bytes of a fixed-width big-endian encoding of residues:
    /// `ceil(bits / 8)`.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Is `x` already a canonical residue, i.e. `x < m`?
    pub fn contains(&self, x: &BigUint) -> bool {
        x < &self.value
    }

    /// `x mod m`
    pub fn reduce(&self, x: &BigUint) -> BigUint {
        x % &self.value
    }

    /// `(a + b) mod m`
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.value
    }

    /// `(a - b) mod m`
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.reduce(a);
        let b = self.reduce(b);

        if a >= b {
            a - b
        } else {
            &self.value - b + a
        }
    }

    /// `-a mod m`
    pub fn neg(&self, a: &BigUint) -> BigUint {
        let a = self.reduce(a);

        if a.is_zero() { a } else { &self.value - a }
    }

    /// `(a * b) mod m`
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.value
    }

    /// `a² mod m`
    pub fn square(&self, a: &BigUint) -> BigUint {
        self.mul(a, a)
    }

    /// Multiplicative inverse `a⁻¹ mod m`, computed via Fermat's little
    /// theorem as `a^(m-2) mod m`.
    ///
    /// Returns `None` when `a ≡ 0 (mod m)`, which has no inverse.
    pub fn invert(&self, a: &BigUint) -> Option<BigUint> {
        let a = self.reduce(a);

        if a.is_zero() {
            return None;
        }

        let exponent = &self.value - BigUint::from(2u8);
        Some(a.modpow(&exponent, &self.value))
    }

    /// Encode `x mod m` as a big-endian byte string of exactly
    /// [`Modulus::byte_len`] bytes.
    pub fn to_be_bytes(&self, x: &BigUint) -> Vec<u8> {
        to_fixed_be(&self.reduce(x), self.byte_len).unwrap_or_default()
    }
}

/// Left-pad the big-endian encoding of `x` with zeroes to `len` bytes.
///
/// Returns `None` if `x` does not fit.
pub(crate) fn to_fixed_be(x: &BigUint, len: usize) -> Option<Vec<u8>> {
    let bytes = if x.is_zero() {
        Vec::new()
    } else {
        x.to_bytes_be()
    };
    let pad = len.checked_sub(bytes.len())?;

    let mut out = vec![0u8; len];
    out[pad..].copy_from_slice(&bytes);
    Some(out)
}
