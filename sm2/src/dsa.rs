//! SM2 Digital Signature Algorithm (SM2DSA) as defined in GM/T 0003-2012 Part 2.
//!
//! The message digest `e` is computed over the message alone; no signer
//! identity hash `ZA` is prepended.
//!
//! ## Usage
//!
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use rand_core::OsRng; // requires 'getrandom' feature
//! use sm2_core::{
//!     dsa::{Signature, SigningKey, signature::Signer},
//!     CurveParams, SecretKey,
//! };
//!
//! // Signing
//! let curve = CurveParams::sm2();
//! let secret_key = SecretKey::random(curve, &mut OsRng)?;
//! let signing_key = SigningKey::new(secret_key)?;
//! let verifying_key_bytes = signing_key.verifying_key().to_sec1_bytes();
//! let message = b"test message";
//! let signature: Signature = signing_key.sign(message);
//!
//! // Verifying
//! use sm2_core::dsa::{VerifyingKey, signature::Verifier};
//!
//! let verifying_key = VerifyingKey::from_sec1_bytes(curve, &verifying_key_bytes)?;
//! verifying_key.verify(message, &signature)?;
//! # Ok(())
//! # }
//! ```

mod signing;
mod verifying;

pub use signature;

pub use self::{signing::SigningKey, verifying::VerifyingKey};

use crate::{CurveParams, Error, Hash256, Result, arithmetic::field::to_fixed_be};
use core::fmt::{self, Debug};
use num_bigint::BigUint;

/// SM2DSA signature.
///
/// Components are kept as plain integers: a [`Signature`] parsed from bytes
/// may hold values outside `[1, n-1]`, which verification rejects.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Create a [`Signature`] from its `r` and `s` components.
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// Parse `r || s`, each a big-endian integer of
    /// [`CurveParams::scalar_len`] bytes.
    pub fn from_slice(curve: &CurveParams, bytes: &[u8]) -> Result<Self> {
        let len = curve.scalar_len();
        if bytes.len() != 2 * len {
            return Err(Error::InvalidSignatureEncoding);
        }

        let (r, s) = bytes.split_at(len);
        Ok(Self::new(
            BigUint::from_bytes_be(r),
            BigUint::from_bytes_be(s),
        ))
    }

    /// Serialize as `r || s`, each padded to [`CurveParams::scalar_len`]
    /// bytes.
    ///
    /// Fails with [`Error::InvalidSignatureEncoding`] if a component is too
    /// wide for the curve.
    pub fn to_bytes(&self, curve: &CurveParams) -> Result<Vec<u8>> {
        let len = curve.scalar_len();
        let r = to_fixed_be(&self.r, len).ok_or(Error::InvalidSignatureEncoding)?;
        let s = to_fixed_be(&self.s, len).ok_or(Error::InvalidSignatureEncoding)?;
        Ok([r, s].concat())
    }

    /// Get the `r` component of this signature
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Get the `s` component of this signature
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Split the signature into its `r` and `s` components.
    pub fn split(&self) -> (&BigUint, &BigUint) {
        (&self.r, &self.s)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sm2_core::dsa::Signature(r: {:X}, s: {:X})", self.r, self.s)
    }
}

/// `e = int(Hash(M))`
fn hash_message<D: Hash256>(msg: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&D::digest(msg))
}

#[cfg(test)]
mod tests {
    use super::Signature;
    use crate::{CurveParams, Error, arithmetic::tests::toy_curve};
    use hex_literal::hex;
    use num_bigint::BigUint;

    #[test]
    fn bytes_are_fixed_width() {
        let curve = CurveParams::sm2();
        let signature = Signature::new(BigUint::from(1u8), BigUint::from(0x0102u16));
        let bytes = signature.to_bytes(curve).unwrap();

        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[31], 1);
        assert_eq!(&bytes[62..], &hex!("0102"));
        assert_eq!(Signature::from_slice(curve, &bytes).unwrap(), signature);
    }

    #[test]
    fn reject_wrong_length() {
        let curve = CurveParams::sm2();
        assert_eq!(
            Signature::from_slice(curve, &[0u8; 63]).unwrap_err(),
            Error::InvalidSignatureEncoding
        );
        assert_eq!(
            Signature::from_slice(curve, &[0u8; 65]).unwrap_err(),
            Error::InvalidSignatureEncoding
        );
    }

    #[test]
    fn reject_oversized_component() {
        let curve = toy_curve();
        let signature = Signature::new(BigUint::from(256u16), BigUint::from(1u8));
        assert_eq!(
            signature.to_bytes(&curve).unwrap_err(),
            Error::InvalidSignatureEncoding
        );
    }

    #[test]
    fn debug_is_hex() {
        let signature = Signature::new(BigUint::from(0xABu8), BigUint::from(0x1Cu8));
        assert_eq!(
            format!("{signature:?}"),
            "sm2_core::dsa::Signature(r: AB, s: 1C)"
        );
    }
}
