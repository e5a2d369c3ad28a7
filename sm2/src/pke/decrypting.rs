//! Support for SM2 decryption.
//!
//! ## Algorithm
//!
//! ```text
//! B1: take C1 from C and verify that it lies on the curve
//! B2: compute the point [dB]C1 = (x2, y2)
//! B3: compute t = KDF(x2 || y2, klen), fail if t is all zero
//! B4: compute M' = C2 xor t
//! B5: compute u = Hash(x2 || M' || y2), fail if u != C3
//! B6: output the plaintext M'
//! ```

use super::{Ciphertext, Mode, encrypting::EncryptingKey, shared_secret, tag, xor};
use crate::{
    CurveParams, Error, Hash256, Result, SecretKey,
    kdf::{is_degenerate, kdf},
};
use core::fmt::{self, Debug};
use num_bigint::BigUint;
use sm3::Sm3;
use subtle::{Choice, ConstantTimeEq};

/// Represents a decryption key used for decrypting messages using elliptic curve cryptography.
#[derive(Clone)]
pub struct DecryptingKey<'a> {
    secret_key: SecretKey<'a>,
    encrypting_key: EncryptingKey<'a>,
}

impl<'a> DecryptingKey<'a> {
    /// Creates a new `DecryptingKey` from a `SecretKey` with the default decryption mode (`C1C3C2`).
    pub fn new(secret_key: SecretKey<'a>) -> Self {
        Self::new_with_mode(secret_key, Mode::default())
    }

    /// Creates a new `DecryptingKey` from a `SecretKey` and sets the decryption mode.
    pub fn new_with_mode(secret_key: SecretKey<'a>, mode: Mode) -> Self {
        let encrypting_key = EncryptingKey::new_with_mode(secret_key.public_key(), mode);
        Self {
            secret_key,
            encrypting_key,
        }
    }

    /// Parse decrypting key from big endian-encoded byte slice containing a secret
    /// scalar value.
    pub fn from_slice(curve: &'a CurveParams, slice: &[u8]) -> Result<Self> {
        SecretKey::from_slice(curve, slice).map(Self::new)
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

    /// Get the [`EncryptingKey`] which corresponds to this [`DecryptingKey`].
    pub fn encrypting_key(&self) -> &EncryptingKey<'a> {
        &self.encrypting_key
    }

    /// Curve this key belongs to.
    pub fn curve(&self) -> &'a CurveParams {
        self.secret_key.curve()
    }

    /// Byte layout expected by [`DecryptingKey::decrypt_slice`].
    pub fn mode(&self) -> Mode {
        self.encrypting_key.mode()
    }

    /// Decrypts a ciphertext using the default digest algorithm (`Sm3`).
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>> {
        self.decrypt_digest::<Sm3>(ciphertext)
    }

    /// Decrypts a ciphertext using the specified digest algorithm.
    ///
    /// Every failure is reported as [`Error::Decryption`], whichever check
    /// rejected the ciphertext.
    pub fn decrypt_digest<D: Hash256>(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>> {
        decrypt::<D>(self.curve(), &self.secret_key.to_scalar(), ciphertext)
            .map_err(|_| Error::Decryption)
    }

    /// Decodes a ciphertext according to the key's [`Mode`] and decrypts it
    /// using the default digest algorithm (`Sm3`).
    pub fn decrypt_slice(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let ciphertext = Ciphertext::from_slice(self.curve(), ciphertext, self.mode())
            .map_err(|_| Error::Decryption)?;
        self.decrypt(&ciphertext)
    }
}

//
// Other trait impls
//

impl<'a> AsRef<EncryptingKey<'a>> for DecryptingKey<'a> {
    fn as_ref(&self) -> &EncryptingKey<'a> {
        &self.encrypting_key
    }
}

impl ConstantTimeEq for DecryptingKey<'_> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret_key.ct_eq(&other.secret_key)
    }
}

impl Debug for DecryptingKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptingKey")
            .field("encrypting_key", &self.encrypting_key)
            .finish_non_exhaustive()
    }
}

/// Constant-time comparison
impl Eq for DecryptingKey<'_> {}
impl PartialEq for DecryptingKey<'_> {
    fn eq(&self, other: &DecryptingKey<'_>) -> bool {
        self.secret_key == other.secret_key && self.mode() == other.mode()
    }
}

/// Decrypts `ciphertext` with the secret scalar `d`, reporting which check
/// failed.
pub(crate) fn decrypt<D: Hash256>(
    curve: &CurveParams,
    d: &BigUint,
    ciphertext: &Ciphertext,
) -> Result<Vec<u8>> {
    // B1: verify that point C1 satisfies the elliptic curve
    let c1 = ciphertext.c1();
    if c1.is_identity() || !curve.is_on_curve(c1) {
        return Err(Error::MalformedEncoding);
    }

    // B2: compute [dB]C1 = (x2, y2)
    let shared = shared_secret(curve, &curve.mul(d, c1)).ok_or(Error::MalformedEncoding)?;

    // B3: compute t = KDF(x2 || y2, klen)
    let t = kdf::<D>(&shared, ciphertext.c2().len())?;
    if is_degenerate(&t) {
        return Err(Error::DegenerateKeystream);
    }

    // B4: compute M' = C2 xor t
    let msg = xor(ciphertext.c2(), &t);

    // B5: compute u = Hash(x2 || M' || y2), u must equal C3
    let u = tag::<D>(&shared, &msg);
    if !bool::from(u.as_slice().ct_eq(ciphertext.c3().as_slice())) {
        return Err(Error::TagMismatch);
    }

    // B6: output the plaintext M'
    Ok(msg)
}
