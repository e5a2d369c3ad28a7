//! Support for SM2 encryption.
//!
//! ## Algorithm
//!
//! ```text
//! A1: generate a random number k in [1, n-1]
//! A2: compute the point C1 = [k]G = (x1, y1)
//! A3: compute the point [k]PB = (x2, y2)
//! A4: compute t = KDF(x2 || y2, klen), return to A1 if t is all zero
//! A5: compute C2 = M xor t
//! A6: compute C3 = Hash(x2 || M || y2)
//! A7: output the ciphertext (C1, C2, C3)
//! ```

use super::{Ciphertext, Mode, shared_secret, tag, xor};
use crate::{
    CurveParams, Error, FixedBaseMul, Hash256, MAX_ATTEMPTS, PublicKey, Result,
    kdf::{is_degenerate, kdf},
};
use rand_core::CryptoRngCore;
use sm3::Sm3;
use tracing::debug;

/// Represents an encryption key used for encrypting messages using elliptic curve cryptography.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptingKey<'a> {
    public_key: PublicKey<'a>,
    mode: Mode,
}

impl<'a> EncryptingKey<'a> {
    /// Initialize [`EncryptingKey`] from PublicKey
    pub fn new(public_key: PublicKey<'a>) -> Self {
        Self::new_with_mode(public_key, Mode::default())
    }

    /// Initialize [`EncryptingKey`] from PublicKey and set Encryption mode
    pub fn new_with_mode(public_key: PublicKey<'a>, mode: Mode) -> Self {
        Self { public_key, mode }
    }

    /// Initialize [`EncryptingKey`] from a SEC1-encoded public key.
    pub fn from_sec1_bytes(curve: &'a CurveParams, bytes: &[u8]) -> Result<Self> {
        let public_key = PublicKey::from_sec1_bytes(curve, bytes)?;
        Ok(Self::new(public_key))
    }

    /// Borrow the inner [`PublicKey`].
    pub fn as_public_key(&self) -> &PublicKey<'a> {
        &self.public_key
    }

    /// Curve this key belongs to.
    pub fn curve(&self) -> &'a CurveParams {
        self.public_key.curve()
    }

    /// Byte layout used by [`EncryptingKey::encrypt_to_vec`].
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Encrypts a message using the encryption key.
    ///
    /// This method calculates the digest using the `Sm3` hash function and then performs encryption.
    pub fn encrypt<R: CryptoRngCore + ?Sized>(&self, rng: &mut R, msg: &[u8]) -> Result<Ciphertext> {
        self.encrypt_digest::<R, Sm3>(rng, msg)
    }

    /// Encrypts a message using a specified digest algorithm.
    pub fn encrypt_digest<R, D>(&self, rng: &mut R, msg: &[u8]) -> Result<Ciphertext>
    where
        R: CryptoRngCore + ?Sized,
        D: Hash256,
    {
        encrypt::<R, D>(self.curve(), self.curve(), &self.public_key, rng, msg)
    }

    /// Encrypts a message and encodes the ciphertext according to the key's
    /// [`Mode`].
    pub fn encrypt_to_vec<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        let ciphertext = self.encrypt(rng, msg)?;
        Ok(ciphertext.to_vec(self.curve(), self.mode))
    }
}

impl<'a> From<PublicKey<'a>> for EncryptingKey<'a> {
    fn from(value: PublicKey<'a>) -> Self {
        Self::new(value)
    }
}

/// Encrypts `msg` to the public key `Q`.
///
/// `g` and `q` compute `[k]G` and `[k]Q`; they are either plain
/// double-and-add or precomputed tables.
pub(crate) fn encrypt<R, D>(
    curve: &CurveParams,
    g: &(impl FixedBaseMul + ?Sized),
    q: &(impl FixedBaseMul + ?Sized),
    rng: &mut R,
    msg: &[u8],
) -> Result<Ciphertext>
where
    R: CryptoRngCore + ?Sized,
    D: Hash256,
{
    for attempt in 1..=MAX_ATTEMPTS {
        // A1: generate a random number k in [1, n-1]
        let k = curve.random_scalar(rng)?;

        // A2: compute point C1 = [k]G
        let c1 = g.mul_base(&k);

        // A3: compute point [k]PB = (x2, y2); never the identity for a
        // validated public key
        let shared = shared_secret(curve, &q.mul_base(&k)).ok_or(Error::InvalidPublicKey)?;

        // A4: compute t = KDF(x2 || y2, klen)
        let t = kdf::<D>(&shared, msg.len())?;
        if is_degenerate(&t) {
            debug!(attempt, "all-zero keystream, drawing a new ephemeral scalar");
            continue;
        }

        // A5: compute C2 = M xor t
        let c2 = xor(msg, &t);

        // A6: compute C3 = Hash(x2 || M || y2)
        let c3 = tag::<D>(&shared, msg);

        // A7: output the ciphertext
        return Ok(Ciphertext::new(c1, c2, c3));
    }

    Err(Error::RetriesExhausted(MAX_ATTEMPTS))
}
