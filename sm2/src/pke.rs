//! SM2 Encryption Algorithm (SM2 PKE) as defined in GM/T 0003-2012 Part 4.
//!
//! ## Usage
//!
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # fn example() -> Result<(), sm2_core::Error> {
//! use rand_core::OsRng; // requires 'getrandom' feature
//! use sm2_core::{CurveParams, SecretKey, pke::DecryptingKey};
//!
//! // Encrypting
//! let secret_key = SecretKey::random(CurveParams::sm2(), &mut OsRng)?;
//! let decrypting_key = DecryptingKey::new(secret_key);
//! let encrypting_key = decrypting_key.encrypting_key();
//! let ciphertext = encrypting_key.encrypt_to_vec(&mut OsRng, b"plaintext")?;
//!
//! // Decrypting
//! let plaintext = decrypting_key.decrypt_slice(&ciphertext)?;
//! assert_eq!(plaintext, b"plaintext");
//! # Ok(())
//! # }
//! ```

mod decrypting;
mod encrypting;

pub use self::{decrypting::DecryptingKey, encrypting::EncryptingKey};

#[cfg(feature = "batch")]
pub(crate) use self::encrypting::encrypt;

use crate::{
    AffinePoint, CurveParams, Error, HASH_SIZE, Hash256, Result,
    keys::{decode_point, encode_point},
};
use zeroize::Zeroizing;

/// Modes for the cipher encoding/decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// `C1 || C2 || C3`, the layout of the 2010 draft standard.
    C1C2C3,
    /// `C1 || C3 || C2`, the layout of GM/T 0003-2012.
    #[default]
    C1C3C2,
}

/// SM2 ciphertext `(C1, C2, C3)`.
///
/// - `C1 = [k]G`, the ephemeral public point
/// - `C2 = M ⊕ KDF(x₂ || y₂, len(M))`, the masked message
/// - `C3 = Hash(x₂ || M || y₂)`, the integrity tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    c1: AffinePoint,
    c2: Vec<u8>,
    c3: [u8; HASH_SIZE],
}

impl Ciphertext {
    /// Assemble a ciphertext from its parts.
    pub fn new(c1: AffinePoint, c2: Vec<u8>, c3: [u8; HASH_SIZE]) -> Self {
        Self { c1, c2, c3 }
    }

    /// Decode from slice.
    ///
    /// `C1` is a SEC1 uncompressed point and must lie on `curve`; `C3` is
    /// [`HASH_SIZE`] bytes; `C2` is whatever remains.
    pub fn from_slice(curve: &CurveParams, bytes: &[u8], mode: Mode) -> Result<Self> {
        let c1_len = 1 + 2 * curve.field_len();
        let (c1, rest) = bytes
            .split_at_checked(c1_len)
            .ok_or(Error::MalformedEncoding)?;
        let c1 = decode_point(curve, c1)?;
        if !curve.is_on_curve(&c1) {
            return Err(Error::MalformedEncoding);
        }

        let (c2, c3) = match mode {
            Mode::C1C3C2 => {
                let (c3, c2) = rest
                    .split_at_checked(HASH_SIZE)
                    .ok_or(Error::MalformedEncoding)?;
                (c2, c3)
            }
            Mode::C1C2C3 => {
                let c2_len = rest
                    .len()
                    .checked_sub(HASH_SIZE)
                    .ok_or(Error::MalformedEncoding)?;
                rest.split_at(c2_len)
            }
        };

        let mut tag = [0u8; HASH_SIZE];
        tag.copy_from_slice(c3);
        Ok(Self::new(c1, c2.to_vec(), tag))
    }

    /// Encode to Vec
    pub fn to_vec(&self, curve: &CurveParams, mode: Mode) -> Vec<u8> {
        let c1 = encode_point(curve, &self.c1);
        match mode {
            Mode::C1C2C3 => [c1.as_slice(), self.c2.as_slice(), self.c3.as_slice()].concat(),
            Mode::C1C3C2 => [c1.as_slice(), self.c3.as_slice(), self.c2.as_slice()].concat(),
        }
    }

    /// Get C1
    pub fn c1(&self) -> &AffinePoint {
        &self.c1
    }

    /// Get C2
    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    /// Get C3
    pub fn c3(&self) -> &[u8; HASH_SIZE] {
        &self.c3
    }
}

/// Encoded coordinates `x₂ || y₂` of the shared point `[k]Q = [d]C1`.
fn shared_secret(curve: &CurveParams, point: &AffinePoint) -> Option<Zeroizing<Vec<u8>>> {
    let (x, y) = point.coordinates()?;
    let mut z = Zeroizing::new(curve.field().to_be_bytes(x));
    z.extend(curve.field().to_be_bytes(y));
    Some(z)
}

/// `C3 = Hash(x₂ || M || y₂)`
fn tag<D: Hash256>(shared: &[u8], msg: &[u8]) -> [u8; HASH_SIZE] {
    let (x2, y2) = shared.split_at(shared.len() / 2);
    let digest = D::new()
        .chain_update(x2)
        .chain_update(msg)
        .chain_update(y2)
        .finalize();

    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest);
    out
}

/// XORs `data` with the keystream.
fn xor(data: &[u8], keystream: &[u8]) -> Vec<u8> {
    data.iter().zip(keystream).map(|(d, t)| d ^ t).collect()
}
