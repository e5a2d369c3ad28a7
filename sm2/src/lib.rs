#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

pub mod dsa;
pub mod kdf;
pub mod pke;

mod arithmetic;
#[cfg(feature = "batch")]
mod batch;
#[cfg(test)]
mod dev;
mod error;
mod keys;

pub use num_bigint::{self, BigUint};
pub use sm3::{self, Sm3};

pub use crate::{
    arithmetic::{
        AffinePoint, CurveParams, FixedBaseMul, PrecomputedTable, field::Modulus,
    },
    error::{Error, Result},
    kdf::kdf,
    keys::{PublicKey, SecretKey, generate_keypair, validate_public_key},
};

use sm3::digest::{Digest, consts::U32};

/// Upper bound on the iterations of every rejection-sampling loop in the
/// crate (scalar sampling, the keystream retry in encryption and the nonce
/// retry in signing).
///
/// Each loop rejects with probability at most one half (and negligibly on
/// 256-bit curves), so reaching the bound surfaces as
/// [`Error::RetriesExhausted`] only on a broken random number generator.
pub const MAX_ATTEMPTS: usize = 64;

/// 256-bit message digest usable for the KDF, the `C3` tag and signatures.
///
/// Blanket-implemented for every [`Digest`] with a 32-byte output, e.g.
/// [`Sm3`] (the default) or SHA-256.
pub trait Hash256: Digest<OutputSize = U32> {}

impl<D: Digest<OutputSize = U32>> Hash256 for D {}

/// Size of a [`Hash256`] output in bytes.
pub const HASH_SIZE: usize = 32;
