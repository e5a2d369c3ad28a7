//! Error types.

use thiserror::Error;

/// Error type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Curve parameters do not describe a usable prime-order group.
    #[error("invalid curve parameters: {0}")]
    InvalidCurveParameters(&'static str),
    /// Scalar outside of the range accepted by the operation.
    #[error("scalar out of range")]
    InvalidScalarRange,
    /// Point failed curve membership or subgroup validation.
    #[error("invalid public key")]
    InvalidPublicKey,
    /// Key derivation produced an all-zero keystream.
    #[error("degenerate keystream")]
    DegenerateKeystream,
    /// Recomputed `C3` does not match the ciphertext.
    #[error("integrity tag mismatch")]
    TagMismatch,
    /// Decryption failed. Deliberately carries no detail.
    #[error("decryption failed")]
    Decryption,
    /// Signature component outside of `[1, n-1]`, or wrong width.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,
    /// Signature did not verify.
    #[error("invalid signature")]
    InvalidSignature,
    /// Byte string could not be decoded.
    #[error("malformed encoding")]
    MalformedEncoding,
    /// Requested keystream would overflow the 32-bit KDF counter.
    #[error("keystream too long")]
    KeystreamTooLong,
    /// Rejection sampling did not terminate within the attempt budget.
    #[error("rejection sampling exceeded {0} attempts")]
    RetriesExhausted(usize),
    /// Random number generator failure.
    #[error("random number generator failure")]
    Rng,
    /// Thread pool for a batch operation could not be built.
    #[cfg(feature = "batch")]
    #[error("unable to build thread pool: {0}")]
    ThreadPool(String),
}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
