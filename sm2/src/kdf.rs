//! Key derivation function of GM/T 0003-2012 § 5.4.3.
//!
//! ```text
//! KDF(Z, klen) = Hv(Z || ct=1) || Hv(Z || ct=2) || ... truncated to klen bytes
//! ```
//!
//! The counter `ct` is encoded as a 32-bit big-endian integer. The output is
//! only ever used as a keystream, never as an integrity tag.

use crate::{Error, Result};
use sm3::digest::Digest;

/// Expand `z` into `klen` bytes of keystream.
///
/// Deterministic in `(z, klen)`, and prefix-consistent: the first `l` bytes of
/// `kdf(z, klen)` equal `kdf(z, l)` for every `l <= klen`.
///
/// Returns [`Error::KeystreamTooLong`] if `klen` would need more than
/// `2³² - 1` digest blocks.
pub fn kdf<D: Digest>(z: &[u8], klen: usize) -> Result<Vec<u8>> {
    let digest_size = <D as Digest>::output_size();
    let blocks = u32::try_from(klen.div_ceil(digest_size)).map_err(|_| Error::KeystreamTooLong)?;

    let mut keystream = Vec::with_capacity(klen);
    for ct in 1..=blocks {
        let ha = D::new().chain_update(z).chain_update(ct.to_be_bytes()).finalize();
        let take = digest_size.min(klen - keystream.len());
        keystream.extend_from_slice(&ha[..take]);
    }

    Ok(keystream)
}

/// Is the keystream all zero?
///
/// An empty keystream (zero-length message) is not degenerate: there is
/// nothing to mask.
pub(crate) fn is_degenerate(keystream: &[u8]) -> bool {
    !keystream.is_empty() && keystream.iter().all(|&byte| byte == 0)
}
