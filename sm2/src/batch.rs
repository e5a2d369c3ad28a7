//! Parallel batch encryption and decryption.
//!
//! Items are processed independently and results come back in input order.
//! A `concurrency` of `0` or `1` runs sequentially on the calling thread;
//! anything larger builds a rayon pool of that many threads for the call.

use crate::{
    Error, Hash256, PrecomputedTable, Result,
    pke::{Ciphertext, DecryptingKey, EncryptingKey, encrypt},
};
use rand_core::OsRng;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use sm3::Sm3;
use tracing::{debug, trace};

fn build_pool(concurrency: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))
}

impl EncryptingKey<'_> {
    /// Encrypts every message in `messages` using the default digest
    /// algorithm (`Sm3`) and the operating system's random number generator.
    pub fn batch_encrypt<M>(&self, messages: &[M], concurrency: usize) -> Result<Vec<Ciphertext>>
    where
        M: AsRef<[u8]> + Sync,
    {
        self.batch_encrypt_digest::<M, Sm3>(messages, concurrency)
    }

    /// Encrypts every message in `messages` using the specified digest
    /// algorithm.
    ///
    /// Fixed-base tables for `G` and `Q` are computed once for the call and
    /// dropped when it returns. Fails if any single encryption fails.
    pub fn batch_encrypt_digest<M, D>(
        &self,
        messages: &[M],
        concurrency: usize,
    ) -> Result<Vec<Ciphertext>>
    where
        M: AsRef<[u8]> + Sync,
        D: Hash256,
    {
        let curve = self.curve();
        let g = PrecomputedTable::new(curve, curve.generator());
        let q = PrecomputedTable::new(curve, self.as_public_key().as_affine());
        debug!(messages = messages.len(), concurrency, "batch encrypt");

        let encrypt_one = |msg: &M| {
            let msg = msg.as_ref();
            trace!(len = msg.len(), "encrypting");
            encrypt::<_, D>(curve, &g, &q, &mut OsRng, msg)
        };

        if concurrency <= 1 {
            return messages.iter().map(encrypt_one).collect();
        }

        let pool = build_pool(concurrency)?;
        pool.install(|| messages.par_iter().map(encrypt_one).collect())
    }
}

impl DecryptingKey<'_> {
    /// Decrypts every ciphertext in `ciphertexts` using the default digest
    /// algorithm (`Sm3`).
    pub fn batch_decrypt(
        &self,
        ciphertexts: &[Ciphertext],
        concurrency: usize,
    ) -> Result<Vec<Result<Vec<u8>>>> {
        self.batch_decrypt_digest::<Sm3>(ciphertexts, concurrency)
    }

    /// Decrypts every ciphertext in `ciphertexts` using the specified digest
    /// algorithm.
    ///
    /// Each item gets its own result, so one bad ciphertext does not hide
    /// the others. The outer error only reports a thread pool failure.
    pub fn batch_decrypt_digest<D: Hash256>(
        &self,
        ciphertexts: &[Ciphertext],
        concurrency: usize,
    ) -> Result<Vec<Result<Vec<u8>>>> {
        debug!(ciphertexts = ciphertexts.len(), concurrency, "batch decrypt");

        let decrypt_one = |ciphertext: &Ciphertext| {
            trace!(len = ciphertext.c2().len(), "decrypting");
            self.decrypt_digest::<D>(ciphertext)
        };

        if concurrency <= 1 {
            return Ok(ciphertexts.iter().map(decrypt_one).collect());
        }

        let pool = build_pool(concurrency)?;
        Ok(pool.install(|| ciphertexts.par_iter().map(decrypt_one).collect()))
    }
}
