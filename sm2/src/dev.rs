//! Test doubles for the digest and the random number generator.

use rand_core::{CryptoRng, RngCore};
use sm3::digest::{FixedOutput, HashMarker, Output, OutputSizeUser, Update, consts::U32};

/// 256-bit "digest" whose output is always zero.
#[derive(Clone, Debug, Default)]
pub(crate) struct ZeroDigest;

impl HashMarker for ZeroDigest {}

impl OutputSizeUser for ZeroDigest {
    type OutputSize = U32;
}

impl Update for ZeroDigest {
    fn update(&mut self, _data: &[u8]) {}
}

impl FixedOutput for ZeroDigest {
    fn finalize_into(self, out: &mut Output<Self>) {
        out.fill(0);
    }
}

/// Generator stuck on a single byte value. Counts how often it was asked
/// for bytes.
#[derive(Debug)]
pub(crate) struct StuckRng {
    byte: u8,
    pub(crate) fills: usize,
}

impl StuckRng {
    pub(crate) fn new(byte: u8) -> Self {
        Self { byte, fills: 0 }
    }
}

impl RngCore for StuckRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_be_bytes([self.byte; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_be_bytes([self.byte; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fills += 1;
        dest.fill(self.byte);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for StuckRng {}
