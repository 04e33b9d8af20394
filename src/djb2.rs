//! DJB2 string hashing and bucket-index derivation.
//!
//! Keys are fed to a `core::hash::Hasher` one Unicode scalar value at a time
//! (`write_u32(c as u32)`), so the default `Djb2BuildHasher` computes DJB2
//! over code points rather than UTF-8 bytes. Any other `BuildHasher` can be
//! plugged into the table and sees the same stream.

use core::hash::{BuildHasher, Hasher};

/// DJB2 seed value.
pub const DJB2_SEED: u64 = 5381;

/// Streaming DJB2: `h = h * 33 + x` for every word written, wrapping at 64 bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Djb2Hasher {
    state: u64,
}

impl Djb2Hasher {
    pub const fn new() -> Self {
        Self { state: DJB2_SEED }
    }

    #[inline]
    fn step(&mut self, x: u64) {
        self.state = self.state.wrapping_mul(33).wrapping_add(x);
    }
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.step(u64::from(b));
        }
    }

    // One step per code point instead of four per native-endian byte.
    #[inline]
    fn write_u32(&mut self, n: u32) {
        self.step(u64::from(n));
    }
}

/// Deterministic `BuildHasher` producing fresh `Djb2Hasher`s.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Djb2BuildHasher;

impl BuildHasher for Djb2BuildHasher {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Djb2Hasher {
        Djb2Hasher::new()
    }
}

/// Hash a string key with any `BuildHasher`, one code point per write.
pub fn hash_str<S: BuildHasher>(build: &S, key: &str) -> u64 {
    let mut h = build.build_hasher();
    for c in key.chars() {
        h.write_u32(u32::from(c));
    }
    h.finish()
}

/// DJB2 hash of `key`.
pub fn djb2(key: &str) -> u64 {
    hash_str(&Djb2BuildHasher, key)
}

/// Map a hash onto `0..capacity`. `capacity` must be non-zero.
#[inline]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket_index on zero capacity");
    (hash % capacity as u64) as usize
}
