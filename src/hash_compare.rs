//! Side-by-side hashes of one key: DJB2, a caller-supplied `BuildHasher`
//! and SHA-256, each with the bucket it selects.

use crate::djb2::{bucket_index, djb2, hash_str};
use core::hash::BuildHasher;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashRow {
    pub key: String,
    pub djb2: u64,
    pub djb2_bucket: usize,
    pub other: u64,
    pub other_bucket: usize,
    /// Lowercase hex of the SHA-256 digest.
    pub sha256: String,
    /// The digest read as a big-endian integer, modulo the bucket count.
    pub sha256_bucket: usize,
}

/// Hash `key` three ways for a table of `buckets` buckets (> 0).
pub fn compare<S: BuildHasher>(key: &str, buckets: usize, other: &S) -> HashRow {
    let d = djb2(key);
    let o = hash_str(other, key);
    let digest = Sha256::digest(key.as_bytes());
    HashRow {
        key: key.to_owned(),
        djb2: d,
        djb2_bucket: bucket_index(d, buckets),
        other: o,
        other_bucket: bucket_index(o, buckets),
        sha256: hex::encode(digest),
        sha256_bucket: digest_mod(&digest, buckets),
    }
}

fn digest_mod(digest: &[u8], buckets: usize) -> usize {
    let m = buckets as u128;
    digest
        .iter()
        .fold(0u128, |acc, &b| (acc * 256 + b as u128) % m) as usize
}
