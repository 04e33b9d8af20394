//! Birthday-style collision simulation: how many random keys can be hashed
//! into `buckets` buckets before two of them share a bucket.

use crate::djb2::{bucket_index, hash_str};
use crate::policy::ConfigError;
use core::hash::BuildHasher;
use rand::Rng;
use tracing::debug;

/// One simulation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Trial {
    pub buckets: usize,
    /// Distinct buckets filled before the first repeat.
    pub hashes_before_collision: usize,
}

impl Trial {
    pub fn percent_of_buckets(&self) -> f64 {
        self.hashes_before_collision as f64 / self.buckets as f64 * 100.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollisionReport {
    pub buckets: usize,
    pub trials: Vec<Trial>,
}

impl CollisionReport {
    /// Mean of `Trial::percent_of_buckets` over all trials.
    pub fn mean_percent(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trials.iter().map(Trial::percent_of_buckets).sum();
        sum / self.trials.len() as f64
    }
}

/// Run `loops` trials, hashing stringified random floats with `hasher`.
pub fn simulate<S, R>(
    buckets: usize,
    loops: usize,
    hasher: &S,
    rng: &mut R,
) -> Result<CollisionReport, ConfigError>
where
    S: BuildHasher,
    R: Rng + ?Sized,
{
    if buckets == 0 {
        return Err(ConfigError::NotPositive("buckets"));
    }
    if loops == 0 {
        return Err(ConfigError::NotPositive("loops"));
    }
    let trials = (0..loops)
        .map(|_| Trial {
            buckets,
            hashes_before_collision: run_trial(buckets, hasher, rng),
        })
        .collect();
    Ok(CollisionReport { buckets, trials })
}

// Terminates within `buckets + 1` draws by pigeonhole.
fn run_trial<S, R>(buckets: usize, hasher: &S, rng: &mut R) -> usize
where
    S: BuildHasher,
    R: Rng + ?Sized,
{
    let mut tried = vec![false; buckets];
    let mut tries = 0;
    loop {
        let key = rng.gen::<f64>().to_string();
        let index = bucket_index(hash_str(hasher, &key), buckets);
        if tried[index] {
            debug!(buckets, tries, key = %key, "collision");
            return tries;
        }
        tried[index] = true;
        tries += 1;
    }
}
