//! ChainedHashTable: string-keyed buckets of singly linked chains with
//! load-factor driven growth and shrinking.

use crate::djb2::{bucket_index, hash_str, Djb2BuildHasher};
use crate::policy::{load, ConfigError, LoadFactorPolicy, MAX_CAPACITY};
use core::fmt;
use core::hash::BuildHasher;
use slotmap::{DefaultKey, SlotMap};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    hash: u64,
    next: Option<DefaultKey>, // successor in the same bucket
}

impl<V> Entry<V> {
    #[inline]
    fn matches(&self, hash: u64, key: &str) -> bool {
        self.hash == hash && self.key == key
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoveError {
    #[error("key not found: {0:?}")]
    KeyNotFound(String),
}

/// Hash table with one chain per bucket.
///
/// Entries live in a generational arena; buckets and entries link to each
/// other by arena key, so every chain is singly linked, acyclic and owned by
/// exactly one bucket.
pub struct ChainedHashTable<V, S = Djb2BuildHasher> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>, // chain heads, len == capacity
    entries: SlotMap<DefaultKey, Entry<V>>,
    start_capacity: usize,
    policy: LoadFactorPolicy,
}

impl<V> ChainedHashTable<V> {
    /// Table with `capacity` buckets, DJB2 hashing and the default policy.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_policy_and_hasher(capacity, LoadFactorPolicy::default(), Djb2BuildHasher)
    }

    /// Table with `capacity` buckets, DJB2 hashing and a custom `policy`.
    pub fn with_policy(capacity: usize, policy: LoadFactorPolicy) -> Result<Self, ConfigError> {
        Self::with_policy_and_hasher(capacity, policy, Djb2BuildHasher)
    }
}

/// Iterator over `(key, &value)` pairs in unspecified order.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key.as_str(), &e.value))
    }
}

/// Iterator over `(key, &mut value)` pairs in unspecified order.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key.as_str(), &mut e.value))
    }
}

/// Keys of one bucket in chain order.
pub struct ChainKeys<'a, V> {
    entries: &'a SlotMap<DefaultKey, Entry<V>>,
    cursor: Option<DefaultKey>,
}

impl<'a, V> Iterator for ChainKeys<'a, V> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.entries.get(self.cursor?)?;
        self.cursor = e.next;
        Some(e.key.as_str())
    }
}

impl<V, S> ChainedHashTable<V, S>
where
    S: BuildHasher,
{
    /// Table with `capacity` buckets hashing keys through `hasher`.
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, ConfigError> {
        Self::with_policy_and_hasher(capacity, LoadFactorPolicy::default(), hasher)
    }

    /// Fully configured table. Fails on zero or unallocatable capacity and on
    /// a policy rejected by `LoadFactorPolicy::validate`.
    pub fn with_policy_and_hasher(
        capacity: usize,
        policy: LoadFactorPolicy,
        hasher: S,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge(capacity));
        }
        policy.validate()?;
        Ok(Self {
            hasher,
            buckets: vec![None; capacity],
            entries: SlotMap::with_key(),
            start_capacity: capacity,
            policy,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// True when no entry is stored; buckets may still be allocated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket count at construction; the table never shrinks below it.
    pub fn start_capacity(&self) -> usize {
        self.start_capacity
    }

    pub fn load_factor(&self) -> f64 {
        load(self.len(), self.capacity())
    }

    pub fn policy(&self) -> &LoadFactorPolicy {
        &self.policy
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Hash of `key` under this table's hasher.
    pub fn hash_key(&self, key: &str) -> u64 {
        hash_str(&self.hasher, key)
    }

    /// Bucket `key` maps to at the current capacity.
    pub fn bucket_of(&self, key: &str) -> usize {
        bucket_index(self.hash_key(key), self.capacity())
    }

    /// Keys chained in `bucket`, head first. Empty for out-of-range buckets.
    pub fn chain_keys(&self, bucket: usize) -> ChainKeys<'_, V> {
        ChainKeys {
            entries: &self.entries,
            cursor: self.buckets.get(bucket).copied().flatten(),
        }
    }

    fn find(&self, key: &str) -> Option<DefaultKey> {
        let hash = self.hash_key(key);
        let mut cursor = self.buckets[bucket_index(hash, self.capacity())];
        while let Some(k) = cursor {
            let e = &self.entries[k];
            if e.matches(hash, key) {
                return Some(k);
            }
            cursor = e.next;
        }
        None
    }

    pub fn retrieve(&self, key: &str) -> Option<&V> {
        self.find(key).map(|k| &self.entries[k].value)
    }

    pub fn retrieve_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        self.entries.get_mut(k).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Insert or overwrite. Returns the previous value when `key` was present.
    ///
    /// An overwrite never resizes. A new key grows the table first when the
    /// load with one more entry would exceed the threshold, and is then
    /// placed at the tail of its bucket under the new capacity.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let hash = self.hash_key(&key);
        let mut index = bucket_index(hash, self.capacity());

        // Single comparing scan: overwrite on match, else remember the tail.
        let mut tail = None;
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            let e = &mut self.entries[k];
            if e.matches(hash, &key) {
                return Some(core::mem::replace(&mut e.value, value));
            }
            tail = Some(k);
            cursor = e.next;
        }

        if self.policy.should_grow(self.len() + 1, self.capacity()) {
            self.resize(self.policy.growth_factor);
            index = bucket_index(hash, self.capacity());
            tail = self.chain_tail(index);
        }

        let k = self.entries.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match tail {
            None => self.buckets[index] = Some(k),
            Some(t) => self.entries[t].next = Some(k),
        }
        None
    }

    fn chain_tail(&self, index: usize) -> Option<DefaultKey> {
        let mut tail = self.buckets[index]?;
        while let Some(next) = self.entries[tail].next {
            tail = next;
        }
        Some(tail)
    }

    /// Remove `key` and return its value; a missing key is reported, not ignored.
    pub fn remove(&mut self, key: &str) -> Result<V, RemoveError> {
        let hash = self.hash_key(key);
        let index = bucket_index(hash, self.capacity());

        let Some(entry) = self
            .unlink(index, hash, key)
            .and_then(|k| self.entries.remove(k))
        else {
            warn!(key, bucket = index, "remove: key not found");
            return Err(RemoveError::KeyNotFound(key.to_owned()));
        };

        if self
            .policy
            .should_shrink(self.len(), self.capacity(), self.start_capacity)
        {
            self.resize(self.policy.shrink_factor);
        }
        Ok(entry.value)
    }

    // Detach the matching entry from its chain; the arena still holds it.
    fn unlink(&mut self, index: usize, hash: u64, key: &str) -> Option<DefaultKey> {
        let head = self.buckets[index]?;
        if self.entries[head].matches(hash, key) {
            self.buckets[index] = self.entries[head].next;
            return Some(head);
        }
        let mut prev = head;
        while let Some(next) = self.entries[prev].next {
            if self.entries[next].matches(hash, key) {
                let after = self.entries[next].next;
                self.entries[prev].next = after;
                return Some(next);
            }
            prev = next;
        }
        None
    }

    // Rebuild the bucket array at `capacity * factor` buckets. Entries keep
    // their arena slots; only the links move, so the count cannot change.
    fn resize(&mut self, factor: f64) {
        let old_capacity = self.capacity();
        let new_capacity = scaled_capacity(old_capacity, factor, self.start_capacity);
        if new_capacity == old_capacity {
            return;
        }

        let old = core::mem::replace(&mut self.buckets, vec![None; new_capacity]);
        let mut tails: Vec<Option<DefaultKey>> = vec![None; new_capacity];
        for head in old {
            let mut cursor = head;
            while let Some(k) = cursor {
                let e = &mut self.entries[k];
                cursor = e.next.take();
                let index = bucket_index(e.hash, new_capacity);
                match tails[index] {
                    None => self.buckets[index] = Some(k),
                    Some(t) => self.entries[t].next = Some(k),
                }
                tails[index] = Some(k);
            }
        }

        debug!(
            old_capacity,
            new_capacity,
            len = self.len(),
            "resized bucket array"
        );
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.entries.iter_mut(),
        }
    }
}

// `round(capacity * factor)` kept within `start_capacity..=MAX_CAPACITY`.
// Growth adds at least one bucket until the ceiling is reached.
fn scaled_capacity(capacity: usize, factor: f64, start_capacity: usize) -> usize {
    let target = (capacity as f64 * factor).round();
    let mut scaled = if target.is_finite() && target < MAX_CAPACITY as f64 {
        target.max(0.0) as usize
    } else {
        MAX_CAPACITY
    };
    if factor > 1.0 {
        scaled = scaled.max(capacity.saturating_add(1));
    }
    scaled.clamp(start_capacity, MAX_CAPACITY.max(start_capacity))
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for ChainedHashTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
