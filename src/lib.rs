//! chained-hashtable: a string-keyed hash table built by hand, with
//! linked-list chaining, a pluggable string hash (DJB2 by default) and
//! load-factor driven resizing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: show the parts a standard map hides: hashing, index derivation,
//!   collision resolution and resize-with-rehash.
//! - Pieces:
//!   - `djb2`: the DJB2 `Hasher`/`BuildHasher` and the `hash_str` /
//!     `bucket_index` helpers shared by the table and the simulation.
//!   - `policy`: `LoadFactorPolicy` (grow above 0.7 by x2, shrink below 0.2
//!     by x0.5) and `ConfigError`.
//!   - `chained_hash_table`: `ChainedHashTable<V, S>` itself.
//!   - `collisions`: how many random keys fit before two share a bucket.
//!   - `hash_compare` (feature `demo`): DJB2, another hasher and SHA-256
//!     side by side.
//!
//! Storage
//! - Entries live in a `slotmap::SlotMap`; each bucket stores the arena key
//!   of its chain head and each entry stores the key of its successor.
//!   Chains are singly linked, acyclic and never shared.
//! - Each entry caches its hash. Rehashing reads the cached value and
//!   relinks entries without moving them, so a resize preserves `len()`.
//!
//! Resize protocol
//! - `insert` scans the key's chain once. A match is overwritten in place
//!   and never resizes. A new key first checks growth, from the load the
//!   table would have with one more entry, and is then appended to its
//!   bucket under the resulting capacity.
//! - Resized capacities saturate at `MAX_CAPACITY`; `growth_factor` is
//!   capped at `MAX_GROWTH_FACTOR`.
//! - `remove` unlinks and drops the entry, then checks shrinking. The table
//!   never shrinks below the capacity it was built with.
//! - There is no public resize.
//!
//! Errors
//! - A retrieve miss is `None`.
//! - A remove miss is `Err(RemoveError::KeyNotFound)`, also logged at warn.
//! - Zero or oversized capacity, or a nonsensical policy, is `Err(ConfigError)`.
//!
//! Notes and non-goals
//! - Single-threaded; mutation goes through `&mut self`.
//! - Keys are strings only.
//! - Iteration order is unspecified.

pub mod chained_hash_table;
mod chained_hash_table_proptest;
pub mod collisions;
pub mod djb2;
#[cfg(feature = "demo")]
pub mod hash_compare;
pub mod policy;

// Public surface
pub use chained_hash_table::{ChainedHashTable, RemoveError};
pub use djb2::{bucket_index, djb2, hash_str, Djb2BuildHasher, Djb2Hasher};
pub use policy::{ConfigError, LoadFactorPolicy, MAX_CAPACITY, MAX_GROWTH_FACTOR};
