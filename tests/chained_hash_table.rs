// ChainedHashTable integration suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Uniqueness: inserting an existing key overwrites in place.
// - Deletion: a removed key is gone and len drops by exactly one.
// - Growth: capacity doubles before the key that would push the load past
//   0.7 is placed.
// - Shrink: capacity halves after a removal drops the load under 0.2, never
//   below the start capacity.
// - Misses: retrieve yields None, remove yields KeyNotFound.
use chained_hashtable::{
    djb2, ChainedHashTable, ConfigError, Djb2BuildHasher, LoadFactorPolicy, RemoveError,
};
use std::collections::hash_map::RandomState;

// Test: overwrite versus new key.
// Assumes: a fresh 8-bucket table.
// Verifies: len counts keys, not inserts; last write wins; misses are None.
#[test]
fn overwrite_keeps_count() {
    let mut t = ChainedHashTable::new(8).unwrap();
    t.insert("a", 1);
    t.insert("b", 2);
    t.insert("a", 3);
    assert_eq!(t.len(), 2);
    assert_eq!(t.retrieve("a"), Some(&3));
    assert_eq!(t.retrieve("b"), Some(&2));
    assert_eq!(t.retrieve("c"), None);
}

// Test: growth on the third key of a four-bucket table.
// Assumes: default policy (grow when the pending load exceeds 0.7).
// Verifies: 3/4 = 0.75 doubles capacity; all keys remain retrievable.
#[test]
fn third_key_doubles_four_buckets() {
    let mut t = ChainedHashTable::new(4).unwrap();
    t.insert("one", 1);
    t.insert("two", 2);
    assert_eq!(t.capacity(), 4);
    t.insert("three", 3);
    assert_eq!(t.capacity(), 8);
    assert_eq!(t.len(), 3);
    assert_eq!(t.retrieve("one"), Some(&1));
    assert_eq!(t.retrieve("two"), Some(&2));
    assert_eq!(t.retrieve("three"), Some(&3));
}

// Test: overwriting at the growth threshold.
// Assumes: default policy; two keys in four buckets, so one more new key
// would reach 0.75.
// Verifies: overwriting an existing key keeps capacity and count; the next
// new key still doubles the table.
#[test]
fn overwrite_at_threshold_keeps_capacity() {
    let mut t = ChainedHashTable::new(4).unwrap();
    t.insert("a", 1);
    t.insert("b", 2);
    assert_eq!(t.insert("a", 10), Some(1));
    assert_eq!(t.insert("b", 20), Some(2));
    assert_eq!(t.capacity(), 4);
    assert_eq!(t.len(), 2);
    t.insert("c", 3);
    assert_eq!(t.capacity(), 8);
    assert_eq!(t.retrieve("a"), Some(&10));
}

// Test: remove from an empty table.
// Assumes: every bucket is empty.
// Verifies: the miss is reported and nothing changes.
#[test]
fn remove_from_empty_bucket_reports_not_found() {
    let mut t: ChainedHashTable<i32> = ChainedHashTable::new(4).unwrap();
    let err = t.remove("ghost").unwrap_err();
    assert_eq!(err, RemoveError::KeyNotFound("ghost".to_string()));
    assert_eq!(err.to_string(), r#"key not found: "ghost""#);
    assert_eq!(t.len(), 0);
    assert_eq!(t.capacity(), 4);
}

// Test: remove from an occupied bucket that lacks the key.
// Assumes: DJB2 at 8 buckets indexes by (5381 + sum of code points) mod 8,
// so "ab" and "ba" share a bucket.
// Verifies: the miss is reported and the chain is untouched.
#[test]
fn remove_miss_in_occupied_bucket() {
    let mut t = ChainedHashTable::new(8).unwrap();
    t.insert("ab", 1);
    assert_eq!(t.bucket_of("ab"), t.bucket_of("ba"));
    assert!(matches!(t.remove("ba"), Err(RemoveError::KeyNotFound(_))));
    assert_eq!(t.retrieve("ab"), Some(&1));
    assert_eq!(t.len(), 1);
}

// Test: deletion completeness.
// Verifies: len drops by one, the key reads back as None, and a second
// remove is a miss.
#[test]
fn remove_then_retrieve_is_none() {
    let mut t = ChainedHashTable::new(4).unwrap();
    for (i, k) in ["k1", "k2", "k3"].iter().enumerate() {
        t.insert(*k, i);
    }
    let before = t.len();
    assert_eq!(t.remove("k2"), Ok(1));
    assert_eq!(t.len(), before - 1);
    assert_eq!(t.retrieve("k2"), None);
    assert!(!t.contains_key("k2"));
    assert!(t.remove("k2").is_err());
}

// Test: shrink after growth.
// Assumes: start capacity 4, grown to 16 by six inserts.
// Verifies: removals halve to 8 then 4 and stop at the start capacity;
// survivors stay reachable at every step.
#[test]
fn shrink_to_start_capacity_and_stop() {
    let mut t = ChainedHashTable::new(4).unwrap();
    let keys: Vec<String> = (0..6).map(|i| format!("key-{i}")).collect();
    for (i, k) in keys.iter().enumerate() {
        t.insert(k.as_str(), i);
    }
    assert_eq!(t.capacity(), 16);

    for (n, k) in keys.iter().enumerate() {
        t.remove(k).unwrap();
        assert!(t.capacity() >= 4);
        for (i, rest) in keys.iter().enumerate().skip(n + 1) {
            assert_eq!(t.retrieve(rest), Some(&i));
        }
    }
    assert_eq!(t.capacity(), 4);
    assert!(t.is_empty());
}

// Test: start capacity is a floor even when the table is emptied.
#[test]
fn empty_table_never_shrinks_below_start() {
    let mut t = ChainedHashTable::new(8).unwrap();
    t.insert("x", 0);
    t.remove("x").unwrap();
    assert_eq!(t.capacity(), 8);
    assert_eq!(t.start_capacity(), 8);
    assert_eq!(t.load_factor(), 0.0);
}

// Test: the original driver scenario with two buckets.
// Verifies: the table grows to 8 on the way up and returns to 2 on the way
// down; every retrieve agrees with what is still stored.
#[test]
fn two_bucket_walkthrough() {
    let mut ht = ChainedHashTable::new(2).unwrap();
    ht.insert("line_1", "Tiny hash table");
    ht.insert("line_2", "Filled beyond capacity");
    ht.insert("line_3", "Linked list saves the day!");
    assert_eq!(ht.capacity(), 8);

    ht.remove("line_1").unwrap();
    assert_eq!(ht.retrieve("line_1"), None);
    assert_eq!(ht.retrieve("line_2"), Some(&"Filled beyond capacity"));
    ht.remove("line_2").unwrap();
    assert_eq!(ht.capacity(), 4);
    assert_eq!(ht.retrieve("line_3"), Some(&"Linked list saves the day!"));
    ht.remove("line_3").unwrap();
    assert_eq!(ht.capacity(), 2);
    assert!(ht.is_empty());
}

// Test: the table hashes with DJB2 by default.
#[test]
fn default_hasher_is_djb2() {
    let t: ChainedHashTable<()> = ChainedHashTable::new(8).unwrap();
    assert_eq!(t.hash_key("key-9"), djb2("key-9"));
    assert_eq!(t.hash_key("key-9"), t.hash_key("key-9"));
    assert_eq!(t.bucket_of("key-9"), (djb2("key-9") % 8) as usize);
}

// Test: a randomized hasher can be plugged in.
// Verifies: the table works and lookups stay consistent across growth.
#[test]
fn plugged_random_state() {
    let mut t = ChainedHashTable::with_hasher(2, RandomState::new()).unwrap();
    for i in 0..100 {
        t.insert(format!("k{i}"), i);
    }
    for i in 0..100 {
        assert_eq!(t.retrieve(&format!("k{i}")), Some(&i));
    }
}

// Test: construction errors.
#[test]
fn construction_errors() {
    assert_eq!(
        ChainedHashTable::<u8>::new(0).err(),
        Some(ConfigError::ZeroCapacity)
    );
    let bad = LoadFactorPolicy {
        shrink_below: -0.1,
        ..LoadFactorPolicy::default()
    };
    let err = ChainedHashTable::<u8, _>::with_policy_and_hasher(4, bad, Djb2BuildHasher)
        .err()
        .expect("negative shrink threshold rejected");
    assert_eq!(
        err.to_string(),
        "invalid load-factor policy: shrink_below = -0.1"
    );

    let runaway = LoadFactorPolicy {
        growth_factor: 1e30,
        ..LoadFactorPolicy::default()
    };
    assert!(matches!(
        ChainedHashTable::<u8>::with_policy(1, runaway),
        Err(ConfigError::InvalidPolicy {
            field: "growth_factor",
            ..
        })
    ));
    assert_eq!(
        ChainedHashTable::<u8>::new(usize::MAX).err(),
        Some(ConfigError::CapacityTooLarge(usize::MAX))
    );
}

// Test: a custom policy changes when growth happens.
// Assumes: grow above 0.5.
// Verifies: the second key of a four-bucket table does not grow it
// (2/4 = 0.5 is not above), the third does.
#[test]
fn custom_policy_thresholds() {
    let policy = LoadFactorPolicy {
        grow_above: 0.5,
        shrink_below: 0.1,
        ..LoadFactorPolicy::default()
    };
    let mut t = ChainedHashTable::with_policy(4, policy).unwrap();
    t.insert("a", 1);
    t.insert("b", 2);
    assert_eq!(t.capacity(), 4);
    t.insert("c", 3);
    assert_eq!(t.capacity(), 8);
    assert_eq!(t.policy(), &policy);
}
