#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so they can reach
// `chain_keys` and the resize model without a public test hook.

use crate::chained_hash_table::{ChainedHashTable, RemoveError};
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Retrieve(usize),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=9, proptest::collection::vec("[a-z]{0,5}", 1..=24)).prop_flat_map(
        |(capacity, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let op = prop_oneof![
                3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                2 => idx.clone().prop_map(OpI::Remove),
                1 => idx.clone().prop_map(OpI::Retrieve),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..120)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Expected capacity under the default policy.
struct CapacityModel {
    start: usize,
    capacity: usize,
}

impl CapacityModel {
    fn before_insert(&mut self, len: usize, is_new: bool) {
        if is_new && (len + 1) as f64 / self.capacity as f64 > 0.7 {
            self.capacity *= 2;
        }
    }

    fn after_remove(&mut self, len: usize) {
        if self.capacity > self.start && (len as f64 / self.capacity as f64) < 0.2 {
            let halved = ((self.capacity as f64) * 0.5).round() as usize;
            self.capacity = halved.max(self.start);
        }
    }
}

fn assert_chains_consistent<S: BuildHasher>(
    sut: &ChainedHashTable<i32, S>,
    model: &HashMap<String, i32>,
) -> Result<(), TestCaseError> {
    let mut linked = 0;
    for b in 0..sut.capacity() {
        for k in sut.chain_keys(b) {
            prop_assert_eq!(sut.bucket_of(k), b, "key {:?} chained in wrong bucket", k);
            linked += 1;
        }
    }
    prop_assert_eq!(linked, model.len());
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` overwrites in place and returns the previous value.
// - `retrieve` agrees with the model; misses are `None`.
// - `remove` returns the stored value or `KeyNotFound`, never panics.
// - capacity follows the grow-before-insert / shrink-after-remove rule and
//   never drops below the start capacity.
// - every key is linked exactly once, in the bucket its hash selects.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashTable<i32> = ChainedHashTable::new(capacity).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut caps = CapacityModel { start: capacity, capacity };

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    caps.before_insert(model.len(), !model.contains_key(&k));
                    let prev = sut.insert(k.clone(), v);
                    prop_assert_eq!(prev, model.insert(k, v));
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    match sut.remove(k) {
                        Ok(v) => {
                            prop_assert_eq!(Some(v), model.remove(k));
                            caps.after_remove(model.len());
                        }
                        Err(RemoveError::KeyNotFound(missing)) => {
                            prop_assert!(!model.contains_key(k));
                            prop_assert_eq!(&missing, k);
                        }
                    }
                    prop_assert!(sut.retrieve(k).is_none());
                }
                OpI::Retrieve(i) => {
                    let k = &pool[i];
                    let first = sut.retrieve(k).copied();
                    prop_assert_eq!(first, model.get(k).copied());
                    prop_assert_eq!(sut.retrieve(k).copied(), first, "retrieve is idempotent");
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    if let Some(v) = sut.retrieve_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                }
                OpI::Iterate => {
                    let s: BTreeSet<(String, i32)> =
                        sut.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                    let m: BTreeSet<(String, i32)> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(s, m);
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(sut.capacity(), caps.capacity);
            prop_assert!(sut.capacity() >= sut.start_capacity());
            assert_chains_consistent(&sut, &model)?;
        }
    }
}

// Collision variant using a constant hasher: one chain holds every key.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl core::hash::Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: with every key in one chain, head, inner and tail removals all
// splice correctly and the chain keeps insertion order of the survivors.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_chain_splicing(
        n in 1usize..16,
        removals in proptest::collection::vec(0usize..16, 0..16),
    ) {
        let mut sut = ChainedHashTable::with_hasher(1, ConstBuildHasher).unwrap();
        let mut order: Vec<String> = Vec::new();
        for i in 0..n {
            let k = format!("k{i}");
            sut.insert(k.clone(), i as i32);
            order.push(k);
        }
        for r in removals {
            let k = format!("k{r}");
            let expected = order.iter().position(|o| *o == k);
            match (sut.remove(&k), expected) {
                (Ok(v), Some(pos)) => {
                    prop_assert_eq!(v, r as i32);
                    order.remove(pos);
                }
                (Err(RemoveError::KeyNotFound(_)), None) => {}
                (got, want) => prop_assert!(false, "remove {:?}: got {:?}, model {:?}", k, got, want),
            }
            let chain: Vec<String> = (0..sut.capacity())
                .flat_map(|b| sut.chain_keys(b).map(str::to_string).collect::<Vec<_>>())
                .collect();
            prop_assert_eq!(&chain, &order);
        }
    }
}
