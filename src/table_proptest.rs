#![cfg(test)]

// Property tests for OpenTable kept inside the crate so they can reach the
// table without the `bench_internal` feature.

use crate::table::OpenTable;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking walks towards earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    RetainEven,
    CloneSwap,
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            4 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::RetainEven),
            1 => Just(OpI::CloneSwap),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` returns the model's previous value; the last insert wins.
// - `remove` returns the model's value and the key disappears.
// - `get`/`contains_key` parity, including borrowed `&str` lookups.
// - A clone is independent: the abandoned source keeps its old contents.
// - `iter` yields each live entry exactly once.
// - After every op: len parity, power-of-two capacity and the 3/4 load
//   limit over occupied + tombstone slots.
fn run_scenario<S>(mut sut: OpenTable<Key, i32, S>, pool: &[String], ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(!sut.contains_key(&k));
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get(k.0.as_str()), model.get(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::RetainEven => {
                let before = model.len();
                model.retain(|_, v| *v % 2 == 0);
                let removed = sut.retain(|_, v| *v % 2 == 0);
                prop_assert_eq!(removed, before - model.len());
            }
            OpI::CloneSwap => {
                let snapshot: BTreeMap<Key, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let mut copy = sut.clone();
                prop_assert_eq!(copy.capacity(), sut.capacity());
                prop_assert_eq!(copy.tombstones(), sut.tombstones());
                // Mutate the clone; the source must not notice.
                if let Some(k) = snapshot.keys().next() {
                    copy.remove(k);
                    model.remove(k);
                }
                let after: BTreeMap<Key, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(after, snapshot);
                sut = copy;
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s_keys: Vec<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let unique: BTreeSet<_> = s_keys.iter().cloned().collect();
                prop_assert_eq!(s_keys.len(), unique.len(), "iteration repeated a key");
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(unique, m_keys);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().len(), model.len());
        if sut.capacity() > 0 {
            prop_assert!(sut.capacity().is_power_of_two());
            prop_assert!((sut.len() + sut.tombstones()) * 4 <= sut.capacity() * 3);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(OpenTable::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one probe
// chain, which stresses tombstone handling and equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(OpenTable::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
