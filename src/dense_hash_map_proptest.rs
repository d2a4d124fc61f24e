#![cfg(test)]

// Property tests for DenseHashMap kept inside the crate so they can check the
// two-array invariants (Table::assert_consistent) after every operation.

use crate::{Cursor, DenseHashMap, Error};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    TryInsert(usize, i32),
    GetOrDefault(usize),
    Erase(usize),
    Find(usize),
    At(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
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
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryInsert(i, v)),
            2 => idx.clone().prop_map(OpI::GetOrDefault),
            4 => idx.clone().prop_map(OpI::Erase),
            2 => idx.clone().prop_map(OpI::Find),
            2 => idx.clone().prop_map(OpI::At),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Collision variant using a constant hasher to stress equality resolution.
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

// Drives one scenario against `sut` and a std HashMap model.
//
// Invariants exercised across random operation sequences:
// - Duplicate keys are rejected and leave the stored value unchanged.
// - `find`/`contains_key`/`at` parity with the model.
// - `erase` removes exactly the requested key; absent keys are a no-op.
// - `get_or_default` inserts `0` exactly when the key was absent.
// - `iter` yields each live entry exactly once; key set equals the model's.
// - The value store and bucket index stay mutually consistent.
// - A remembered cursor stays valid (same key) across non-mutating ops and
//   reports StaleCursor after any op that inserted, erased or cleared.
fn run_scenario<S>(
    mut sut: DenseHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut remembered: Option<(Cursor, Key)> = None;

    for op in ops {
        let mutated = match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                let inserted = sut.insert(k.clone(), v);
                prop_assert_eq!(inserted, !already, "insert result must mirror absence");
                if inserted {
                    model.insert(k, v);
                }
                inserted
            }
            OpI::TryInsert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                match sut.try_insert(k.clone(), v) {
                    Ok(c) => {
                        prop_assert!(!already, "try_insert must fail on duplicate");
                        prop_assert_eq!(c.value(&sut), Ok(&v));
                        model.insert(k.clone(), v);
                        remembered = Some((c, k));
                        // The fresh cursor is current; nothing to invalidate.
                        false
                    }
                    Err(e) => {
                        prop_assert!(already);
                        prop_assert_eq!(e, Error::DuplicateKey);
                        false
                    }
                }
            }
            OpI::GetOrDefault(i) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                let got = *sut.get_or_default(k.clone());
                let expected = *model.entry(k).or_default();
                prop_assert_eq!(got, expected);
                !already
            }
            OpI::Erase(i) => {
                let k = key_from(&pool, i);
                let removed = sut.erase(&k);
                prop_assert_eq!(removed, model.remove(&k).is_some());
                prop_assert!(sut.find(&k).is_none());
                removed
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let found = sut.find(&k);
                prop_assert_eq!(found.is_some(), model.contains_key(&k));
                if let Some(c) = found {
                    prop_assert_eq!(c.key(&sut), Ok(&k));
                    prop_assert_eq!(c.value(&sut).ok(), model.get(&k));
                    remembered = Some((c, k));
                }
                false
            }
            OpI::At(i) => {
                let k = key_from(&pool, i);
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(sut.at(&k), Ok(v)),
                    None => prop_assert_eq!(sut.at(&k), Err(Error::KeyNotFound)),
                }
                false
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
                false
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(v) = sut.get_mut(&k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(&k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
                false
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(sut.iter().count(), sut.len());
                prop_assert_eq!(s_keys, m_keys);
                false
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), 1);
                true
            }
        };

        // Post-conditions after each op
        // 1) Two-array structure is consistent
        sut.assert_consistent();
        // 2) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 3) Remembered cursor follows the invalidation contract
        if let Some((c, k)) = remembered.take() {
            match c.key(&sut) {
                Ok(found) => {
                    prop_assert!(!mutated, "cursor survived a mutation");
                    prop_assert_eq!(found, &k);
                    remembered = Some((c, k));
                }
                Err(Error::StaleCursor { .. }) => prop_assert!(mutated),
                Err(other) => prop_assert!(false, "unexpected cursor error {:?}", other),
            }
        }
    }

    // Every surviving model entry is reachable with its value.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(DenseHashMap::new(), pool, ops)?;
    }
}

// Same state-machine invariants under worst-case collision behavior
// (constant hasher): every key shares one chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(DenseHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Resize transparency: any set of distinct keys large enough to force many
// doublings is fully retrievable, and erasing a subset keeps the rest.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_distinct_keys_survive_growth_and_erase(
        keys in proptest::collection::hash_set(any::<u64>(), 0..600),
        erase_mask in proptest::collection::vec(any::<bool>(), 600),
    ) {
        let keys: Vec<u64> = keys.into_iter().collect();
        let mut m: DenseHashMap<u64, u64> = DenseHashMap::new();
        for &k in &keys {
            prop_assert!(m.insert(k, k ^ 0x5a5a));
        }
        prop_assert_eq!(m.len(), keys.len());
        m.assert_consistent();

        let mut kept = Vec::new();
        for (i, &k) in keys.iter().enumerate() {
            if erase_mask[i] {
                prop_assert!(m.erase(&k));
            } else {
                kept.push(k);
            }
        }
        m.assert_consistent();
        prop_assert_eq!(m.len(), kept.len());
        for k in kept {
            prop_assert_eq!(m.at(&k), Ok(&(k ^ 0x5a5a)));
        }
    }
}
