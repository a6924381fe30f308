#![cfg(test)]

// Property tests for CellTable kept inside the crate so they can call the
// structural invariant checker.

use crate::cell_table::CellTable;
use crate::dict::hash_str;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Mutate(usize, i32),
    At(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..48).prop_map(OpI::At),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Replays `ops` against a `HashMap` model, checking structural invariants
/// after every step. `hash` decides how keys spread over the cells.
fn run_state_machine(
    pool: &[String],
    ops: Vec<OpI>,
    hash: fn(&str) -> u64,
) -> Result<(), TestCaseError> {
    let mut sut: CellTable<String, i32> = CellTable::new().expect("allocate table");
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = &pool[i];
                let prev = sut
                    .insert_with(hash(k), |kk| kk == k, || Ok(k.clone()), v)
                    .expect("insert within memory");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let got = sut.remove(hash(k), |kk| kk == k);
                let expected = model.remove(k).map(|v| (k.clone(), v));
                prop_assert_eq!(got, expected);
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(hash(k), |kk| kk == k), model.get(k));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match sut.get_mut(hash(k), |kk| kk == k) {
                    Some(v) => {
                        *v = v.wrapping_add(d);
                        let mv = model.get_mut(k).expect("model has key");
                        *mv = mv.wrapping_add(d);
                    }
                    None => {
                        prop_assert!(!model.contains_key(k));
                    }
                }
            }
            OpI::At(ix) => {
                // Dense positions: present exactly below len, and consistent.
                prop_assert_eq!(sut.key_at(ix).is_some(), ix < model.len());
                if let (Some(k), Some(v)) = (sut.key_at(ix), sut.value_at(ix)) {
                    prop_assert_eq!(model.get(k), Some(v));
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        if let Err(violation) = sut.check_invariants() {
            return Err(TestCaseError::fail(violation));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

fn clustered_hash(key: &str) -> u64 {
    // Few distinct start cells, long probe runs across the wrap boundary.
    (hash_str(key) % 3) + 14
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - set returns the previously stored value and never duplicates keys.
// - remove returns the exact (key, value) pair and the key disappears.
// - dense positions cover exactly [0, len).
// - cells and items stay in bijection and every item stays reachable from
//   its ideal cell through growth, backward-shift deletion, and clear.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(&pool, ops, hash_str)?;
    }

    #[test]
    fn prop_state_machine_with_clustering((pool, ops) in arb_scenario()) {
        run_state_machine(&pool, ops, clustered_hash)?;
    }
}
