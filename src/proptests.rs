use super::iter::Iter;
use super::node::{Link, Node};
use super::trie;

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

// Walks a whole version, checking ordering, pruning and statistics, and
// returns the number of keys found.
fn validate_node(node: &Node<u64>) -> usize {
    assert!(
        node.value().is_some() || node.children().is_some(),
        "node with neither value nor children is reachable"
    );
    if let Some(next) = node.next() {
        assert!(next.key() > node.key(), "sibling chain must be ascending");
    }
    let below = node.children().map_or(0, |c| validate_node(c));
    let after = node.next().map_or(0, |n| validate_node(n));
    let own = if node.value().is_some() { 1 } else { 0 };
    assert_eq!(node.count(), own + below + after, "stored count mismatch");
    assert_eq!(
        node.depth(),
        node.children().map_or(1, |c| 1 + c.depth()),
        "stored depth mismatch"
    );
    own + below + after
}

fn validate_tree(root: &Link<u64>) {
    match root {
        Some(node) => {
            let found = validate_node(node);
            assert_eq!(found, Iter::new(Some(&**node)).count());
        }
        None => {}
    }
}

#[derive(Clone, Debug)]
enum Op {
    Set(Vec<u8>, u64),
    Remove(Vec<u8>),
    Get(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A small alphabet so that keys share prefixes and siblings.
    prop::collection::vec(prop::sample::select(vec![0u8, 1, 2, b'a', b'b', 255]), 1..=6)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Set(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        25 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=300)
}

fn lookup(root: &Link<u64>, key: &[u8]) -> Option<u64> {
    trie::get(root, key, 0).map(|v| *v)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut root = trie::empty();
        let mut model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(key, value) => {
                    root = trie::set(&root, &key, 0, Some(Arc::new(value)));
                    model.insert(key, value);
                }
                Op::Remove(key) => {
                    root = trie::remove(&root, &key, 0);
                    model.remove(&key);
                }
                Op::Get(key) => {
                    prop_assert_eq!(lookup(&root, &key), model.get(&key).copied());
                }
            }
            prop_assert_eq!(root.as_ref().map_or(0, |r| r.count()), model.len());
            prop_assert_eq!(root.is_none(), model.is_empty());
        }

        validate_tree(&root);
        let got: Vec<(Vec<u8>, u64)> = Iter::new(root.as_deref())
            .map(|(k, v)| (k.into(), **v))
            .collect();
        let expected: Vec<(Vec<u8>, u64)> = model.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_old_versions_are_untouched(
        ops in ops_strategy(),
        key in key_strategy(),
        value in any::<u64>()
    ) {
        let mut root = trie::empty();
        for op in ops {
            match op {
                Op::Set(k, v) => root = trie::set(&root, &k, 0, Some(Arc::new(v))),
                Op::Remove(k) => root = trie::remove(&root, &k, 0),
                Op::Get(_) => {}
            }
        }
        let before: Vec<(Vec<u8>, u64)> = Iter::new(root.as_deref())
            .map(|(k, v)| (k.into(), **v))
            .collect();

        let updated = trie::set(&root, &key, 0, Some(Arc::new(value)));
        prop_assert_eq!(lookup(&updated, &key), Some(value));

        // Non-interference: every other key reads the same in both versions.
        for (k, v) in before.iter() {
            prop_assert_eq!(lookup(&root, k), Some(*v));
            if *k != key {
                prop_assert_eq!(lookup(&updated, k), Some(*v));
            }
        }

        let removed = trie::remove(&updated, &key, 0);
        prop_assert_eq!(lookup(&removed, &key), None);
        prop_assert_eq!(lookup(&updated, &key), Some(value));

        let after: Vec<(Vec<u8>, u64)> = Iter::new(root.as_deref())
            .map(|(k, v)| (k.into(), **v))
            .collect();
        prop_assert_eq!(before, after);
        validate_tree(&updated);
        validate_tree(&removed);
    }

    #[test]
    fn prop_set_is_idempotent(ops in ops_strategy(), key in key_strategy(), value in any::<u64>()) {
        let mut root = trie::empty();
        for op in ops {
            if let Op::Set(k, v) = op {
                root = trie::set(&root, &k, 0, Some(Arc::new(v)));
            }
        }
        let value = Some(Arc::new(value));
        let once = trie::set(&root, &key, 0, value.clone());
        let twice = trie::set(&once, &key, 0, value);
        prop_assert!(Arc::ptr_eq(once.as_ref().unwrap(), twice.as_ref().unwrap()));

        // Removing an absent key shares the whole version.
        let without = trie::remove(&once, &key, 0);
        let again = trie::remove(&without, &key, 0);
        match (&without, &again) {
            (Some(a), Some(b)) => prop_assert!(Arc::ptr_eq(a, b)),
            (None, None) => {}
            _ => prop_assert!(false, "removal is not idempotent"),
        }
    }

    #[test]
    fn prop_removing_everything_empties(keys in prop::collection::vec(key_strategy(), 0..100)) {
        let mut root = trie::empty();
        for (i, key) in keys.iter().enumerate() {
            root = trie::set(&root, key, 0, Some(Arc::new(i as u64)));
        }
        validate_tree(&root);
        for key in keys.iter() {
            root = trie::remove(&root, key, 0);
        }
        prop_assert!(root.is_none());
    }
}
