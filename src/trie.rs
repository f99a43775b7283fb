//! Root-level entry points of the trie algorithms.
//!
//! A version of the index is a [`Link`]: `None` for the empty index, or the
//! head of the top-level sibling chain. Updates return the root of a new
//! version and never alter the one they were given, so any number of
//! threads can keep reading older roots while a writer builds newer ones.

use super::node::{Link, Node};
use std::sync::Arc;

/// Returns the root of an index holding no key.
#[inline]
pub const fn empty<V>() -> Link<V> {
    None
}

/// Returns the value stored for `key` in the version rooted at `root`,
/// starting the comparison at byte `pos`.
pub fn get<V>(root: &Link<V>, key: &[u8], pos: usize) -> Option<Arc<V>> {
    root.as_ref()?.get(key, pos).cloned()
}

/// Returns the root of a new version in which `key` maps to `value`.
/// Passing `None` as the value unmaps the key.
pub fn set<V>(root: &Link<V>, key: &[u8], pos: usize, value: Option<Arc<V>>) -> Link<V> {
    match root {
        Some(root) => root.set(key, pos, value),
        None => value.map(|value| Node::new_path(key, pos, value, None)),
    }
}

/// Returns the root of a new version in which `key` is unmapped.
pub fn remove<V>(root: &Link<V>, key: &[u8], pos: usize) -> Link<V> {
    set(root, key, pos, None)
}
