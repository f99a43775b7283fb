use super::backend::Backend;
use super::error::{Error, Result};
use super::iter::Iter;
use super::node::Link;
use super::trie;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, trace};

/// Structural statistics of one version of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Number of mapped keys.
    pub keys: usize,
    /// Length of the longest key path.
    pub depth: usize,
    /// Number of trie nodes.
    pub nodes: usize,
}

/// A handle on one version of the index.
///
/// Mutating methods replace the handle's root with a new version. Cloning
/// the handle (or calling [`Index::snapshot`]) is O(1) and yields a frozen
/// view that later updates never affect.
pub struct Index<V> {
    root: Link<V>,
}

impl<V> Clone for Index<V> {
    fn clone(&self) -> Self {
        Index {
            root: self.root.clone(),
        }
    }
}

impl<V> Default for Index<V> {
    fn default() -> Self {
        Index::new()
    }
}

impl<V> std::fmt::Debug for Index<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("keys", &self.len())
            .field("depth", &self.depth())
            .finish()
    }
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(Error::EmptyKey);
    }
    Ok(())
}

impl<V> Index<V> {
    pub fn new() -> Self {
        Index { root: trie::empty() }
    }

    pub fn from_root(root: Link<V>) -> Self {
        Index { root }
    }

    /// The root of the current version.
    pub fn root(&self) -> &Link<V> {
        &self.root
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.count())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Arc<V>>> {
        check_key(key)?;
        Ok(trie::get(&self.root, key, 0))
    }

    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns a new version of the index in which `key` maps to `value`.
    pub fn with(&self, key: &[u8], value: Arc<V>) -> Result<Self> {
        check_key(key)?;
        Ok(Index::from_root(trie::set(&self.root, key, 0, Some(value))))
    }

    /// Returns a new version of the index in which `key` is unmapped.
    pub fn without(&self, key: &[u8]) -> Result<Self> {
        check_key(key)?;
        Ok(Index::from_root(trie::remove(&self.root, key, 0)))
    }

    pub fn insert(&mut self, key: &[u8], value: Arc<V>) -> Result<()> {
        debug!(key = %hex::encode(key), "insert");
        *self = self.with(key, value)?;
        trace!(keys = self.len(), depth = self.depth(), "inserted");
        Ok(())
    }

    pub fn remove(&mut self, key: &[u8]) -> Result<()> {
        debug!(key = %hex::encode(key), "remove");
        *self = self.without(key)?;
        trace!(keys = self.len(), depth = self.depth(), "removed");
        Ok(())
    }

    /// Loads the value for `key` from `reader` through `backend` and maps
    /// it in the index. The backend is handed the current value so that it
    /// may return it as is, leaving the index unchanged.
    pub fn load<B>(&mut self, backend: &B, key: &[u8], reader: &mut dyn Read) -> Result<Arc<V>>
    where
        B: Backend<Value = V>,
    {
        check_key(key)?;
        let current = trie::get(&self.root, key, 0);
        let value = backend.load(key, reader, current.as_ref())?;
        debug!(
            key = %hex::encode(key),
            unchanged = current.map_or(false, |c| Arc::ptr_eq(&c, &value)),
            "load"
        );
        *self = self.with(key, value.clone())?;
        trace!(keys = self.len(), depth = self.depth(), "loaded");
        Ok(value)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.root.as_deref())
    }

    pub fn stats(&self) -> Stats {
        match &self.root {
            Some(root) => Stats {
                keys: root.count(),
                depth: root.depth(),
                nodes: root.node_count(),
            },
            None => Stats::default(),
        }
    }

    /// Renders the current version as a Graphviz digraph.
    pub fn graphviz(&self) -> String {
        match &self.root {
            Some(root) => root.graphviz(),
            None => String::from("digraph D {\n\troot [label=\"root\"];\n}"),
        }
    }
}
