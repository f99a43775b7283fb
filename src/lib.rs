//! A persistent, copy-on-write byte trie used as the index of a key-value
//! store.
//!
//! Every update returns the root of a new version of the index, built by
//! copying the path leading to the modified key and sharing every other
//! subtree with the previous version. Older roots stay valid and unchanged,
//! so readers can traverse any version they hold without locking while a
//! single writer advances the index.

pub mod backend;
pub mod error;
pub mod index;
pub mod iter;
pub mod keys;
pub mod node;
pub mod trie;
pub mod value;

pub use backend::{Backend, MemoryBackend};
pub use error::{Error, Result};
pub use index::{Index, Stats};
pub use iter::Iter;
pub use keys::ByteKey;
pub use node::{Link, Node};
pub use value::{BytesValue, Value};

#[cfg(test)]
mod proptests;
