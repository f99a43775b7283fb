pub mod byte_key;

pub use byte_key::*;

/// Returns the key byte matched at depth `pos`, along with the index of
/// the key's last byte.
///
/// Panics if `pos` is past the end of the key: trie traversals only ever
/// advance one level per byte, so this indicates broken position
/// bookkeeping in the caller.
#[inline]
pub fn unit_at(key: &[u8], pos: usize) -> (u8, usize) {
    if pos >= key.len() {
        panic!(
            "Position exceeded: requested #{}, key has {} bytes",
            pos,
            key.len()
        );
    }
    (key[pos], key.len() - 1)
}
