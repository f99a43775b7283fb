use super::keys::ByteKey;
use super::node::Node;
use std::sync::Arc;

/// An iterator over the `(key, value)` pairs of one version of the index,
/// in ascending key order.
pub struct Iter<'a, V> {
    /// Nodes left to visit, along with the length of their key prefix.
    stack: Vec<(&'a Node<V>, usize)>,
    /// Key bytes leading to the node being visited.
    prefix: Vec<u8>,
}

impl<'a, V> Iter<'a, V> {
    pub fn new(root: Option<&'a Node<V>>) -> Self {
        Iter {
            stack: root.into_iter().map(|node| (node, 0)).collect(),
            prefix: Vec::new(),
        }
    }
}

impl<'a, V> std::iter::Iterator for Iter<'a, V> {
    type Item = (ByteKey, &'a Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, level)) = self.stack.pop() {
            self.prefix.truncate(level);
            self.prefix.push(node.key());

            // Children sort before the following siblings.
            if let Some(next) = node.next() {
                self.stack.push((&**next, level));
            }
            if let Some(children) = node.children() {
                self.stack.push((&**children, level + 1));
            }

            if let Some(value) = node.value() {
                return Some((ByteKey::from(self.prefix.clone()), value));
            }
        }
        None
    }
}
