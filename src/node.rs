use super::keys::*;
use std::cmp::Ordering;
use std::sync::Arc;

/// A shared reference to a node, or `None` for a subtree holding no key.
///
/// A `Link` is also what callers hold as the root of one version of the
/// index: `None` is the empty index.
pub type Link<V> = Option<Arc<Node<V>>>;

/// A node of the persistent trie used as an index.
///
/// Each node matches a single key byte at its depth. Nodes at the same depth
/// form a chain linked through `next`, sorted by strictly increasing key,
/// and `children` points to the head of the chain one level deeper. Nodes
/// are immutable once built: updates rebuild the path leading to the change
/// and share everything else with the previous version.
///
/// Outside this crate nodes only come from [`Node::new_leaf`] and from the
/// update methods, which keep the chains ordered:
///
/// ```compile_fail
/// let node = triedb::Node::<u32>::new(b'a', None, None, None);
/// ```
pub struct Node<V> {
    key: u8,
    depth: usize,
    count: usize,
    value: Option<Arc<V>>,
    next: Link<V>,
    children: Link<V>,
}

#[inline]
fn same_link<T>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl<V> Node<V> {
    /// Creates a new node. Every node must be created through this function,
    /// which computes the subtree statistics from `next` and `children`.
    pub(crate) fn new(
        key: u8,
        value: Option<Arc<V>>,
        next: Link<V>,
        children: Link<V>,
    ) -> Arc<Self> {
        let mut count = if value.is_some() { 1 } else { 0 };
        if let Some(next) = &next {
            count += next.count;
        }
        let depth = match &children {
            Some(children) => {
                count += children.count;
                1 + children.depth
            }
            None => 1,
        };
        Arc::new(Node {
            key,
            depth,
            count,
            value,
            next,
            children,
        })
    }

    /// Creates a new node with no children and no siblings.
    pub fn new_leaf(key: u8, value: Arc<V>) -> Arc<Self> {
        Node::new(key, Some(value), None, None)
    }

    /// Builds the chain of nodes spelling `key[pos..]`, with `value` at the
    /// last byte and `next` as the sibling of the first node.
    pub(crate) fn new_path(key: &[u8], pos: usize, value: Arc<V>, next: Link<V>) -> Arc<Self> {
        let (k, last) = unit_at(key, pos);
        if pos == last {
            return Node::new(k, Some(value), next, None);
        }
        let mut below = Node::new_leaf(key[last], value);
        for &byte in key[pos + 1..last].iter().rev() {
            below = Node::new(byte, None, None, Some(below));
        }
        Node::new(k, None, next, Some(below))
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    pub fn value(&self) -> Option<&Arc<V>> {
        self.value.as_ref()
    }

    pub fn next(&self) -> Option<&Arc<Node<V>>> {
        self.next.as_ref()
    }

    pub fn children(&self) -> Option<&Arc<Node<V>>> {
        self.children.as_ref()
    }

    /// Length of the longest chain of children starting at this node,
    /// this node included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of keys held by this node, its descendants, and its
    /// following siblings.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the node holds no value, no sibling and no child.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.next.is_none() && self.children.is_none()
    }

    /// Drops a node holding neither a value nor children, splicing its next
    /// sibling (if any) in its place.
    fn prune(node: Arc<Self>) -> Link<V> {
        if node.value.is_none() && node.children.is_none() {
            node.next.clone()
        } else {
            Some(node)
        }
    }

    /// Returns the value for `key`, looking at it from byte `pos` on.
    pub fn get(&self, key: &[u8], pos: usize) -> Option<&Arc<V>> {
        let mut node = self;
        let mut pos = pos;
        loop {
            let (k, last) = unit_at(key, pos);
            match k.cmp(&node.key) {
                // Further down the sibling chain
                Ordering::Greater => node = &**node.next.as_ref()?,
                Ordering::Equal if pos < last => {
                    node = &**node.children.as_ref()?;
                    pos += 1;
                }
                Ordering::Equal => return node.value.as_ref(),
                // Would have been a previous sibling
                Ordering::Less => return None,
            }
        }
    }

    /// Returns this node with `next` as its sibling, rebuilding it only if
    /// the sibling changed.
    fn with_next(self: &Arc<Self>, next: Link<V>) -> Arc<Self> {
        if same_link(&self.next, &next) {
            return self.clone();
        }
        Node::new(self.key, self.value.clone(), next, self.children.clone())
    }

    /// Returns this node with `children` as its first child, rebuilding it
    /// only if the child changed.
    fn with_children(self: &Arc<Self>, children: Link<V>) -> Arc<Self> {
        if same_link(&self.children, &children) {
            return self.clone();
        }
        Node::new(self.key, self.value.clone(), self.next.clone(), children)
    }

    /// Creates the sibling that will hold `key`, either in front of this
    /// node (when the key byte is smaller) or at the end of the chain.
    fn create_sibling(self: &Arc<Self>, key: &[u8], pos: usize, value: Option<Arc<V>>) -> Link<V> {
        let (k, _) = unit_at(key, pos);
        let before = k < self.key;
        match value {
            Some(value) => {
                let next = if before { Some(self.clone()) } else { None };
                Some(Node::new_path(key, pos, value, next))
            }
            // Nothing to create for a removal.
            None if before => Some(self.clone()),
            None => None,
        }
    }

    /// Returns the root of a new version in which `key` maps to `value`, or
    /// is unmapped when `value` is `None`. `self` is left untouched and
    /// shares every unmodified subtree with the result.
    ///
    /// The walk down records, for every node it leaves, whether it followed
    /// `next` or `children`; the path is then rebuilt bottom-up from that
    /// record, so the stack usage does not grow with the key length.
    pub fn set(self: &Arc<Self>, key: &[u8], pos: usize, value: Option<Arc<V>>) -> Link<V> {
        let mut path: Vec<(Arc<Self>, Ordering)> = Vec::new();
        let mut node = self.clone();
        let mut pos = pos;

        let rebuilt = loop {
            let (k, last) = unit_at(key, pos);
            match k.cmp(&node.key) {
                Ordering::Less => break node.create_sibling(key, pos, value),
                Ordering::Greater => match node.next.clone() {
                    Some(next) => {
                        path.push((node, Ordering::Greater));
                        node = next;
                    }
                    None => {
                        let sibling = node.create_sibling(key, pos, value);
                        path.push((node, Ordering::Greater));
                        break sibling;
                    }
                },
                Ordering::Equal if pos < last => match node.children.clone() {
                    Some(children) => {
                        path.push((node, Ordering::Equal));
                        node = children;
                        pos += 1;
                    }
                    None => match value {
                        // Unmodified
                        None => break Some(node),
                        Some(value) => {
                            let children = Node::new_path(key, pos + 1, value, None);
                            path.push((node, Ordering::Equal));
                            break Some(children);
                        }
                    },
                },
                Ordering::Equal => {
                    if same_link(&node.value, &value) {
                        break Some(node);
                    }
                    break Node::prune(Node::new(
                        node.key,
                        value,
                        node.next.clone(),
                        node.children.clone(),
                    ));
                }
            }
        };

        path.into_iter().rev().fold(rebuilt, |link, (parent, branch)| match branch {
            Ordering::Greater => Node::prune(parent.with_next(link)),
            _ => Node::prune(parent.with_children(link)),
        })
    }

    /// Clears the value for `key`, dropping the nodes that are no longer
    /// needed.
    pub fn remove(self: &Arc<Self>, key: &[u8], pos: usize) -> Link<V> {
        self.set(key, pos, None)
    }

    /// Returns the number of nodes reachable from this one, siblings
    /// included.
    pub fn node_count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            if let Some(next) = &node.next {
                stack.push(next);
            }
            if let Some(children) = &node.children {
                stack.push(children);
            }
        }
        total
    }

    pub fn graphviz(&self) -> String {
        let mut nodes = Vec::new();
        let mut refs = Vec::new();
        let mut stack = vec![(self, Vec::new(), String::from("root"), "solid")];

        while let Some((node, prefix, parent, style)) = stack.pop() {
            let mut path = prefix.clone();
            path.push(node.key);
            let name = format!("n{}", hex::encode(&path));
            let shape = if node.value.is_some() {
                "doublecircle"
            } else {
                "circle"
            };

            nodes.push(format!(
                "{} [shape={},label=\"{:02x}\\n{}/{}\"]",
                name, shape, node.key, node.count, node.depth
            ));
            refs.push(format!("{} -> {} [style={}]", parent, name, style));

            if let Some(next) = &node.next {
                stack.push((&**next, prefix, name.clone(), "dashed"));
            }
            if let Some(children) = &node.children {
                stack.push((&**children, path, name, "solid"));
            }
        }

        format!(
            "digraph D {{
\tnode [shape=\"box\"];
\troot [label=\"root\"];

\t{}

\t{}
}}",
            nodes.join("\n\t"),
            refs.join("\n\t")
        )
    }
}

impl<V> Drop for Node<V> {
    // Subtrees owned by this node alone are detached into a work list, so
    // dropping a long path does not recurse once per level.
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Node<V>>> = Vec::new();
        pending.extend(self.next.take());
        pending.extend(self.children.take());
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(node) {
                pending.extend(node.next.take());
                pending.extend(node.children.take());
            }
        }
    }
}

impl<V> std::fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("key", &format_args!("{:02x}", self.key))
            .field("depth", &self.depth)
            .field("count", &self.count)
            .field("has_value", &self.value.is_some())
            .field("next", &self.next.as_ref().map(|n| n.key))
            .field("children", &self.children.as_ref().map(|c| c.key))
            .finish()
    }
}
