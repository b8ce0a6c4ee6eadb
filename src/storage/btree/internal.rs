use crate::{
    common::record::Key,
    storage::btree::node::{NodeId, lower_bound},
};

#[derive(Debug, Clone, Default)]
pub struct InternalNode {
    pub keys: Vec<Key>,
    pub children: Vec<NodeId>, // children.len() = keys.len() + 1
    pub parent: Option<NodeId>,
}

impl InternalNode {
    /// Child `i` covers `[keys[i-1], keys[i])`, so pick the first separator
    /// strictly above `key`, or the last child.
    pub fn child_index(&self, key: Key) -> usize {
        self.keys.partition_point(|k| *k <= key)
    }

    pub fn child_for(&self, key: Key) -> NodeId {
        self.children[self.child_index(key)]
    }

    /// Adds the separator promoted from a child split together with the new
    /// right-hand sibling.
    pub fn insert_child(&mut self, key: Key, child: NodeId) {
        let pos = lower_bound(&self.keys, key);
        self.keys.insert(pos, key);
        self.children.insert(pos + 1, child);
    }

    /// Moves the keys above the middle into a new node. The middle key is
    /// removed and returned for promotion.
    pub fn split(&mut self) -> (InternalNode, Key) {
        let mid = self.keys.len() / 2;

        let separator = self.keys.remove(mid);
        let right_keys = self.keys.split_off(mid);
        let right_children = self.children.split_off(mid + 1);

        let right = InternalNode {
            keys: right_keys,
            children: right_children,
            parent: self.parent,
        };

        (right, separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(keys: Vec<Key>) -> InternalNode {
        let children = (0..=keys.len()).map(NodeId).collect();
        InternalNode {
            keys,
            children,
            parent: None,
        }
    }

    #[test]
    fn routes_equal_keys_right() {
        let n = node(vec![10, 20]);
        assert_eq!(n.child_index(5), 0);
        assert_eq!(n.child_index(10), 1);
        assert_eq!(n.child_index(19), 1);
        assert_eq!(n.child_index(20), 2);
        assert_eq!(n.child_index(99), 2);
    }

    #[test]
    fn insert_child_goes_after_separator() {
        let mut n = node(vec![10, 30]);
        n.insert_child(20, NodeId(9));

        assert_eq!(n.keys, vec![10, 20, 30]);
        assert_eq!(n.children, vec![NodeId(0), NodeId(1), NodeId(9), NodeId(2)]);
    }

    #[test]
    fn split_moves_middle_key_up() {
        let mut n = node(vec![1, 2, 3, 4]);
        let (right, sep) = n.split();

        assert_eq!(sep, 3);
        assert_eq!(n.keys, vec![1, 2]);
        assert_eq!(n.children, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(right.keys, vec![4]);
        assert_eq!(right.children, vec![NodeId(3), NodeId(4)]);
    }
}
