use std::fmt;

use crate::{
    common::record::Key,
    storage::btree::{internal::InternalNode, leaf::LeafNode},
};

/// Stable handle of a node inside the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum BPlusNode {
    Internal(InternalNode),
    Leaf(LeafNode),
}

impl BPlusNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, BPlusNode::Leaf(_))
    }

    pub fn keys(&self) -> &[Key] {
        match self {
            BPlusNode::Internal(i) => &i.keys,
            BPlusNode::Leaf(l) => &l.keys,
        }
    }

    /// A node overflows once it holds `order` keys.
    pub fn is_full(&self, order: usize) -> bool {
        self.keys().len() >= order
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            BPlusNode::Internal(i) => i.parent,
            BPlusNode::Leaf(l) => l.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            BPlusNode::Internal(i) => i.parent = parent,
            BPlusNode::Leaf(l) => l.parent = parent,
        }
    }
}

/// First index in `keys` whose key is not less than `key`.
pub fn lower_bound(keys: &[Key], key: Key) -> usize {
    keys.partition_point(|k| *k < key)
}
