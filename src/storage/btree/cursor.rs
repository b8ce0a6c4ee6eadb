use crate::{
    common::record::{Key, Record},
    storage::btree::{
        b_plus_tree::BPlusTree,
        node::{BPlusNode, NodeId},
    },
};

/// Lazy walk over the leaf chain yielding records with keys in
/// `[start, end]`. Stops for good at the first key above `end`.
pub struct RangeIter<'a> {
    tree: &'a BPlusTree,
    leaf: Option<NodeId>,
    pos: usize,
    start: Key,
    end: Key,
}

impl<'a> RangeIter<'a> {
    pub(crate) fn new(tree: &'a BPlusTree, leaf: Option<NodeId>, start: Key, end: Key) -> Self {
        Self {
            tree,
            leaf,
            pos: 0,
            start,
            end,
        }
    }

    pub(crate) fn empty(tree: &'a BPlusTree) -> Self {
        Self::new(tree, None, 1, 0)
    }
}

impl<'a> Iterator for RangeIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<&'a Record> {
        loop {
            let leaf_id = self.leaf?;
            let leaf = match self.tree.node(leaf_id) {
                BPlusNode::Leaf(l) => l,
                BPlusNode::Internal(_) => unreachable!("sibling chain reached an internal node"),
            };

            if self.pos >= leaf.keys.len() {
                self.leaf = leaf.next;
                self.pos = 0;
                if self.leaf.is_some() {
                    self.tree.counters.page_reads.incr();
                }
                continue;
            }

            let key = leaf.keys[self.pos];
            if key > self.end {
                self.leaf = None;
                return None;
            }

            self.pos += 1;
            if key >= self.start {
                return Some(&leaf.records[self.pos - 1]);
            }
        }
    }
}
