use crate::{
    common::record::{Key, Record},
    storage::btree::node::{NodeId, lower_bound},
};

#[derive(Debug, Clone, Default)]
pub struct LeafNode {
    pub keys: Vec<Key>,
    pub records: Vec<Record>, // records[i] belongs to keys[i]
    pub next: Option<NodeId>, // right sibling
    pub prev: Option<NodeId>, // left sibling
    pub parent: Option<NodeId>,
}

impl LeafNode {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, key: Key) -> Result<usize, usize> {
        let pos = lower_bound(&self.keys, key);
        if pos < self.keys.len() && self.keys[pos] == key {
            Ok(pos)
        } else {
            Err(pos)
        }
    }

    /// Inserts at the sorted position. Returns `false` on a duplicate key.
    pub fn insert(&mut self, key: Key, record: Record) -> bool {
        match self.find(key) {
            Ok(_) => false,
            Err(pos) => {
                self.keys.insert(pos, key);
                self.records.insert(pos, record);
                true
            }
        }
    }

    pub fn search(&self, key: Key) -> Option<&Record> {
        self.find(key).ok().map(|pos| &self.records[pos])
    }

    pub fn delete(&mut self, key: Key) -> Option<Record> {
        let pos = self.find(key).ok()?;
        self.keys.remove(pos);
        Some(self.records.remove(pos))
    }

    /// Moves the upper half into a new leaf and returns it with the key to
    /// promote. The promoted key stays in the new leaf.
    ///
    /// Sibling links are left to the caller, which knows the arena ids.
    pub fn split(&mut self) -> (LeafNode, Key) {
        let mid = self.keys.len() / 2;

        let right = LeafNode {
            keys: self.keys.split_off(mid),
            records: self.records.split_off(mid),
            next: None,
            prev: None,
            parent: self.parent,
        };

        let separator = right.keys[0];
        (right, separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(k: Key) -> Record {
        Record::new(vec![k, k * 10])
    }

    #[test]
    fn keeps_keys_sorted_and_unique() {
        let mut leaf = LeafNode::new();
        for k in [5, 1, 3] {
            assert!(leaf.insert(k, rec(k)));
        }
        assert!(!leaf.insert(3, rec(99)));

        assert_eq!(leaf.keys, vec![1, 3, 5]);
        assert_eq!(leaf.search(3), Some(&rec(3)));
        assert_eq!(leaf.search(4), None);
    }

    #[test]
    fn split_copies_first_upper_key() {
        let mut leaf = LeafNode::new();
        for k in 1..=4 {
            leaf.insert(k, rec(k));
        }

        let (right, sep) = leaf.split();

        assert_eq!(leaf.keys, vec![1, 2]);
        assert_eq!(right.keys, vec![3, 4]);
        assert_eq!(sep, 3);
        assert_eq!(right.records[0], rec(3));
    }

    #[test]
    fn delete_returns_record() {
        let mut leaf = LeafNode::new();
        leaf.insert(8, rec(8));

        assert_eq!(leaf.delete(8), Some(rec(8)));
        assert_eq!(leaf.delete(8), None);
        assert!(leaf.keys.is_empty());
    }
}
