use std::collections::HashSet;
use std::fmt;

use crate::{
    common::{
        config::{IndexConfig, MIN_ORDER},
        record::{Key, Record},
    },
    db_debug, db_trace,
    debugger::Component,
    storage::{
        btree::{
            cursor::RangeIter,
            internal::InternalNode,
            leaf::LeafNode,
            node::{BPlusNode, NodeId},
        },
        errors::{IndexError, IndexResult},
        index::{Index, RangeIndex},
        stats::{Counter, StatsMap, TreeStats},
    },
};

const NAME: &str = "btree";

#[derive(Debug, Default)]
pub(crate) struct TreeCounters {
    pub(crate) page_reads: Counter,
    pub(crate) page_writes: Counter,
    pub(crate) splits: Counter,
}

/// B+Tree over an arena of nodes. Parent and sibling links are arena ids,
/// children own the downward direction.
///
/// Deletes never rebalance: leaves may end up underfull or empty, and
/// separators stay in place.
pub struct BPlusTree {
    order: usize,
    root: NodeId,
    nodes: Vec<BPlusNode>,
    config: Option<IndexConfig>,
    len: usize,
    height: u64,
    pub(crate) counters: TreeCounters,
}

impl BPlusTree {
    /// Tree whose order is derived from the page geometry.
    pub fn new(config: IndexConfig) -> Self {
        let mut tree = Self::with_order(config.bplus_order());
        tree.config = Some(config);
        tree
    }

    /// Validates the geometry first; a bad page size or field count comes
    /// back as `IndexError::Config`.
    pub fn open(page_size: usize, num_fields: usize) -> IndexResult<Self> {
        Ok(Self::new(IndexConfig::new(page_size, num_fields)?))
    }

    /// Tree with an explicit order, floored to the minimum of 3.
    pub fn with_order(order: usize) -> Self {
        Self {
            order: order.max(MIN_ORDER),
            root: NodeId(0),
            nodes: vec![BPlusNode::Leaf(LeafNode::new())],
            config: None,
            len: 0,
            height: 1,
            counters: TreeCounters::default(),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn config(&self) -> Option<&IndexConfig> {
        self.config.as_ref()
    }

    pub(crate) fn node(&self, id: NodeId) -> &BPlusNode {
        &self.nodes[id.0]
    }

    fn leaf(&self, id: NodeId) -> &LeafNode {
        match self.node(id) {
            BPlusNode::Leaf(l) => l,
            BPlusNode::Internal(_) => unreachable!("expected leaf at {}", id),
        }
    }

    fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode {
        match &mut self.nodes[id.0] {
            BPlusNode::Leaf(l) => l,
            BPlusNode::Internal(_) => unreachable!("expected leaf at {}", id),
        }
    }

    fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode {
        match &mut self.nodes[id.0] {
            BPlusNode::Internal(i) => i,
            BPlusNode::Leaf(_) => unreachable!("expected internal node at {}", id),
        }
    }

    fn push(&mut self, node: BPlusNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Descends to the leaf whose range contains `key`. Counts one read per
    /// internal node; callers count the leaf.
    fn find_leaf(&self, key: Key) -> NodeId {
        let mut node = self.root;

        loop {
            match self.node(node) {
                BPlusNode::Leaf(_) => return node,
                BPlusNode::Internal(internal) => {
                    self.counters.page_reads.incr();
                    let next = internal.child_for(key);
                    db_trace!(Component::BTREE, "descend {} -> {} for key {}", node, next, key);
                    node = next;
                }
            }
        }
    }

    pub fn insert(&mut self, key: Key, record: Record) -> bool {
        let leaf_id = self.find_leaf(key);
        self.counters.page_reads.incr();

        if !self.leaf_mut(leaf_id).insert(key, record) {
            return false;
        }

        self.counters.page_writes.incr();
        self.len += 1;

        if self.node(leaf_id).is_full(self.order) {
            self.split_and_propagate(leaf_id);
        }

        true
    }

    pub fn search(&self, key: Key) -> Option<&Record> {
        let leaf_id = self.find_leaf(key);
        self.counters.page_reads.incr();
        self.leaf(leaf_id).search(key)
    }

    /// Records with keys in `[start, end]`, ascending. Empty when
    /// `start > end`.
    pub fn range_search(&self, start: Key, end: Key) -> RangeIter<'_> {
        if start > end {
            return RangeIter::empty(self);
        }

        let leaf_id = self.find_leaf(start);
        self.counters.page_reads.incr();
        RangeIter::new(self, Some(leaf_id), start, end)
    }

    pub fn delete(&mut self, key: Key) -> Option<Record> {
        let leaf_id = self.find_leaf(key);
        self.counters.page_reads.incr();

        let record = self.leaf_mut(leaf_id).delete(key)?;
        self.counters.page_writes.incr();
        self.len -= 1;
        Some(record)
    }

    /// Splits `node` and pushes the promoted key upward until a parent has
    /// room or a new root is created.
    fn split_and_propagate(&mut self, mut node: NodeId) {
        loop {
            self.counters.splits.incr();

            let (separator, sibling) = if self.node(node).is_leaf() {
                self.split_leaf(node)
            } else {
                self.split_internal(node)
            };
            self.counters.page_writes.add(2);

            let Some(parent) = self.node(node).parent() else {
                self.grow_root(node, sibling, separator);
                return;
            };

            self.internal_mut(parent).insert_child(separator, sibling);

            if !self.node(parent).is_full(self.order) {
                return;
            }
            node = parent;
        }
    }

    fn split_leaf(&mut self, leaf_id: NodeId) -> (Key, NodeId) {
        let (mut right, separator) = self.leaf_mut(leaf_id).split();
        let new_id = NodeId(self.nodes.len());

        let old_next = self.leaf(leaf_id).next;
        right.prev = Some(leaf_id);
        right.next = old_next;
        self.push(BPlusNode::Leaf(right));

        self.leaf_mut(leaf_id).next = Some(new_id);
        if let Some(next) = old_next {
            self.leaf_mut(next).prev = Some(new_id);
        }

        db_debug!(
            Component::BTREE,
            "split leaf {} -> {} (copied up {})",
            leaf_id,
            new_id,
            separator
        );
        (separator, new_id)
    }

    fn split_internal(&mut self, node_id: NodeId) -> (Key, NodeId) {
        let (right, separator) = self.internal_mut(node_id).split();
        let moved = right.children.clone();
        let new_id = self.push(BPlusNode::Internal(right));

        for child in moved {
            self.nodes[child.0].set_parent(Some(new_id));
        }

        db_debug!(
            Component::BTREE,
            "split internal {} -> {} (moved up {})",
            node_id,
            new_id,
            separator
        );
        (separator, new_id)
    }

    fn grow_root(&mut self, left: NodeId, right: NodeId, separator: Key) {
        let root = self.push(BPlusNode::Internal(InternalNode {
            keys: vec![separator],
            children: vec![left, right],
            parent: None,
        }));

        self.nodes[left.0].set_parent(Some(root));
        self.nodes[right.0].set_parent(Some(root));
        self.root = root;
        self.height += 1;
        self.counters.page_writes.incr();

        db_debug!(
            Component::BTREE,
            "new root {} at height {} (separator {})",
            root,
            self.height,
            separator
        );
    }

    pub fn get_stats(&self) -> TreeStats {
        TreeStats {
            page_reads: self.counters.page_reads.get(),
            page_writes: self.counters.page_writes.get(),
            splits: self.counters.splits.get(),
            merges: 0,
            height: self.height,
        }
    }

    /// Zeroes access counters. Height is structural and survives.
    pub fn reset_stats(&mut self) {
        self.counters.page_reads.reset();
        self.counters.page_writes.reset();
        self.counters.splits.reset();
    }

    fn leftmost_leaf(&self) -> NodeId {
        let mut node = self.root;
        while let BPlusNode::Internal(i) = self.node(node) {
            node = i.children[0];
        }
        node
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut cur = Some(self.leftmost_leaf());
        while let Some(id) = cur {
            count += 1;
            cur = self.leaf(id).next;
        }
        count
    }

    /// Walks every node reachable from the root and checks ordering, fan-out,
    /// balance, parent links and the sibling chain.
    pub fn validate(&self) -> IndexResult<()> {
        let mut leaves = Vec::new();
        let mut leaf_depth = None;
        let mut seen = HashSet::new();

        if self.node(self.root).parent().is_some() {
            return Err(IndexError::corrupted(NAME, "root has a parent"));
        }

        self.validate_node(
            self.root,
            1,
            (None, None),
            &mut leaf_depth,
            &mut leaves,
            &mut seen,
        )?;

        if leaf_depth != Some(self.height) {
            return Err(IndexError::corrupted(
                NAME,
                format!("leaf depth {:?} != height {}", leaf_depth, self.height),
            ));
        }

        let mut prev = None;
        let mut cur = Some(self.leftmost_leaf());
        let mut chained = Vec::new();
        let mut last_key: Option<Key> = None;

        while let Some(id) = cur {
            let leaf = self.leaf(id);
            if leaf.prev != prev {
                return Err(IndexError::corrupted(
                    NAME,
                    format!("leaf {} has prev {:?}, expected {:?}", id, leaf.prev, prev),
                ));
            }
            if let (Some(last), Some(first)) = (last_key, leaf.keys.first()) {
                if *first <= last {
                    return Err(IndexError::corrupted(
                        NAME,
                        format!("sibling chain out of order at leaf {}", id),
                    ));
                }
            }
            last_key = leaf.keys.last().copied().or(last_key);
            chained.push(id);
            prev = Some(id);
            cur = leaf.next;
        }

        if chained != leaves {
            return Err(IndexError::corrupted(
                NAME,
                "sibling chain does not match leaf order",
            ));
        }

        let total: usize = leaves.iter().map(|id| self.leaf(*id).keys.len()).sum();
        if total != self.len {
            return Err(IndexError::corrupted(
                NAME,
                format!("{} records in leaves, {} counted", total, self.len),
            ));
        }

        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        depth: u64,
        bounds: (Option<Key>, Option<Key>),
        leaf_depth: &mut Option<u64>,
        leaves: &mut Vec<NodeId>,
        seen: &mut HashSet<NodeId>,
    ) -> IndexResult<()> {
        if !seen.insert(id) {
            return Err(IndexError::corrupted(NAME, format!("node {} reached twice", id)));
        }

        let node = self.node(id);
        let keys = node.keys();

        if keys.len() >= self.order {
            return Err(IndexError::corrupted(
                NAME,
                format!("node {} holds {} keys at order {}", id, keys.len(), self.order),
            ));
        }
        if !keys.windows(2).all(|w| w[0] < w[1]) {
            return Err(IndexError::corrupted(NAME, format!("node {} keys unsorted", id)));
        }

        let (lo, hi) = bounds;
        let in_bounds = keys
            .iter()
            .all(|k| lo.is_none_or(|lo| *k >= lo) && hi.is_none_or(|hi| *k < hi));
        if !in_bounds {
            return Err(IndexError::corrupted(
                NAME,
                format!("node {} has keys outside [{:?}, {:?})", id, lo, hi),
            ));
        }

        match node {
            BPlusNode::Leaf(l) => {
                if l.records.len() != l.keys.len() {
                    return Err(IndexError::corrupted(
                        NAME,
                        format!("leaf {} key/record count mismatch", id),
                    ));
                }
                match leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(d) if *d != depth => {
                        return Err(IndexError::corrupted(
                            NAME,
                            format!("leaf {} at depth {}, expected {}", id, depth, d),
                        ));
                    }
                    Some(_) => {}
                }
                leaves.push(id);
            }

            BPlusNode::Internal(i) => {
                if i.keys.is_empty() {
                    return Err(IndexError::corrupted(
                        NAME,
                        format!("internal node {} has no keys", id),
                    ));
                }
                if i.children.len() != i.keys.len() + 1 {
                    return Err(IndexError::corrupted(
                        NAME,
                        format!(
                            "internal node {} has {} keys and {} children",
                            id,
                            i.keys.len(),
                            i.children.len()
                        ),
                    ));
                }

                for (idx, &child) in i.children.iter().enumerate() {
                    if self.node(child).parent() != Some(id) {
                        return Err(IndexError::corrupted(
                            NAME,
                            format!("child {} does not point back to {}", child, id),
                        ));
                    }

                    let child_lo = if idx == 0 { lo } else { Some(i.keys[idx - 1]) };
                    let child_hi = if idx == i.keys.len() { hi } else { Some(i.keys[idx]) };

                    self.validate_node(
                        child,
                        depth + 1,
                        (child_lo, child_hi),
                        leaf_depth,
                        leaves,
                        seen,
                    )?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for BPlusTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BPlusTree(order={}, height={}, records={}, leaves={}",
            self.order,
            self.height,
            self.len,
            self.leaf_count()
        )?;
        if let Some(cfg) = &self.config {
            write!(
                f,
                ", page_size={}, num_fields={}",
                cfg.page_size(),
                cfg.num_fields()
            )?;
        }
        write!(f, ")")
    }
}

impl Index for BPlusTree {
    fn name(&self) -> &'static str {
        NAME
    }

    fn insert(&mut self, key: Key, record: Record) -> bool {
        BPlusTree::insert(self, key, record)
    }

    fn search(&self, key: Key) -> Option<&Record> {
        BPlusTree::search(self, key)
    }

    fn delete(&mut self, key: Key) -> Option<Record> {
        BPlusTree::delete(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn stats(&self) -> StatsMap {
        self.get_stats().to_map()
    }

    fn reset_stats(&mut self) {
        BPlusTree::reset_stats(self);
    }
}

impl RangeIndex for BPlusTree {
    fn range_search(&self, start: Key, end: Key) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(BPlusTree::range_search(self, start, end))
    }
}
