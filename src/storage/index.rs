use crate::{
    common::record::{Key, Record},
    storage::stats::StatsMap,
};

/// Equality index over fixed-shape records.
///
/// Duplicate inserts return `false` and leave the stored record untouched.
/// Missing keys come back as `None`; neither case is an error.
pub trait Index {
    fn name(&self) -> &'static str;

    fn insert(&mut self, key: Key, record: Record) -> bool;
    fn search(&self, key: Key) -> Option<&Record>;
    fn delete(&mut self, key: Key) -> Option<Record>;

    /// Number of live records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> StatsMap;
    fn reset_stats(&mut self);
}

/// Index that can also answer inclusive key ranges in key order.
pub trait RangeIndex: Index {
    fn range_search(&self, start: Key, end: Key) -> Box<dyn Iterator<Item = &Record> + '_>;
}
