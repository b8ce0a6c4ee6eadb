use std::cell::Cell;
use std::collections::BTreeMap;

/// Access counter bumped through shared references, so lookups can be
/// counted without `&mut self`.
#[derive(Debug, Default)]
pub struct Counter(Cell<u64>);

impl Counter {
    pub fn incr(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.0.set(self.0.get() + n);
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    pub fn reset(&self) {
        self.0.set(0);
    }
}

pub type StatsMap = BTreeMap<&'static str, u64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub page_reads: u64,
    pub page_writes: u64,
    pub splits: u64,
    pub merges: u64,
    pub height: u64,
}

impl TreeStats {
    pub fn to_map(&self) -> StatsMap {
        BTreeMap::from([
            ("page_reads", self.page_reads),
            ("page_writes", self.page_writes),
            ("splits", self.splits),
            ("merges", self.merges),
            ("height", self.height),
        ])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashStats {
    pub bucket_reads: u64,
    pub bucket_writes: u64,
    pub splits: u64,
    pub directory_doublings: u64,
    pub global_depth: u64,
    pub num_buckets: u64,
    pub directory_size: u64,
}

impl HashStats {
    pub fn to_map(&self) -> StatsMap {
        BTreeMap::from([
            ("bucket_reads", self.bucket_reads),
            ("bucket_writes", self.bucket_writes),
            ("splits", self.splits),
            ("directory_doublings", self.directory_doublings),
            ("global_depth", self.global_depth),
            ("num_buckets", self.num_buckets),
            ("directory_size", self.directory_size),
        ])
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use super::*;

    #[test]
    fn counter_adds_and_resets() {
        let c = Counter::default();
        c.incr();
        c.add(2);
        assert_eq!(c.get(), 3);
        c.reset();
        assert_eq!(c.get(), 0);
    }

    #[test]
    fn tree_stats_map_names() {
        let s = TreeStats {
            page_reads: 4,
            page_writes: 2,
            splits: 1,
            merges: 0,
            height: 2,
        };
        assert_eq!(
            s.to_map(),
            btreemap! {
                "page_reads" => 4,
                "page_writes" => 2,
                "splits" => 1,
                "merges" => 0,
                "height" => 2,
            }
        );
    }
}
