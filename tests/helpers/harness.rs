use std::collections::BTreeMap;

use pagedex::{
    common::{IndexConfig, Key, Record},
    storage::{BPlusTree, ExtendibleHash, Index},
};

/// Both engines built from the same page geometry.
#[allow(dead_code)]
pub fn engines(config: IndexConfig) -> Vec<Box<dyn Index>> {
    vec![
        Box::new(BPlusTree::new(config)),
        Box::new(ExtendibleHash::new(config)),
    ]
}

/// Reference model that every engine must agree with.
#[allow(dead_code)]
#[derive(Default)]
pub struct Oracle {
    pub records: BTreeMap<Key, Record>,
}

#[allow(dead_code)]
impl Oracle {
    pub fn insert(&mut self, key: Key, record: Record) -> bool {
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key, record);
        true
    }

    pub fn delete(&mut self, key: Key) -> Option<Record> {
        self.records.remove(&key)
    }

    pub fn range(&self, start: Key, end: Key) -> Vec<Record> {
        if start > end {
            return Vec::new();
        }
        self.records.range(start..=end).map(|(_, r)| r.clone()).collect()
    }

    /// Every live record is found and the count matches.
    pub fn check(&self, index: &dyn Index) -> anyhow::Result<()> {
        if index.len() != self.records.len() {
            anyhow::bail!(
                "{}: {} records, expected {}",
                index.name(),
                index.len(),
                self.records.len()
            );
        }

        for (k, r) in &self.records {
            match index.search(*k) {
                Some(found) if found == r => {}
                other => anyhow::bail!("{}: search({}) = {:?}, expected {}", index.name(), k, other, r),
            }
        }

        Ok(())
    }
}
